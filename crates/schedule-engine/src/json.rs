//! JSON interchange: the event schema as a pretty-printed array.

use serde_json::Value;

use crate::error::Result;
use crate::event::ScheduleEvent;
use crate::policy::IngestOptions;
use crate::record::{events_from_json, Strictness};

/// Serialize events as a pretty-printed JSON array.
pub fn export_json(events: &[ScheduleEvent]) -> Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Parse a JSON array of events.
///
/// Unlike extraction, `ocrConfidence` defaults to 1.0 and `boundingBox` to
/// an empty box when absent, so files written by other tools still load.
///
/// # Errors
/// Returns `ScheduleError::NotAnArray` if the top level is not an array, and
/// the same per-record errors as [`crate::extract::parse_extraction`].
pub fn import_json(text: &str, options: &IngestOptions) -> Result<Vec<ScheduleEvent>> {
    let value: Value = serde_json::from_str(text)?;
    let events = events_from_json(value, Strictness::Import, options)?;

    tracing::debug!(count = events.len(), "imported events from JSON");
    Ok(events)
}
