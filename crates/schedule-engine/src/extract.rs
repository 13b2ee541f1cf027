//! Normalization of the multimodal model's extraction response.
//!
//! The model is asked for a JSON array constrained by [`response_schema`],
//! but its output is still untrusted: every record is validated and coerced
//! into a [`ScheduleEvent`] here, and the first record that cannot be fixed
//! up fails the whole response with its index.

use serde_json::{json, Value};

use crate::error::Result;
use crate::event::ScheduleEvent;
use crate::policy::IngestOptions;
use crate::record::{events_from_json, Strictness};

/// Parse and validate the raw text of an extraction response.
///
/// An empty (or whitespace-only) response means the model found nothing and
/// yields an empty list.
///
/// # Errors
/// - `ScheduleError::Json` if the text is not JSON.
/// - `ScheduleError::NotAnArray` if the top level is not an array.
/// - `ScheduleError::InvalidRecord` for a record missing a required field or
///   carrying an unparseable timestamp.
/// - `ScheduleError::DuplicateId` if two records share an id.
/// - `ScheduleError::InvertedInterval` under `IntervalPolicy::Reject`.
pub fn parse_extraction(response: &str, options: &IngestOptions) -> Result<Vec<ScheduleEvent>> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        tracing::warn!("extraction response was empty");
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed)?;
    let events = events_from_json(value, Strictness::Extraction, options)?;

    tracing::debug!(count = events.len(), "normalized extraction response");
    Ok(events)
}

/// JSON schema the extraction call constrains the model's output to.
pub fn response_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "A unique identifier for the event." },
                "title": { "type": "string", "description": "The title of the event." },
                "start": { "type": "string", "description": "The start date and time in ISO 8601 format." },
                "end": { "type": "string", "description": "The end date and time in ISO 8601 format." },
                "location": { "type": "string", "description": "The location of the event, if any." },
                "instructor": { "type": "string", "description": "The name of the instructor, if any." },
                "note": { "type": "string", "description": "A note or description for the event, if any." },
                "ocrConfidence": {
                    "type": "number",
                    "description": "A confidence score for the text extraction, between 0 and 1."
                },
                "boundingBox": {
                    "type": "object",
                    "properties": {
                        "x": { "type": "number" },
                        "y": { "type": "number" },
                        "width": { "type": "number" },
                        "height": { "type": "number" }
                    },
                    "required": ["x", "y", "width", "height"]
                },
                "color": {
                    "type": "string",
                    "description": "A hex color code (e.g., #3b82f6) suggested for the event."
                }
            },
            "required": ["id", "title", "start", "end", "ocrConfidence", "boundingBox"]
        }
    })
}
