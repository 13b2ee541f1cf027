//! Loosely-typed event records as they arrive from outside (the extraction
//! model's JSON, hand-edited JSON exports) and their conversion into strict
//! [`ScheduleEvent`]s.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, ScheduleError};
use crate::event::{default_confidence, is_hex_color, non_blank, BoundingBox, ScheduleEvent};
use crate::policy::IngestOptions;
use crate::timestamp::parse_timestamp;

/// Ids are meant to be strings, but numeric ids show up in practice.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: Option<RawId>,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    location: Option<String>,
    instructor: Option<String>,
    note: Option<String>,
    ocr_confidence: Option<f64>,
    bounding_box: Option<BoundingBox>,
    color: Option<String>,
}

/// How strictly a record is held to the extraction schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strictness {
    /// `ocrConfidence` and `boundingBox` must be present.
    Extraction,
    /// `ocrConfidence` defaults to 1.0 and `boundingBox` to zeros.
    Import,
}

/// Convert a JSON array of raw records into validated events.
///
/// Fails on the first bad record, reporting its index. Ids must be unique
/// across the payload.
pub(crate) fn events_from_json(
    value: Value,
    strictness: Strictness,
    options: &IngestOptions,
) -> Result<Vec<ScheduleEvent>> {
    let Value::Array(items) = value else {
        return Err(ScheduleError::NotAnArray);
    };

    let mut events = Vec::with_capacity(items.len());
    let mut seen = HashSet::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let raw: RawEvent =
            serde_json::from_value(item).map_err(|e| ScheduleError::InvalidRecord {
                index,
                message: e.to_string(),
            })?;
        let event = raw.into_event(index, strictness, options)?;

        if !seen.insert(event.id.clone()) {
            return Err(ScheduleError::DuplicateId(event.id));
        }
        event.check_interval(options.policy)?;
        events.push(event);
    }

    Ok(events)
}

fn invalid(index: usize, message: impl Into<String>) -> ScheduleError {
    ScheduleError::InvalidRecord {
        index,
        message: message.into(),
    }
}

impl RawEvent {
    fn into_event(
        self,
        index: usize,
        strictness: Strictness,
        options: &IngestOptions,
    ) -> Result<ScheduleEvent> {
        let id = self
            .id
            .map(RawId::into_string)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid(index, "missing id"))?;

        let title = non_blank(self.title).ok_or_else(|| invalid(index, "missing title"))?;

        let start = self.start.ok_or_else(|| invalid(index, "missing start"))?;
        let start = parse_timestamp(&start, options.timezone)
            .map_err(|e| invalid(index, format!("start: {}", e)))?;

        let end = self.end.ok_or_else(|| invalid(index, "missing end"))?;
        let end = parse_timestamp(&end, options.timezone)
            .map_err(|e| invalid(index, format!("end: {}", e)))?;

        let ocr_confidence = match (self.ocr_confidence, strictness) {
            (Some(c), _) => clamp_confidence(&id, c),
            (None, Strictness::Import) => default_confidence(),
            (None, Strictness::Extraction) => return Err(invalid(index, "missing ocrConfidence")),
        };

        let bounding_box = match (self.bounding_box, strictness) {
            (Some(b), _) => b,
            (None, Strictness::Import) => BoundingBox::default(),
            (None, Strictness::Extraction) => return Err(invalid(index, "missing boundingBox")),
        };

        let color = non_blank(self.color).filter(|c| {
            let ok = is_hex_color(c);
            if !ok {
                tracing::warn!(id = %id, color = %c, "dropping invalid event color");
            }
            ok
        });

        Ok(ScheduleEvent {
            id,
            title,
            start,
            end,
            location: non_blank(self.location),
            instructor: non_blank(self.instructor),
            note: non_blank(self.note),
            ocr_confidence,
            bounding_box,
            color,
        })
    }
}

fn clamp_confidence(id: &str, confidence: f64) -> f64 {
    let clamped = confidence.clamp(0.0, 1.0);
    if clamped != confidence {
        tracing::warn!(id, confidence, "clamping OCR confidence into [0, 1]");
    }
    clamped
}
