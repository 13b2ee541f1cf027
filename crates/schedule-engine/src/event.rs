//! The event record shared by every module: extraction, import/export, the
//! store and the conflict detector.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::policy::IntervalPolicy;

/// Region of the source image an event was read from, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A titled time interval read from a schedule image, imported from a file,
/// or entered by hand.
///
/// `id` is unique within a collection and stable across edits. The interval
/// is half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default = "default_confidence")]
    pub ocr_confidence: f64,
    #[serde(default)]
    pub bounding_box: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

pub(crate) fn default_confidence() -> f64 {
    1.0
}

impl ScheduleEvent {
    /// Create an event with full confidence, an empty bounding box and no
    /// optional metadata.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            location: None,
            instructor: None,
            note: None,
            ocr_confidence: default_confidence(),
            bounding_box: BoundingBox::default(),
            color: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when `end < start`.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// True for a zero-length event (`start == end`).
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    /// Half-open overlap: `self.start < other.end && other.start < self.end`.
    ///
    /// Back-to-back events (one ends exactly when the other starts) do not
    /// overlap. The comparison is applied literally, including to inverted
    /// intervals.
    pub fn overlaps(&self, other: &ScheduleEvent) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Apply the ingestion policy for inverted intervals.
    pub fn check_interval(&self, policy: IntervalPolicy) -> Result<()> {
        if self.is_inverted() && policy == IntervalPolicy::Reject {
            return Err(ScheduleError::InvertedInterval {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Apply a partial edit in place. Fields left as `None` in the patch are
    /// untouched.
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(instructor) = patch.instructor {
            self.instructor = instructor;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}

/// A partial update to an event, as produced by the edit dialog.
///
/// For the optional metadata fields the outer `Option` says whether the field
/// is being edited and the inner one is the new value, so `Some(None)` clears
/// it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<Option<String>>,
    pub instructor: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

impl EventPatch {
    /// A patch that only moves the event, as a drag-and-drop does.
    pub fn reschedule(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// True if the patch changes `start` or `end`.
    pub fn moves_interval(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Normalize an optional free-text field: trim it and drop it if blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// True for `#rgb` or `#rrggbb` hex colors.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
