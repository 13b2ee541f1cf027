//! Ingestion policies for intervals that end before they start.

use serde::{Deserialize, Serialize};

/// What ingestion (extraction, ICS/JSON import) does with an event whose
/// `end` is earlier than its `start`.
///
/// The conflict detector never consults this: it applies the literal
/// half-open comparison to whatever it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalPolicy {
    /// Fail the whole payload with `ScheduleError::InvertedInterval`.
    #[default]
    Reject,
    /// Keep the record as-is; overlap is decided by the literal comparison.
    Literal,
}

impl std::str::FromStr for IntervalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(IntervalPolicy::Reject),
            "literal" => Ok(IntervalPolicy::Literal),
            other => Err(format!(
                "unknown interval policy '{}' (expected 'reject' or 'literal')",
                other
            )),
        }
    }
}

/// Settings shared by every ingestion path (AI extraction, ICS and JSON
/// import).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOptions {
    /// Zone used for timestamps that carry no offset.
    pub timezone: chrono_tz::Tz,
    pub policy: IntervalPolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            policy: IntervalPolicy::default(),
        }
    }
}
