//! JSON-in, JSON-out wrappers over schedule-engine with `String` errors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use schedule_engine::demo::Language;
use schedule_engine::search::{search, sorted_by_start};
use schedule_engine::timestamp::parse_timezone;
use schedule_engine::{IngestOptions, IntervalPolicy, ScheduleEvent};

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ConflictDto<'a> {
    event_a: &'a str,
    event_b: &'a str,
    overlap_minutes: i64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Events handed back by the app are already in the store, so they are
/// parsed leniently: an inverted interval is the detector's business, not an
/// input error.
fn parse_events_json(json: &str) -> Result<Vec<ScheduleEvent>, String> {
    let options = IngestOptions {
        policy: IntervalPolicy::Literal,
        ..IngestOptions::default()
    };
    schedule_engine::import_json(json, &options)
        .map_err(|e| format!("Invalid events JSON: {}", e))
}

fn options_for(timezone: &str, policy: Option<&str>) -> Result<IngestOptions, String> {
    let timezone = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let policy = match policy {
        Some(p) => p.parse()?,
        None => IntervalPolicy::default(),
    };
    Ok(IngestOptions { timezone, policy })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub fn conflicting_event_ids(events_json: &str) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let ids = schedule_engine::conflicting_event_ids(&events);
    to_json(&ids)
}

pub fn find_conflicts(events_json: &str) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let conflicts = schedule_engine::find_conflicts(&events);

    let dtos: Vec<ConflictDto> = conflicts
        .iter()
        .map(|c| ConflictDto {
            event_a: &c.event_a,
            event_b: &c.event_b,
            overlap_minutes: c.overlap_minutes,
        })
        .collect();
    to_json(&dtos)
}

pub fn parse_extraction(
    response: &str,
    timezone: &str,
    policy: Option<&str>,
) -> Result<String, String> {
    let options = options_for(timezone, policy)?;
    let events =
        schedule_engine::parse_extraction(response, &options).map_err(|e| e.to_string())?;
    to_json(&events)
}

pub fn export_ics(events_json: &str, stamp: &str) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let stamp: DateTime<Utc> = DateTime::parse_from_rfc3339(stamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid stamp '{}': {}", stamp, e))?;
    Ok(schedule_engine::export_ics(&events, stamp))
}

pub fn import_ics(text: &str, timezone: &str) -> Result<String, String> {
    let options = options_for(timezone, None)?;
    let events = schedule_engine::import_ics(text, &options).map_err(|e| e.to_string())?;
    to_json(&events)
}

pub fn import_json(text: &str, timezone: &str) -> Result<String, String> {
    let options = options_for(timezone, None)?;
    let events = schedule_engine::import_json(text, &options).map_err(|e| e.to_string())?;
    to_json(&events)
}

pub fn export_txt(events_json: &str, timezone: &str) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    Ok(schedule_engine::export_txt(&events, tz))
}

pub fn search_events(events_json: &str, term: &str) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let hits = sorted_by_start(search(&events, term));
    to_json(&hits)
}

pub fn demo_events(language: &str, anchor_date: &str, timezone: &str) -> Result<String, String> {
    let language: Language = language.parse()?;
    let anchor = NaiveDate::parse_from_str(anchor_date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid anchor date '{}': {}", anchor_date, e))?;
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    to_json(&schedule_engine::demo::demo_events(language, anchor, tz))
}
