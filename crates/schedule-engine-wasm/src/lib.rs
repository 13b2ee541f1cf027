//! WASM bindings for schedule-engine.
//!
//! Exposes conflict detection, extraction-response validation and the
//! ICS/JSON/TXT interchange formats to the browser app via `wasm-bindgen`.
//! All complex types are passed as JSON strings in the event schema
//! (`id`, `title`, `start`, `end`, `ocrConfidence`, `boundingBox`, ...).
//!
//! The exports are thin wrappers over [`bridge`], which holds the actual
//! logic with `String` errors so it can be tested on the host.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/schedule_engine_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

pub mod bridge;

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Ids of all events that overlap at least one other event.
///
/// `events_json` is a JSON array of events. Returns a JSON array of id
/// strings. Inverted intervals are accepted and compared literally.
#[wasm_bindgen(js_name = "getConflictingEventIds")]
pub fn conflicting_event_ids(events_json: &str) -> Result<String, JsValue> {
    bridge::conflicting_event_ids(events_json).map_err(js_err)
}

/// Every overlapping pair, with `event_a`, `event_b` and `overlap_minutes`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(events_json: &str) -> Result<String, JsValue> {
    bridge::find_conflicts(events_json).map_err(js_err)
}

/// Validate the raw text of an extraction response into events.
///
/// # Arguments
/// - `response` -- Raw model output (JSON array, possibly empty)
/// - `timezone` -- IANA timezone for offset-less timestamps (e.g., "Asia/Ho_Chi_Minh")
/// - `policy` -- Optional inverted-interval policy: "reject" (default) or "literal"
#[wasm_bindgen(js_name = "parseExtraction")]
pub fn parse_extraction(
    response: &str,
    timezone: &str,
    policy: Option<String>,
) -> Result<String, JsValue> {
    bridge::parse_extraction(response, timezone, policy.as_deref()).map_err(js_err)
}

/// Serialize events as an iCalendar document. `stamp` is an ISO 8601
/// datetime used as DTSTAMP.
#[wasm_bindgen(js_name = "exportIcs")]
pub fn export_ics(events_json: &str, stamp: &str) -> Result<String, JsValue> {
    bridge::export_ics(events_json, stamp).map_err(js_err)
}

/// Parse an iCalendar document into a JSON array of events.
#[wasm_bindgen(js_name = "importIcs")]
pub fn import_ics(text: &str, timezone: &str) -> Result<String, JsValue> {
    bridge::import_ics(text, timezone).map_err(js_err)
}

/// Validate a user-supplied JSON file into a normalized JSON array of events.
#[wasm_bindgen(js_name = "importJson")]
pub fn import_json(text: &str, timezone: &str) -> Result<String, JsValue> {
    bridge::import_json(text, timezone).map_err(js_err)
}

/// Render events as plain text with wall-clock times in `timezone`.
#[wasm_bindgen(js_name = "exportTxt")]
pub fn export_txt(events_json: &str, timezone: &str) -> Result<String, JsValue> {
    bridge::export_txt(events_json, timezone).map_err(js_err)
}

/// Events matching `term` (title, location, note), ordered by start.
#[wasm_bindgen(js_name = "searchEvents")]
pub fn search_events(events_json: &str, term: &str) -> Result<String, JsValue> {
    bridge::search_events(events_json, term).map_err(js_err)
}

/// The demo schedule for `language` ("en" or "vi") starting on `anchor_date`
/// (`YYYY-MM-DD`), at wall-clock times in `timezone`.
#[wasm_bindgen(js_name = "demoEvents")]
pub fn demo_events(language: &str, anchor_date: &str, timezone: &str) -> Result<String, JsValue> {
    bridge::demo_events(language, anchor_date, timezone).map_err(js_err)
}
