//! # schedule-engine
//!
//! Conflict detection and event interchange for schedules extracted from
//! images.
//!
//! A photographed or scanned timetable is read by a multimodal model into a
//! list of events. This crate is everything after that call: it validates the
//! model's JSON into strict [`ScheduleEvent`]s, keeps the active schedule in a
//! [`ScheduleStore`], flags events whose times overlap, and moves schedules in
//! and out of iCalendar, JSON and plain text.
//!
//! ## Modules
//!
//! - [`conflict`]: Which events overlap at least one other (half-open intervals)
//! - [`store`]: Single-writer schedule container with change observers
//! - [`extract`]: Validate and coerce the extraction model's response
//! - [`ics`]: iCalendar export/import
//! - [`json`]: JSON export/import
//! - [`text`]: Plain-text export
//! - [`search`]: Event list filtering and ordering
//! - [`demo`]: Bundled demo schedule
//! - [`event`]: The event record and partial edits
//! - [`policy`]: Ingestion settings (inverted intervals, default timezone)
//! - [`timestamp`]: ISO 8601 / IANA timezone parsing
//! - [`error`]: Error types

pub mod conflict;
pub mod demo;
pub mod error;
pub mod event;
pub mod extract;
pub mod ics;
pub mod json;
pub mod policy;
mod record;
pub mod search;
pub mod store;
pub mod text;
pub mod timestamp;

pub use conflict::{conflicting_event_ids, find_conflicts, Conflict, ConflictSet};
pub use error::ScheduleError;
pub use event::{BoundingBox, EventPatch, ScheduleEvent};
pub use extract::parse_extraction;
pub use ics::{export_ics, import_ics};
pub use json::{export_json, import_json};
pub use policy::{IngestOptions, IntervalPolicy};
pub use store::{ScheduleStore, StoreChange, SubscriptionId};
pub use text::export_txt;
