//! Detect overlapping events within a single schedule.
//!
//! Two events conflict when their half-open intervals overlap:
//! `a.start < b.end && b.start < a.end`. Adjacent events (where one ends
//! exactly when another starts) are NOT conflicts.
//!
//! The detector is a pure function of the collection it is handed. It never
//! fails and never rejects input; inverted intervals (`end < start`) are run
//! through the same literal comparison as everything else.

use std::collections::BTreeSet;

use crate::event::ScheduleEvent;

/// Identifiers of every event that overlaps at least one other event.
///
/// Membership only: an event overlapping three others appears once.
pub type ConflictSet = BTreeSet<String>;

/// A detected conflict between two events of the same schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub event_a: String,
    pub event_b: String,
    pub overlap_minutes: i64,
}

/// Find the ids of all events that overlap at least one other event.
///
/// Sweep-line over events sorted by start: each event is tested only against
/// the events still active at its start. Events with an inverted interval
/// cannot be placed on the sweep without changing the comparison, so they are
/// tested against every other event directly. The result is identical to
/// [`conflicting_event_ids_pairwise`].
pub fn conflicting_event_ids(events: &[ScheduleEvent]) -> ConflictSet {
    let mut conflicts = ConflictSet::new();
    if events.len() < 2 {
        return conflicts;
    }

    let (mut ordered, inverted): (Vec<&ScheduleEvent>, Vec<&ScheduleEvent>) =
        events.iter().partition(|e| !e.is_inverted());
    ordered.sort_by_key(|e| e.start);

    let mut active: Vec<&ScheduleEvent> = Vec::new();
    for event in &ordered {
        // Anything ending at or before this start cannot overlap it, nor any
        // later event in start order.
        active.retain(|a| a.end > event.start);

        for other in &active {
            if other.overlaps(event) {
                conflicts.insert(other.id.clone());
                conflicts.insert(event.id.clone());
            }
        }

        active.push(event);
    }

    for (i, event) in inverted.iter().enumerate() {
        // Pairs among inverted events are visited once; pairs against the
        // well-formed events are visited here and nowhere else.
        let later_inverted = inverted[i + 1..].iter();
        for other in ordered.iter().chain(later_inverted) {
            if event.overlaps(other) {
                conflicts.insert(event.id.clone());
                conflicts.insert(other.id.clone());
            }
        }
    }

    tracing::debug!(
        events = events.len(),
        conflicting = conflicts.len(),
        "computed conflict set"
    );

    conflicts
}

/// Reference implementation: test every unordered pair.
///
/// Quadratic in the number of events. Kept public for callers that want the
/// straightforward definition, and as the oracle the sweep is checked against.
pub fn conflicting_event_ids_pairwise(events: &[ScheduleEvent]) -> ConflictSet {
    let mut conflicts = ConflictSet::new();

    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            if a.overlaps(b) {
                conflicts.insert(a.id.clone());
                conflicts.insert(b.id.clone());
            }
        }
    }

    conflicts
}

/// Find all overlapping pairs in a schedule, in input order.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
/// Each unordered pair is reported once, with `event_a` being the one that
/// appears first in `events`.
pub fn find_conflicts(events: &[ScheduleEvent]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            if a.overlaps(b) {
                let overlap_start = a.start.max(b.start);
                let overlap_end = a.end.min(b.end);
                let overlap_minutes = (overlap_end - overlap_start).num_minutes();

                conflicts.push(Conflict {
                    event_a: a.id.clone(),
                    event_b: b.id.clone(),
                    overlap_minutes,
                });
            }
        }
    }

    conflicts
}
