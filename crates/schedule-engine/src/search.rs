//! Filtering and ordering for the event list view.

use crate::event::ScheduleEvent;

/// Events whose title, location or note contains `term`, case-insensitively.
///
/// An empty term matches everything. The term is not trimmed, so spaces in
/// it must match too. Input order is preserved.
pub fn search<'a>(events: &'a [ScheduleEvent], term: &str) -> Vec<&'a ScheduleEvent> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return events.iter().collect();
    }

    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&needle));

    events
        .iter()
        .filter(|e| {
            contains(Some(e.title.as_str()))
                || contains(e.location.as_deref())
                || contains(e.note.as_deref())
        })
        .collect()
}

/// Events ordered by start time. Ties keep their input order.
pub fn sorted_by_start<'a, I>(events: I) -> Vec<&'a ScheduleEvent>
where
    I: IntoIterator<Item = &'a ScheduleEvent>,
{
    let mut sorted: Vec<&ScheduleEvent> = events.into_iter().collect();
    sorted.sort_by_key(|e| e.start);
    sorted
}
