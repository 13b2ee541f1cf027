//! Plain-text export for printing or pasting into a message.

use chrono_tz::Tz;

use crate::event::ScheduleEvent;
use crate::search::sorted_by_start;

/// Render events as a human-readable list, earliest first.
///
/// Dates and times are shown as wall-clock values in `tz` (`M/D/YYYY`,
/// 24-hour `HH:MM`). Lines end with CRLF.
pub fn export_txt(events: &[ScheduleEvent], tz: Tz) -> String {
    let mut out = String::from("Schedule Events\r\n\r\n");

    for event in sorted_by_start(events) {
        let start = event.start.with_timezone(&tz);
        let end = event.end.with_timezone(&tz);

        out.push_str(&format!("Event: {}\r\n", event.title));
        out.push_str(&format!(
            "  - Time: {} {} - {}\r\n",
            start.format("%-m/%-d/%Y"),
            start.format("%H:%M"),
            end.format("%H:%M")
        ));
        if let Some(location) = &event.location {
            out.push_str(&format!("  - Location: {}\r\n", location));
        }
        if let Some(instructor) = &event.instructor {
            out.push_str(&format!("  - Instructor: {}\r\n", instructor));
        }
        if let Some(note) = &event.note {
            out.push_str(&format!("  - Note: {}\r\n", note));
        }
        out.push_str("\r\n");
    }

    out
}
