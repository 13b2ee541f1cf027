//! iCalendar (RFC 5545) export and import.
//!
//! Only a small subset is supported: one `VCALENDAR` of `VEVENT`s with
//! UID, DTSTAMP, DTSTART, DTEND, SUMMARY, LOCATION and DESCRIPTION. Recurrence,
//! attendees and alarms are not modelled.
//!
//! # Key design decisions
//!
//! - **Instructor in DESCRIPTION**: there is no standard property for the
//!   instructor, so export writes an `Instructor: <name>` line at the top of
//!   DESCRIPTION and import splits it back out.
//! - **Lenient import**: a `VEVENT` missing its start, end or summary is
//!   skipped with a warning rather than failing the file. Only a file with no
//!   usable events at all is an error.
//! - **Times**: export always writes UTC (`...Z`). Import also accepts
//!   floating times (interpreted in the caller's zone), `TZID=` parameters and
//!   all-day `VALUE=DATE` values.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};
use crate::event::{non_blank, ScheduleEvent};
use crate::policy::IngestOptions;
use crate::timestamp::{localize, parse_timezone};

const PRODID: &str = "-//ScheduleFromImage//EN";
const UID_DOMAIN: &str = "schedulefromimage.com";
const INSTRUCTOR_PREFIX: &str = "Instructor:";

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Serialize events as an iCalendar document.
///
/// `stamp` is written as every event's DTSTAMP (the time the file was made).
pub fn export_ics(events: &[ScheduleEvent], stamp: DateTime<Utc>) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{}", PRODID));

    for event in events {
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}@{}", event.id, UID_DOMAIN));
        push_line(&mut out, &format!("DTSTAMP:{}", format_utc(stamp)));
        push_line(&mut out, &format!("DTSTART:{}", format_utc(event.start)));
        push_line(&mut out, &format!("DTEND:{}", format_utc(event.end)));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.title)));
        if let Some(location) = &event.location {
            push_line(&mut out, &format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(description) = description_for(event) {
            let line = format!("DESCRIPTION:{}", escape_text(&description));
            push_line(&mut out, &line);
        }
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

fn description_for(event: &ScheduleEvent) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(instructor) = &event.instructor {
        parts.push(format!("{} {}", INSTRUCTOR_PREFIX, instructor));
    }
    if let Some(note) = &event.note {
        parts.push(note.clone());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Escape a TEXT value (RFC 5545 §3.3.11).
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse the `VEVENT`s of an iCalendar document.
///
/// # Errors
/// - `ScheduleError::NoEvents` if no `VEVENT` has a start, an end and a title.
/// - `ScheduleError::InvertedInterval` under `IntervalPolicy::Reject`.
pub fn import_ics(text: &str, options: &IngestOptions) -> Result<Vec<ScheduleEvent>> {
    let mut drafts = Vec::new();
    let mut current: Option<Draft> = None;
    // Depth of components nested inside the current VEVENT (VALARM etc.).
    let mut nested = 0usize;

    for (line_no, line) in unfold(text).iter().enumerate() {
        let Some(property) = Property::parse(line) else {
            continue;
        };
        let is_vevent = property.value.trim().eq_ignore_ascii_case("VEVENT");

        let Some(draft) = current.as_mut() else {
            if property.name == "BEGIN" && is_vevent {
                current = Some(Draft::default());
                nested = 0;
            }
            continue;
        };

        match property.name.as_str() {
            "BEGIN" => nested += 1,
            "END" if nested > 0 => nested -= 1,
            "END" if is_vevent => {
                if let Some(draft) = current.take() {
                    drafts.push(draft);
                }
            }
            _ if nested == 0 => {
                if let Err(e) = draft.apply(&property, options.timezone) {
                    tracing::warn!(line = line_no + 1, error = %e, "ignoring ICS property");
                }
            }
            _ => {}
        }
    }

    let events = finish_drafts(drafts)?;
    for event in &events {
        event.check_interval(options.policy)?;
    }

    tracing::debug!(count = events.len(), "imported events from ICS");
    Ok(events)
}

/// Join folded lines: a line starting with a space or tab continues the
/// previous one. Only the line break and that single leading character are
/// removed; whitespace before the fold belongs to the value.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        match (raw.strip_prefix([' ', '\t']), lines.last_mut()) {
            (Some(continuation), Some(last)) => last.push_str(continuation),
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}

/// One content line: `NAME;PARAM=VALUE;...:value`.
#[derive(Debug)]
struct Property {
    name: String,
    params: Vec<(String, String)>,
    value: String,
}

impl Property {
    fn parse(line: &str) -> Option<Self> {
        // The name/value separator is the first colon outside a quoted
        // parameter value.
        let mut in_quotes = false;
        let colon = line.char_indices().find_map(|(i, c)| match c {
            '"' => {
                in_quotes = !in_quotes;
                None
            }
            ':' if !in_quotes => Some(i),
            _ => None,
        })?;

        let (head, value) = (&line[..colon], &line[colon + 1..]);
        let mut segments = head.split(';');
        let name = segments.next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }
        let params = segments
            .filter_map(|segment| segment.split_once('='))
            .map(|(k, v)| {
                let key = k.trim().to_ascii_uppercase();
                (key, v.trim().trim_matches('"').to_string())
            })
            .collect();

        Some(Self {
            name,
            params,
            value: value.to_string(),
        })
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A VEVENT being assembled.
#[derive(Debug, Default)]
struct Draft {
    uid: Option<String>,
    title: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    location: Option<String>,
    instructor: Option<String>,
    note: Option<String>,
}

impl Draft {
    fn apply(&mut self, property: &Property, tz: Tz) -> Result<()> {
        match property.name.as_str() {
            "UID" => {
                let uid = match property.value.rsplit_once('@') {
                    Some((local, _)) => local,
                    None => property.value.as_str(),
                };
                self.uid = non_blank(Some(uid.to_string()));
            }
            "DTSTART" => self.start = Some(parse_ics_datetime(property, tz)?),
            "DTEND" => self.end = Some(parse_ics_datetime(property, tz)?),
            "SUMMARY" => self.title = non_blank(Some(unescape_text(&property.value))),
            "LOCATION" => self.location = non_blank(Some(unescape_text(&property.value))),
            "DESCRIPTION" => {
                let (instructor, note) = split_description(&unescape_text(&property.value));
                self.instructor = instructor;
                self.note = note;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Turn drafts into events, skipping incomplete ones and assigning ids to
/// events without a usable UID.
fn finish_drafts(drafts: Vec<Draft>) -> Result<Vec<ScheduleEvent>> {
    let mut pending: Vec<(Option<String>, ScheduleEvent)> = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let (Some(title), Some(start), Some(end)) = (draft.title, draft.start, draft.end) else {
            tracing::warn!(index, "skipping VEVENT without start, end and summary");
            continue;
        };
        let mut event = ScheduleEvent::new(String::new(), title, start, end);
        event.location = draft.location;
        event.instructor = draft.instructor;
        event.note = draft.note;
        pending.push((draft.uid, event));
    }

    if pending.is_empty() {
        return Err(ScheduleError::NoEvents);
    }

    // Every explicit UID is reserved up front so a generated id never
    // collides with one that appears later in the file.
    let explicit: HashSet<String> = pending.iter().filter_map(|(uid, _)| uid.clone()).collect();
    let mut used: HashSet<String> = HashSet::with_capacity(pending.len());
    let mut counter = 0usize;

    let mut events = Vec::with_capacity(pending.len());
    for (uid, mut event) in pending {
        event.id = match uid {
            Some(uid) if !used.contains(&uid) => uid,
            other => {
                if let Some(dup) = other {
                    tracing::warn!(uid = %dup, "duplicate UID in ICS file, assigning a new id");
                }
                loop {
                    counter += 1;
                    let candidate = format!("imported-{}", counter);
                    if !explicit.contains(&candidate) && !used.contains(&candidate) {
                        break candidate;
                    }
                }
            }
        };
        used.insert(event.id.clone());
        events.push(event);
    }

    Ok(events)
}

/// Parse a DATE-TIME or DATE property value.
fn parse_ics_datetime(property: &Property, default_tz: Tz) -> Result<DateTime<Utc>> {
    let value = property.value.trim();
    let invalid = || ScheduleError::InvalidTimestamp(value.to_string());

    if let Some(utc) = value.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
            .map(|ndt| ndt.and_utc())
            .map_err(|_| invalid());
    }

    let tz = match property.param("TZID") {
        Some(name) => parse_timezone(name)?,
        None => default_tz,
    };

    let is_date = property
        .param("VALUE")
        .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
        || value.len() == 8;
    let ndt = if is_date {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    } else {
        NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()
    }
    .ok_or_else(invalid)?;

    localize(ndt, tz).ok_or_else(invalid)
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Split a DESCRIPTION into (instructor, note).
///
/// The instructor is the rest of the first line that starts with
/// `Instructor:`; that line is removed and whatever remains is the note.
fn split_description(description: &str) -> (Option<String>, Option<String>) {
    let line_start = description
        .match_indices(INSTRUCTOR_PREFIX)
        .map(|(i, _)| i)
        .find(|&i| i == 0 || description[..i].ends_with('\n'));
    let Some(at) = line_start else {
        return (None, non_blank(Some(description.to_string())));
    };

    let after = &description[at + INSTRUCTOR_PREFIX.len()..];
    let line_len = after.find('\n').unwrap_or(after.len());
    let instructor = non_blank(Some(after[..line_len].to_string()));
    if instructor.is_none() {
        return (None, non_blank(Some(description.to_string())));
    }

    let rest_start = (line_len + 1).min(after.len());
    let note = format!("{}{}", &description[..at], &after[rest_start..]);
    (instructor, non_blank(Some(note)))
}
