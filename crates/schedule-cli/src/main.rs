//! `schedule` CLI: check schedules for conflicts and convert them between
//! iCalendar, JSON and plain text from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Ids of overlapping events (stdin → stdout)
//! cat schedule.json | schedule conflicts
//!
//! # Overlapping pairs with overlap length, failing the shell if any exist
//! schedule conflicts -i schedule.ics --pairs --check
//!
//! # Validate a raw extraction response into the event schema
//! schedule --tz Asia/Ho_Chi_Minh normalize -i response.json -o schedule.json
//!
//! # Convert between formats
//! schedule import -i calendar.ics -o schedule.json
//! schedule export -i schedule.json --to ics -o schedule.ics
//! schedule export -i schedule.json --to txt
//!
//! # Search the event list
//! schedule search lab -i schedule.json
//!
//! # Print the demo schedule
//! schedule demo --lang vi --date 2026-03-02
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use schedule_engine::demo::Language;
use schedule_engine::search::{search, sorted_by_start};
use schedule_engine::timestamp::parse_timezone;
use schedule_engine::{IngestOptions, IntervalPolicy, ScheduleEvent};
use std::io::{self, Read};
use std::path::Path;
use std::process;

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Conflict detection and ICS/JSON/text conversion for schedules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA timezone for timestamps without an offset and for text output
    #[arg(long, global = true, env = "SCHEDULE_TZ", default_value = "UTC")]
    tz: String,

    /// What to do with events that end before they start: reject or literal
    #[arg(long, global = true, default_value = "reject")]
    policy: IntervalPolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Ics,
    Json,
    Txt,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ids of events that overlap another event
    Conflicts {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Input format (guessed from the file extension, JSON for stdin)
        #[arg(long, value_enum)]
        from: Option<Format>,
        /// Print every overlapping pair with its overlap in minutes
        #[arg(long)]
        pairs: bool,
        /// Exit with status 2 if any conflict is found
        #[arg(long)]
        check: bool,
    },
    /// Validate a raw extraction response into the event schema
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Read an ICS or JSON file and print it as event JSON
    Import {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Input format (guessed from the file extension, JSON for stdin)
        #[arg(long, value_enum)]
        from: Option<Format>,
    },
    /// Convert event JSON to ICS, JSON or text
    Export {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format
        #[arg(long, value_enum)]
        to: Format,
    },
    /// Print events whose title, location or note contains TERM, earliest first
    Search {
        term: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the bundled demo schedule as event JSON
    Demo {
        /// Language of the demo content: en or vi
        #[arg(long, default_value = "en")]
        lang: Language,
        /// First day of the demo (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let tz = parse_timezone(&cli.tz).context("Invalid --tz")?;
    let options = IngestOptions {
        timezone: tz,
        policy: cli.policy,
    };

    match cli.command {
        Commands::Conflicts {
            input,
            from,
            pairs,
            check,
        } => {
            let events = read_events(input.as_deref(), from, &options)?;

            let found = if pairs {
                let conflicts = schedule_engine::find_conflicts(&events);
                let rows: Vec<serde_json::Value> = conflicts
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "event_a": c.event_a,
                            "event_b": c.event_b,
                            "overlap_minutes": c.overlap_minutes,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
                !conflicts.is_empty()
            } else {
                let ids = schedule_engine::conflicting_event_ids(&events);
                println!("{}", serde_json::to_string_pretty(&ids)?);
                !ids.is_empty()
            };

            if check && found {
                process::exit(2);
            }
        }
        Commands::Normalize { input, output } => {
            let response = read_input(input.as_deref())?;
            let events = schedule_engine::parse_extraction(&response, &options)
                .context("Failed to normalize extraction response")?;
            let json = schedule_engine::export_json(&events)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Import {
            input,
            output,
            from,
        } => {
            let events = read_events(input.as_deref(), from, &options)?;
            let json = schedule_engine::export_json(&events)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Export { input, output, to } => {
            let events = read_events(input.as_deref(), Some(Format::Json), &options)?;
            let content = match to {
                Format::Ics => schedule_engine::export_ics(&events, Utc::now()),
                Format::Json => schedule_engine::export_json(&events)?,
                Format::Txt => schedule_engine::export_txt(&events, tz),
            };
            write_output(output.as_deref(), &content)?;
        }
        Commands::Search { term, input } => {
            let events = read_events(input.as_deref(), None, &options)?;
            let hits = sorted_by_start(search(&events, &term));
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Commands::Demo { lang, date } => {
            let anchor = date.unwrap_or_else(|| today(tz));
            let events = schedule_engine::demo::demo_events(lang, anchor, tz);
            println!("{}", schedule_engine::export_json(&events)?);
        }
    }

    Ok(())
}

fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Pick the input format: explicit flag, then file extension, then JSON.
fn detect_format(path: Option<&str>, explicit: Option<Format>) -> Format {
    if let Some(format) = explicit {
        return format;
    }
    let extension = path
        .and_then(|p| Path::new(p).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("ics") | Some("ical") => Format::Ics,
        _ => Format::Json,
    }
}

fn read_events(
    path: Option<&str>,
    from: Option<Format>,
    options: &IngestOptions,
) -> Result<Vec<ScheduleEvent>> {
    let text = read_input(path)?;
    let events = match detect_format(path, from) {
        Format::Ics => {
            schedule_engine::import_ics(&text, options).context("Failed to import ICS")?
        }
        Format::Json => {
            schedule_engine::import_json(&text, options).context("Failed to import JSON")?
        }
        Format::Txt => anyhow::bail!("Text is an export-only format"),
    };
    tracing::debug!(count = events.len(), "loaded events");
    Ok(events)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
