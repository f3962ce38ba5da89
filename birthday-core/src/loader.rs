//! Loading the contacts calendar and turning birthdays into records.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::DEFAULT_UID_SUFFIX;
use crate::error::{BirthdayError, BirthdayResult};
use crate::ics::{SourceEvent, parse_source_events};
use crate::record::{BirthdayRecord, EventTime, MISSING_PLACEHOLDER, YEARLY_RRULE};

/// Settings the transformer needs besides the events themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Appended to every generated UID
    pub uid_suffix: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            uid_suffix: DEFAULT_UID_SUFFIX.to_string(),
        }
    }
}

/// Read the contacts calendar at `path` and build one record per distinct summary.
///
/// A file that cannot be read is logged and yields no records. Content that
/// does not parse, or a kept event without DTSTART/DTEND, fails the run.
pub fn load_records(path: &Path, options: &LoaderOptions) -> BirthdayResult<Vec<BirthdayRecord>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Could not open contacts calendar");
            return Ok(Vec::new());
        }
    };

    tracing::info!(path = %path.display(), "Reading events from contacts calendar");

    let content = String::from_utf8(bytes).map_err(|e| {
        BirthdayError::IcsParse(format!("{} is not valid UTF-8: {e}", path.display()))
    })?;
    let events = parse_source_events(&content)?;
    let records = transform(&events, options)?;

    tracing::info!(count = records.len(), "Created birthday events");

    Ok(records)
}

/// Deduplicate events by summary (first one wins) and build their records.
pub fn transform(
    events: &[SourceEvent],
    options: &LoaderOptions,
) -> BirthdayResult<Vec<BirthdayRecord>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for event in events {
        let summary = text_or_placeholder(event.summary.as_deref());
        if seen.contains(&summary) {
            tracing::debug!(summary = %summary, "Skipping duplicate birthday");
            continue;
        }

        let record = to_record(event, &summary, Utc::now(), options)?;
        seen.insert(summary);
        records.push(record);
    }

    Ok(records)
}

/// Build a record, stamping DTSTAMP, CREATED and LAST-MODIFIED with the same `now`.
fn to_record(
    event: &SourceEvent,
    summary: &str,
    now: DateTime<Utc>,
    options: &LoaderOptions,
) -> BirthdayResult<BirthdayRecord> {
    Ok(BirthdayRecord {
        start: required_time(event.start.as_ref(), summary, "DTSTART")?,
        end: required_time(event.end.as_ref(), summary, "DTEND")?,
        rrule: YEARLY_RRULE.to_string(),
        dtstamp: now,
        uid: generate_uid(&options.uid_suffix),
        created: now,
        description: text_or_placeholder(event.uid.as_deref()),
        last_modified: now,
        sequence: text_or_placeholder(event.sequence.as_deref()),
        status: text_or_placeholder(event.status.as_deref()),
        summary: summary.to_string(),
        transp: text_or_placeholder(event.transp.as_deref()),
    })
}

fn required_time(
    time: Option<&EventTime>,
    summary: &str,
    property: &'static str,
) -> BirthdayResult<EventTime> {
    time.cloned().ok_or_else(|| BirthdayError::MissingProperty {
        summary: summary.to_string(),
        property,
    })
}

/// 32 lowercase hex digits of a random UUID followed by `suffix`
fn generate_uid(suffix: &str) -> String {
    format!("{}{}", Uuid::new_v4().simple(), suffix)
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(MISSING_PLACEHOLDER).to_string()
}
