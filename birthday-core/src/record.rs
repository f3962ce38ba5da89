//! Birthday notification records and the fixed VEVENT property table.
//!
//! A `BirthdayRecord` is built once per distinct source birthday and never
//! modified afterwards. The writer turns it into a VEVENT by walking
//! `EventField::ALL` in order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recurrence rule applied to every notification event.
pub const YEARLY_RRULE: &str = "FREQ=YEARLY";

/// Text used for a source property that is not present.
pub const MISSING_PLACEHOLDER: &str = "None";

/// Start or end of an event, kept in the form the source calendar used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),
    /// UTC datetime (`Z` suffix)
    DateTimeUtc(DateTime<Utc>),
    /// Floating datetime (no zone)
    DateTimeFloating(NaiveDateTime),
    /// Local datetime with a `TZID` parameter
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeUtc(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            EventTime::DateTimeZoned { datetime, tzid } => {
                write!(f, "{} ({})", datetime.format("%Y-%m-%d %H:%M:%S"), tzid)
            }
        }
    }
}

/// A yearly birthday notification derived from one source VEVENT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    pub start: EventTime,
    pub end: EventTime,
    /// Always `FREQ=YEARLY`
    pub rrule: String,
    pub dtstamp: DateTime<Utc>,
    /// Freshly generated, never the source UID
    pub uid: String,
    pub created: DateTime<Utc>,
    /// UID of the source event
    pub description: String,
    pub last_modified: DateTime<Utc>,
    pub sequence: String,
    pub status: String,
    pub summary: String,
    pub transp: String,
}

/// Value of one record field as the writer needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Time(&'a EventTime),
    Timestamp(DateTime<Utc>),
    Text(&'a str),
}

/// The twelve VEVENT properties written for every record, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Start,
    End,
    Rrule,
    Dtstamp,
    Uid,
    Created,
    Description,
    LastModified,
    Sequence,
    Status,
    Summary,
    Transp,
}

impl EventField {
    pub const ALL: [EventField; 12] = [
        EventField::Start,
        EventField::End,
        EventField::Rrule,
        EventField::Dtstamp,
        EventField::Uid,
        EventField::Created,
        EventField::Description,
        EventField::LastModified,
        EventField::Sequence,
        EventField::Status,
        EventField::Summary,
        EventField::Transp,
    ];

    /// iCalendar property name
    pub fn property_name(self) -> &'static str {
        match self {
            EventField::Start => "DTSTART",
            EventField::End => "DTEND",
            EventField::Rrule => "RRULE",
            EventField::Dtstamp => "DTSTAMP",
            EventField::Uid => "UID",
            EventField::Created => "CREATED",
            EventField::Description => "DESCRIPTION",
            EventField::LastModified => "LAST-MODIFIED",
            EventField::Sequence => "SEQUENCE",
            EventField::Status => "STATUS",
            EventField::Summary => "SUMMARY",
            EventField::Transp => "TRANSP",
        }
    }

    pub fn value(self, record: &BirthdayRecord) -> FieldValue<'_> {
        match self {
            EventField::Start => FieldValue::Time(&record.start),
            EventField::End => FieldValue::Time(&record.end),
            EventField::Rrule => FieldValue::Text(&record.rrule),
            EventField::Dtstamp => FieldValue::Timestamp(record.dtstamp),
            EventField::Uid => FieldValue::Text(&record.uid),
            EventField::Created => FieldValue::Timestamp(record.created),
            EventField::Description => FieldValue::Text(&record.description),
            EventField::LastModified => FieldValue::Timestamp(record.last_modified),
            EventField::Sequence => FieldValue::Text(&record.sequence),
            EventField::Status => FieldValue::Text(&record.status),
            EventField::Summary => FieldValue::Text(&record.summary),
            EventField::Transp => FieldValue::Text(&record.transp),
        }
    }
}
