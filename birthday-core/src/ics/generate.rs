//! ICS generation for the notifications calendar.

use crate::config::CalendarMetadata;
use crate::record::{BirthdayRecord, EventField, EventTime, FieldValue};
use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, Property, ValueType};

const VERSION: &str = "2.0";
const CALSCALE: &str = "GREGORIAN";

/// Generate the whole notifications calendar as .ics text (CRLF line endings).
pub fn generate_calendar(records: &[BirthdayRecord], metadata: &CalendarMetadata) -> String {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("METHOD", &metadata.method));
    cal.append_property(Property::new("X-WR-CALNAME", &metadata.name));
    cal.append_property(Property::new("X-WR-TIMEZONE", &metadata.timezone));

    for record in records {
        cal.push(to_vevent(record));
    }
    let cal = cal.done();

    rewrite_header(&cal.to_string(), metadata)
}

/// Format a UTC timestamp the way RFC 5545 wants it (`20250320T150000Z`)
pub fn timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

fn to_vevent(record: &BirthdayRecord) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();

    for field in EventField::ALL {
        let name = field.property_name();
        match field.value(record) {
            FieldValue::Time(time) => add_datetime_property(&mut ics_event, name, time),
            FieldValue::Timestamp(dt) => {
                ics_event.add_property(name, timestamp(dt));
            }
            FieldValue::Text(text) => {
                ics_event.add_property(name, text);
            }
        }
    }

    ics_event.done()
}

/// Replace the header the icalendar crate emits with our own.
/// - PRODID comes from the metadata instead of the crate default
/// - VERSION and CALSCALE are written exactly once
fn rewrite_header(ics: &str, metadata: &CalendarMetadata) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut depth = 0usize;

    for line in ics.lines() {
        if line.starts_with("END:") {
            depth = depth.saturating_sub(1);
        }

        // Calendar-level header lines only; events keep theirs
        let is_header = depth == 1
            && (line.starts_with("PRODID:")
                || line.starts_with("VERSION:")
                || line.starts_with("CALSCALE:"));

        if !is_header {
            result.push_str(line);
            result.push_str("\r\n");
        }

        if line == "BEGIN:VCALENDAR" {
            result.push_str(&format!("PRODID:{}\r\n", metadata.prodid));
            result.push_str(&format!("VERSION:{VERSION}\r\n"));
            result.push_str(&format!("CALSCALE:{CALSCALE}\r\n"));
        }

        if line.starts_with("BEGIN:") {
            depth += 1;
        }
    }

    result
}

/// Add a datetime property with proper formatting based on EventTime variant
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTimeUtc(dt) => {
            ics_event.add_property(name, timestamp(*dt));
        }
        EventTime::DateTimeFloating(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%S").to_string());
        }
        EventTime::DateTimeZoned { datetime, tzid } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tzid);
            ics_event.append_property(prop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::YEARLY_RRULE;
    use chrono::{NaiveDate, TimeZone};

    fn make_record(summary: &str) -> BirthdayRecord {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        BirthdayRecord {
            start: EventTime::Date(NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()),
            end: EventTime::Date(NaiveDate::from_ymd_opt(2020, 5, 2).unwrap()),
            rrule: YEARLY_RRULE.to_string(),
            dtstamp: now,
            uid: "0123456789abcdef0123456789abcdef@google.com".to_string(),
            created: now,
            description: "alice-1".to_string(),
            last_modified: now,
            sequence: "0".to_string(),
            status: "CONFIRMED".to_string(),
            summary: summary.to_string(),
            transp: "TRANSPARENT".to_string(),
        }
    }

    fn count_lines(ics: &str, prefix: &str) -> usize {
        ics.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_generate_empty_calendar_has_metadata_only() {
        let ics = generate_calendar(&[], &CalendarMetadata::default());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"), "ICS:\n{}", ics);
        assert!(ics.trim_end().ends_with("END:VCALENDAR"), "ICS:\n{}", ics);
        assert!(ics.contains("PRODID:-//Birthday calendar//\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("VERSION:2.0\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("CALSCALE:GREGORIAN\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("METHOD:PUBLISH\r\n"), "ICS:\n{}", ics);
        assert!(
            ics.contains("X-WR-CALNAME:Birthday Notifications\r\n"),
            "ICS:\n{}",
            ics
        );
        assert!(ics.contains("X-WR-TIMEZONE:UTC\r\n"), "ICS:\n{}", ics);
        assert_eq!(count_lines(&ics, "BEGIN:VEVENT"), 0);
    }

    #[test]
    fn test_generate_header_lines_appear_once() {
        let ics = generate_calendar(&[make_record("Alice Birthday")], &CalendarMetadata::default());

        assert_eq!(count_lines(&ics, "PRODID:"), 1, "ICS:\n{}", ics);
        assert_eq!(count_lines(&ics, "VERSION:"), 1, "ICS:\n{}", ics);
        assert_eq!(count_lines(&ics, "CALSCALE:"), 1, "ICS:\n{}", ics);
        assert!(!ics.contains("ICALENDAR-RS"), "Crate PRODID leaked. ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_event_has_all_twelve_properties() {
        let ics = generate_calendar(&[make_record("Alice Birthday")], &CalendarMetadata::default());

        let vevent: String = ics
            .split("BEGIN:VEVENT")
            .nth(1)
            .unwrap()
            .split("END:VEVENT")
            .next()
            .unwrap()
            .to_string();

        for field in EventField::ALL {
            let name = field.property_name();
            let found = vevent
                .lines()
                .filter(|l| l.starts_with(&format!("{name}:")) || l.starts_with(&format!("{name};")))
                .count();
            assert_eq!(found, 1, "Expected one {} line. VEVENT:\n{}", name, vevent);
        }

        assert!(vevent.contains("DTSTART;VALUE=DATE:20200501"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("DTEND;VALUE=DATE:20200502"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("RRULE:FREQ=YEARLY"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("DTSTAMP:20250320T150000Z"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("CREATED:20250320T150000Z"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("LAST-MODIFIED:20250320T150000Z"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("DESCRIPTION:alice-1"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("SUMMARY:Alice Birthday"), "VEVENT:\n{}", vevent);
        assert!(vevent.contains("TRANSP:TRANSPARENT"), "VEVENT:\n{}", vevent);
    }

    #[test]
    fn test_generate_zoned_start_keeps_tzid() {
        let mut record = make_record("Carol Birthday");
        record.start = EventTime::DateTimeZoned {
            datetime: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            tzid: "Europe/Berlin".to_string(),
        };

        let ics = generate_calendar(&[record], &CalendarMetadata::default());

        let dtstart = ics
            .lines()
            .find(|l| l.starts_with("DTSTART"))
            .expect("Should have DTSTART line");
        assert!(dtstart.contains("TZID=Europe/Berlin"), "Got: {}", dtstart);
        assert!(dtstart.ends_with(":20240101T100000"), "Got: {}", dtstart);
    }

    #[test]
    fn test_generate_uses_custom_metadata() {
        let metadata = CalendarMetadata {
            prodid: "-//Family//".to_string(),
            name: "Family Birthdays".to_string(),
            timezone: "Europe/Moscow".to_string(),
            method: "PUBLISH".to_string(),
        };

        let ics = generate_calendar(&[], &metadata);

        assert!(ics.contains("PRODID:-//Family//\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("X-WR-CALNAME:Family Birthdays\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("X-WR-TIMEZONE:Europe/Moscow\r\n"), "ICS:\n{}", ics);
    }
}
