//! Reading source VEVENTs with the icalendar crate's parser.

use crate::error::{BirthdayError, BirthdayResult};
use crate::record::EventTime;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

/// The parts of a contacts-calendar VEVENT that the transformer reads.
///
/// Text fields hold the raw property value, `None` when the property is
/// absent. Start and end are only checked for presence when the event is
/// actually turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEvent {
    pub uid: Option<String>,
    pub sequence: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub transp: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

/// Parse ICS content and return every VEVENT in document order.
///
/// Components are walked depth-first, so events nested below other
/// components are found too. Anything that is not a VEVENT is ignored.
pub fn parse_source_events(content: &str) -> BirthdayResult<Vec<SourceEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| BirthdayError::IcsParse(e.to_string()))?;

    let mut events = Vec::new();
    for component in &calendar.components {
        collect_events(component, &mut events)?;
    }
    Ok(events)
}

fn collect_events(component: &Component<'_>, events: &mut Vec<SourceEvent>) -> BirthdayResult<()> {
    if component.name == "VEVENT" {
        events.push(to_source_event(component)?);
    }
    for child in &component.components {
        collect_events(child, events)?;
    }
    Ok(())
}

fn to_source_event(vevent: &Component<'_>) -> BirthdayResult<SourceEvent> {
    let text = |name: &str| vevent.find_prop(name).map(|p| p.val.to_string());

    Ok(SourceEvent {
        uid: text("UID"),
        sequence: text("SEQUENCE"),
        status: text("STATUS"),
        summary: text("SUMMARY"),
        transp: text("TRANSP"),
        start: parse_time(vevent, "DTSTART")?,
        end: parse_time(vevent, "DTEND")?,
    })
}

/// Absent property is `Ok(None)`, an unreadable value is a parse error.
fn parse_time(vevent: &Component<'_>, name: &str) -> BirthdayResult<Option<EventTime>> {
    let Some(prop) = vevent.find_prop(name) else {
        return Ok(None);
    };

    let dpt = DatePerhapsTime::try_from(prop).map_err(|_| {
        BirthdayError::IcsParse(format!("invalid {} value '{}'", name, prop.val.as_ref()))
    })?;

    Ok(Some(to_event_time(dpt)))
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}
