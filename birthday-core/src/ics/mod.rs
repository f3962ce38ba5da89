//! ICS reading and writing.
//!
//! Parsing and generation both go through the icalendar crate; see RFC 5545.

mod generate;
mod parse;

pub use generate::{generate_calendar, timestamp};
pub use parse::{SourceEvent, parse_source_events};
