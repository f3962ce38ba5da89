//! Core of the birthday notifications converter.
//!
//! Reads a contacts calendar (.ics) with birthday events and turns every
//! distinct birthday into a yearly recurring event in a fresh calendar:
//! - `loader` reads, deduplicates and transforms the source events
//! - `writer` maps records onto VEVENTs and writes the output file

pub mod config;
pub mod error;
pub mod ics;
pub mod loader;
pub mod record;
pub mod writer;

pub use crate::config::{CalendarMetadata, ConverterConfig};
pub use crate::error::{BirthdayError, BirthdayResult};
pub use crate::record::{BirthdayRecord, EventTime};
