//! Writing the notifications calendar to disk.

use std::path::Path;

use crate::config::CalendarMetadata;
use crate::error::BirthdayResult;
use crate::ics::generate_calendar;
use crate::record::BirthdayRecord;

/// Serialize `records` into a new calendar at `path`, replacing any existing file.
pub fn write_calendar(
    records: &[BirthdayRecord],
    metadata: &CalendarMetadata,
    path: &Path,
) -> BirthdayResult<()> {
    let content = generate_calendar(records, metadata);

    std::fs::write(path, content.as_bytes())?;

    tracing::info!(path = %path.display(), events = records.len(), "Wrote birthday notifications");

    Ok(())
}
