//! Report date formatting.
//!
//! Korean official documents write dates as `2024. 01. 05.`: zero-padded
//! month and day, each part followed by a period.

use chrono::{Local, NaiveDate};

use crate::error::{Error, Result};

/// chrono format string for report dates.
pub const REPORT_DATE_FORMAT: &str = "%Y. %m. %d.";

/// Format a date the way report headers show it.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

/// Today's date in the local time zone, formatted for a report.
pub fn today() -> String {
    format_report_date(Local::now().date_naive())
}

/// Parse a report date.
///
/// Accepts the report format as well as ISO `2024-01-05` and `2024.1.5`.
pub fn parse_report_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed
        .trim_end_matches('.')
        .split(['.', '-', '/'])
        .map(str::trim)
        .collect();

    let invalid = || Error::InvalidDate(trimmed.to_string());
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(invalid());
    }

    let year: i32 = parts[0].parse().map_err(|_| invalid())?;
    let month: u32 = parts[1].parse().map_err(|_| invalid())?;
    let day: u32 = parts[2].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Normalise any accepted date spelling to the report format.
pub fn normalize_report_date(text: &str) -> Result<String> {
    parse_report_date(text).map(format_report_date)
}
