//! Start-date parsing and display formatting.

use chrono::NaiveDate;

/// Day-first format used by the loan forms.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Shown wherever a date cannot be projected.
pub const UNKNOWN_DATE: &str = "DD/MM/YYYY";

const ACCEPTED_FORMATS: [&str; 2] = [DISPLAY_FORMAT, "%Y-%m-%d"];

/// Parse a start date typed as `DD/MM/YYYY` or ISO `YYYY-MM-DD`.
///
/// Returns `None` for blank or impossible dates (e.g. `31/02/2024`); callers
/// treat that as a schedule without calendar dates rather than an error.
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

pub fn format_display_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format(DISPLAY_FORMAT).to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}
