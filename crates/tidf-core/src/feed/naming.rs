//! Remote filename, URL and target date derivation.

use chrono::NaiveDate;

use super::FeedId;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The day whose files are fetched: the calendar day before `today`.
///
/// Returns `None` only at the minimum representable date.
pub fn target_date(today: NaiveDate) -> Option<NaiveDate> {
    today.pred_opt()
}

/// `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date (e.g. from `--date`).
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

/// `tidf.<date>.daily.<feed>.gz`
pub fn remote_filename(date: NaiveDate, feed: &FeedId) -> String {
    format!("tidf.{}.daily.{}.gz", format_date(date), feed)
}

/// Base URL (with trailing slash) followed by the remote filename.
pub fn remote_url(base_url: &str, filename: &str) -> String {
    format!("{}{}", base_url, filename)
}
