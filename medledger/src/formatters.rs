//! Display formatting for raw API field values.
//!
//! Every function here is total: missing (empty) input yields an empty
//! string, and input that cannot be interpreted is passed through unchanged.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::fmt;

/// Pattern used for date-only display.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pattern used for date + time display.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of leading address characters kept by [`format_address`].
pub const ADDRESS_START_LEN: usize = 8;

/// Default number of trailing address characters kept by [`format_address`].
pub const ADDRESS_END_LEN: usize = 6;

/// Fewest digits an epoch-milliseconds value can have (anything from 1973 on).
const EPOCH_MILLIS_MIN_DIGITS: usize = 11;

/// A parsed date-like value, already in local wall-clock time.
enum Moment {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

fn parse_moment(input: &str) -> Option<Moment> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        // A bare year, as in "2024"
        if s.len() == 4 {
            return s
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
                .map(Moment::Date);
        }
        // Epoch milliseconds; shorter digit runs are not timestamps
        if s.len() >= EPOCH_MILLIS_MIN_DIGITS {
            return s
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| Moment::DateTime(dt.with_timezone(&Local).naive_local()));
        }
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Moment::DateTime(dt.with_timezone(&Local).naive_local()));
    }

    // Timestamps without an offset are already local wall-clock time
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(Moment::DateTime(naive));
        }
    }

    // Full date, or year and month only
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), DATE_FORMAT))
        .ok()
        .map(Moment::Date)
}

/// Format a date-like value as a local date.
///
/// Plain `YYYY-MM-DD` dates (dates of birth, record dates) are rendered as-is
/// and never shifted across a timezone boundary.
pub fn format_date(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    match parse_moment(input) {
        Some(Moment::Date(date)) => date.format(DATE_FORMAT).to_string(),
        Some(Moment::DateTime(dt)) => dt.date().format(DATE_FORMAT).to_string(),
        None => input.to_string(),
    }
}

/// Format a timestamp-like value as a local date and time.
pub fn format_date_time(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    match parse_moment(input) {
        Some(Moment::DateTime(dt)) => dt.format(DATE_TIME_FORMAT).to_string(),
        Some(Moment::Date(date)) => date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
            .unwrap_or_else(|| input.to_string()),
        None => input.to_string(),
    }
}

/// Truncate an address to `0x123456...abcdef` form using the default 8/6 split.
pub fn format_address(address: &str) -> String {
    format_address_with(address, ADDRESS_START_LEN, ADDRESS_END_LEN)
}

/// Truncate an address keeping `start` leading and `end` trailing characters.
///
/// Addresses no longer than `start + end` are returned unmodified.
pub fn format_address_with(address: &str, start: usize, end: usize) -> String {
    let len = address.chars().count();
    if len <= start + end {
        return address.to_string();
    }
    let head: String = address.chars().take(start).collect();
    let tail: String = address.chars().skip(len - end).collect();
    format!("{}...{}", head, tail)
}

/// Render a transaction type such as `consent_granted` as `consent granted`.
pub fn format_transaction_type(tx_type: &str) -> String {
    tx_type.replace('_', " ")
}

/// Render an amount the API sent as a JSON number or string, with its currency.
pub fn format_amount(amount: &serde_json::Value, currency: &str) -> String {
    let amount = match amount {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match (amount.is_empty(), currency.is_empty()) {
        (true, _) => String::new(),
        (false, true) => amount,
        (false, false) => format!("{} {}", amount, currency),
    }
}

/// Display category of a medical record, derived from its free-form type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTypeClass {
    Lab,
    Treatment,
    /// Fallback for every type that is neither lab nor treatment.
    Diagnostic,
}

impl RecordTypeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordTypeClass::Lab => "lab",
            RecordTypeClass::Treatment => "treatment",
            RecordTypeClass::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for RecordTypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a record type by case-insensitive substring match.
///
/// "lab" wins over "treatment" when both appear.
pub fn record_type_class(record_type: &str) -> RecordTypeClass {
    let lower = record_type.to_lowercase();
    if lower.contains("lab") {
        RecordTypeClass::Lab
    } else if lower.contains("treatment") {
        RecordTypeClass::Treatment
    } else {
        RecordTypeClass::Diagnostic
    }
}
