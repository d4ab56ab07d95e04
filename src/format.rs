// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Display formatting for metric values.

use chrono::{DateTime, NaiveDate, Utc};

use crate::metric::NOT_AVAILABLE;

/// Formats an integer with `,` thousands separators.
///
/// # Examples
///
/// ```
/// use repocard::format_number;
///
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}

/// Formats a timestamp as `YYYY-MM-DD`.
///
/// Accepts RFC 3339 timestamps (as returned by the GitHub API) and bare
/// `YYYY-MM-DD` dates. Absent or unparseable values yield `N/A`.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return NOT_AVAILABLE.to_owned();
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.with_timezone(&Utc).format("%Y-%m-%d").to_string();
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| NOT_AVAILABLE.to_owned())
}

/// Formats a repository size reported in kilobytes.
pub fn format_size(kilobytes: u64) -> String {
    format!("{} KB", format_number(kilobytes))
}
