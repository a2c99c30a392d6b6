//! Month naming and ordering helpers.
//!
//! Months are keyed by their 1-based number everywhere, so ordered maps sort
//! them in calendar order; names are only attached for display.

use chrono::{Datelike, NaiveDate};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full month name for a 1-based month number; `None` outside `1..=12`.
pub fn month_name(month: u32) -> Option<&'static str> {
    month_slot(&MONTH_NAMES, month)
}

/// Three-letter month abbreviation for a 1-based month number.
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    month_slot(&MONTH_ABBREVIATIONS, month)
}

fn month_slot(names: &[&'static str; 12], month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    names.get(idx).copied()
}

/// Looks up a month number by full name or abbreviation, case-insensitive.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .zip(MONTH_ABBREVIATIONS.iter())
        .position(|(full, abbr)| full.eq_ignore_ascii_case(name) || abbr.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// `(year, month)` key of a date.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_abbreviation(4), Some("Apr"));
    }

    #[test]
    fn test_month_out_of_range() {
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_abbreviation(0), None);
        assert_eq!(month_abbreviation(u32::MAX), None);
    }

    #[test]
    fn test_month_number_lookup() {
        assert_eq!(month_number("march"), Some(3));
        assert_eq!(month_number("Sep"), Some(9));
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn test_year_month() {
        let date = NaiveDate::from_ymd_opt(2019, 7, 31).unwrap();
        assert_eq!(year_month(date), (2019, 7));
    }
}
