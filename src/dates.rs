// Date handling for spreadsheet cells.
//
// Dates show up either as spreadsheet serials (1900 date system, days since
// 1899-12-30) or as day-first strings like "05/03/2022" or "5-3-2022".
// Anything else is treated as "no date".
use chrono::{DateTime, Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Cell;
use crate::util::format_date;

/// Serial of 1970-01-01 in the 1900 date system.
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})").expect("date pattern"));

/// Convert a spreadsheet serial to a calendar date. No timezone shift and no
/// 1900 leap-year correction.
pub fn from_serial(value: f64) -> Option<NaiveDate> {
    let secs = ((value - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).round();
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs as i64, 0).map(|dt| dt.date_naive())
}

/// Parse `D/M/YYYY` or `D-M-YYYY` at the start of the string. Day/month
/// combinations that do not exist (31/02) give `None`.
pub fn from_day_first(s: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR.captures(s.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Resolve a cell to a date, or `None` when it holds no usable date.
pub fn parse_cell(cell: &Cell) -> Option<NaiveDate> {
    if cell.is_empty() {
        return None;
    }
    match cell {
        Cell::Number(n, _) => from_serial(*n),
        Cell::Text(s) => from_day_first(s),
        Cell::Empty => None,
    }
}

/// Text shown for a cell that may hold a date. Serials are rendered as
/// `dd/mm/yyyy`; text stays as entered, notes included.
pub fn display_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(..) => parse_cell(cell)
            .map(|d| format_date(Some(d)))
            .unwrap_or_else(|| cell.text()),
        _ => cell.text(),
    }
}

/// Whole calendar years from `start` to `today`, truncated toward zero.
pub fn whole_years(start: NaiveDate, today: NaiveDate) -> i32 {
    if start > today {
        return -whole_years(today, start);
    }
    let mut years = today.year() - start.year();
    if (today.month(), today.day()) < (start.month(), start.day()) {
        years -= 1;
    }
    years
}

/// `date` plus `years`; Feb 29 lands on Feb 28 in non-leap years.
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years * 12))
}

/// `YYYY-MM-DD`, used for pinning the evaluation date from settings.
pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_serial_new_year_2021() {
        assert_eq!(parse_cell(&Cell::from(44197.0)), Some(d(2021, 1, 1)));
    }

    #[test]
    fn test_serial_with_time_fraction() {
        // 12:00 on 2021-01-01
        assert_eq!(from_serial(44197.5), Some(d(2021, 1, 1)));
    }

    #[test]
    fn test_zero_serial_is_absent() {
        assert_eq!(parse_cell(&Cell::from(0.0)), None);
    }

    #[test]
    fn test_day_first_slash() {
        let date = parse_cell(&Cell::Text("05/03/2022".to_string())).unwrap();
        assert_eq!(date.day(), 5);
        assert_eq!(date.month0(), 2);
        assert_eq!(date.year(), 2022);
    }

    #[test]
    fn test_day_first_dash_single_digits() {
        assert_eq!(from_day_first("5-3-2022"), Some(d(2022, 3, 5)));
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        assert_eq!(from_day_first("10/01/2022 RDM OK"), Some(d(2022, 1, 10)));
    }

    #[test]
    fn test_unparseable_strings() {
        assert_eq!(from_day_first(""), None);
        assert_eq!(from_day_first("2022-03-05"), None);
        assert_eq!(from_day_first("05/03/22"), None);
        assert_eq!(from_day_first("pas de contrat"), None);
        assert_eq!(from_day_first("31/02/2022"), None);
        assert_eq!(parse_cell(&Cell::Empty), None);
    }

    #[test]
    fn test_display_cell() {
        assert_eq!(display_cell(&Cell::from_field("44197")), "01/01/2021");
        assert_eq!(display_cell(&Cell::from_field("10/01/2022 RDM OK")), "10/01/2022 RDM OK");
        assert_eq!(display_cell(&Cell::from_field("0")), "0");
        assert_eq!(display_cell(&Cell::Empty), "");
    }

    #[test]
    fn test_whole_years() {
        assert_eq!(whole_years(d(2022, 1, 10), d(2025, 6, 1)), 3);
        assert_eq!(whole_years(d(2022, 6, 2), d(2025, 6, 1)), 2);
        assert_eq!(whole_years(d(2022, 6, 1), d(2025, 6, 1)), 3);
        assert_eq!(whole_years(d(2027, 1, 1), d(2025, 6, 1)), -1);
    }

    #[test]
    fn test_add_years_leap_day() {
        assert_eq!(add_years(d(2024, 2, 29), 1), Some(d(2025, 2, 28)));
        assert_eq!(add_years(d(2022, 1, 10), 2), Some(d(2024, 1, 10)));
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_iso("2025-06-01"), Some(d(2025, 6, 1)));
        assert_eq!(parse_iso("01/06/2025"), None);
    }
}
