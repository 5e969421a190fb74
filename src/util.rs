// Display helpers shared by the console output and the export.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

pub const UNKNOWN_SITE_NAME: &str = "Site Inconnu";

/// French day-first date, or an empty string when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "OUI"
    } else {
        "NON"
    }
}

pub fn site_name_or_default(name: &str) -> &str {
    if name.trim().is_empty() {
        UNKNOWN_SITE_NAME
    } else {
        name
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages, French grouping (e.g. `9 855`).
    n.to_formatted_string(&Locale::fr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2022, 1, 10)), "10/01/2022");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "OUI");
        assert_eq!(yes_no(false), "NON");
    }

    #[test]
    fn test_site_name_default() {
        assert_eq!(site_name_or_default("  "), UNKNOWN_SITE_NAME);
        assert_eq!(site_name_or_default("Gare"), "Gare");
    }

    #[test]
    fn test_format_int_small() {
        assert_eq!(format_int(42usize), "42");
    }
}
