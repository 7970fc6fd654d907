use chrono::{Datelike, NaiveDate};
use std::ops::RangeInclusive;

/// Day-first layouts with a four-digit year.
const DAY_FIRST_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
/// Day-first layouts with a two-digit year (`"05/02/24"`).
const DAY_FIRST_SHORT_FORMATS: [&str; 3] = ["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];
const SEPARATORS: &[char] = &['/', '-', '.'];

/// Years an extraction date can plausibly fall in; anything else is a typo.
const PLAUSIBLE_YEARS: RangeInclusive<i32> = 1900..=2100;

/// Parse an extraction date, day first (`"DD/MM/YYYY"`, `-` or `.` separators
/// also accepted, optional trailing time). A two-digit year is read as `%y`
/// (`"05/02/24"` is 2024-02-05). ISO `"YYYY-MM-DD"` is recognised too.
/// Returns `None` for anything else, including implausible years.
pub fn parse_extraction_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // drop a trailing time part: "15/01/2024 10:30:00"
    let day = s.split_whitespace().next()?;

    let b = day.as_bytes();
    let parsed = if b.len() == 10 && b[4] == b'-' && b[7] == b'-' {
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    } else {
        let formats = match day.rsplit(SEPARATORS).next().map(str::len) {
            Some(4) => &DAY_FIRST_FORMATS,
            Some(2) => &DAY_FIRST_SHORT_FORMATS,
            _ => return None,
        };
        formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
    }?;

    PLAUSIBLE_YEARS.contains(&parsed.year()).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first() {
        assert_eq!(parse_extraction_date("05/02/2024"), Some(ymd(2024, 2, 5)));
        assert_eq!(parse_extraction_date(" 5-2-2024 "), Some(ymd(2024, 2, 5)));
        assert_eq!(parse_extraction_date("05.02.2024"), Some(ymd(2024, 2, 5)));
    }

    #[test]
    fn test_two_digit_year_is_current_century() {
        assert_eq!(parse_extraction_date("05/02/24"), Some(ymd(2024, 2, 5)));
        assert_eq!(parse_extraction_date("05-02-24 08:00"), Some(ymd(2024, 2, 5)));
    }

    #[test]
    fn test_implausible_years_rejected() {
        assert_eq!(parse_extraction_date("05/02/0024"), None);
        assert_eq!(parse_extraction_date("05/02/024"), None);
        assert_eq!(parse_extraction_date("05/02/20244"), None);
        assert_eq!(parse_extraction_date("0024-02-05"), None);
    }

    #[test]
    fn test_iso_and_time_suffix() {
        assert_eq!(parse_extraction_date("2024-02-05"), Some(ymd(2024, 2, 5)));
        assert_eq!(
            parse_extraction_date("05/02/2024 13:45:00"),
            Some(ymd(2024, 2, 5))
        );
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_extraction_date(""), None);
        assert_eq!(parse_extraction_date("   "), None);
        assert_eq!(parse_extraction_date("31/02/2024"), None);
        assert_eq!(parse_extraction_date("not a date"), None);
        assert_eq!(parse_extraction_date("13/13/2024"), None);
    }
}
