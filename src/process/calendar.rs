use chrono::{Datelike, NaiveDate, Weekday};

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday–Friday dates from the earliest to the latest of `dates`, inclusive.
/// Empty when `dates` yields nothing.
pub fn business_days<I>(dates: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for d in dates {
        bounds = Some(match bounds {
            None => (d, d),
            Some((lo, hi)) => (lo.min(d), hi.max(d)),
        });
    }
    let Some((first, last)) = bounds else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| is_business_day(*d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(business_days(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_weekday() {
        // 2024-01-15 is a Monday
        assert_eq!(business_days(vec![ymd(2024, 1, 15)]), vec![ymd(2024, 1, 15)]);
    }

    #[test]
    fn test_single_weekend_day_is_empty() {
        assert!(business_days(vec![ymd(2024, 1, 13)]).is_empty());
    }

    #[test]
    fn test_span_skips_weekends() {
        // Fri 2024-01-12 .. Tue 2024-01-16, given out of order
        let days = business_days(vec![ymd(2024, 1, 16), ymd(2024, 1, 12), ymd(2024, 1, 14)]);
        assert_eq!(
            days,
            vec![ymd(2024, 1, 12), ymd(2024, 1, 15), ymd(2024, 1, 16)]
        );
    }

    #[test]
    fn test_two_full_weeks() {
        let days = business_days(vec![ymd(2024, 1, 1), ymd(2024, 1, 14)]);
        assert_eq!(days.len(), 10);
        assert!(days.iter().all(|d| is_business_day(*d)));
    }
}
