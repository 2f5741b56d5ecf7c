use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// Day on which the week containing `date` starts. Weeks start on Monday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Calendar day of `moment` as seen in the time zone `tz`.
pub fn local_date<Tz: TimeZone>(moment: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    moment.with_timezone(tz).date_naive()
}

/// Returns dates from `days` days before `end` up to `end`, both ends included. The result
/// therefore always holds `days + 1` dates.
pub fn trailing_days(end: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    let start = end - Duration::days(days as i64);
    start.iter_days().take(days as usize + 1)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Weekday};

    use super::{trailing_days, week_start};

    #[test]
    fn week_start_is_monday() {
        // 2024-04-05 is a Friday
        let date = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let start = week_start(date);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(week_start(start), start);
    }

    #[test]
    fn trailing_days_includes_both_ends() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days = trailing_days(end, 30).collect::<Vec<_>>();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(*days.last().unwrap(), end);
        assert!(days.windows(2).all(|w| w[0].succ_opt() == Some(w[1])));
    }
}
