use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone};
use serde::Serialize;

use crate::{storage::entities::CreationRecordEntity, utils::time::local_date};

/// Length of the trailing window used by [weekly_count].
pub const WEEK: Duration = Duration::days(7);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallStatistics {
    pub total: usize,
    pub weekly: usize,
    pub active_days: usize,
    pub daily_average: f64,
}

/// Amount of records created from `now - 7 days` up to `now`, both ends included.
pub fn weekly_count<Tz: TimeZone>(records: &[CreationRecordEntity], now: &DateTime<Tz>) -> usize {
    let end = now.to_utc();
    let start = end - WEEK;
    records
        .iter()
        .filter(|v| v.created_at >= start && v.created_at <= end)
        .count()
}

/// Amount of distinct calendar days in `tz` on which at least one record was created.
pub fn active_days<Tz: TimeZone>(records: &[CreationRecordEntity], tz: &Tz) -> usize {
    records
        .iter()
        .map(|v| local_date(&v.created_at, tz))
        .collect::<HashSet<_>>()
        .len()
}

/// Records per active day. Zero active days gives 0.
///
/// `active_days` is optional since callers often already have it. When it's missing it's computed
/// in the local time zone.
pub fn daily_average(records: &[CreationRecordEntity], active_days: Option<usize>) -> f64 {
    let active_days =
        active_days.unwrap_or_else(|| self::active_days(records, &chrono::Local));
    if active_days == 0 {
        return 0.;
    }
    records.len() as f64 / active_days as f64
}

/// All summary numbers at once. Everything is evaluated against the same `now`.
pub fn overall_statistics<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    now: &DateTime<Tz>,
) -> OverallStatistics {
    let active_days = active_days(records, &now.timezone());
    OverallStatistics {
        total: records.len(),
        weekly: weekly_count(records, now),
        active_days,
        daily_average: daily_average(records, Some(active_days)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    use crate::storage::entities::CreationRecordEntity;

    use super::{active_days, daily_average, overall_statistics, weekly_count, OverallStatistics};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 5, 15, 30, 0)
            .unwrap()
    }

    fn record_at(moment: DateTime<Utc>) -> CreationRecordEntity {
        CreationRecordEntity::new("test", moment)
    }

    #[test]
    fn empty_records_give_zeroes() {
        let stats = overall_statistics(&[], &now());
        assert_eq!(
            stats,
            OverallStatistics {
                total: 0,
                weekly: 0,
                active_days: 0,
                daily_average: 0.,
            }
        );
        assert_eq!(daily_average(&[], None), 0.);
    }

    #[test]
    fn mixed_week_example() {
        let now = now();
        let mut records = vec![record_at(now.to_utc()); 3];
        records.extend(vec![record_at((now - Duration::days(10)).to_utc()); 2]);

        let stats = overall_statistics(&records, &now);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.weekly, 3);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.daily_average, 2.5);
    }

    #[test]
    fn weekly_window_includes_both_ends() {
        let now = now();
        let records = [
            record_at((now - Duration::days(7)).to_utc()),
            record_at((now - Duration::days(7) - Duration::seconds(1)).to_utc()),
            record_at(now.to_utc()),
            record_at((now + Duration::seconds(1)).to_utc()),
        ];
        assert_eq!(weekly_count(&records, &now), 2);
    }

    #[test]
    fn active_days_follow_time_zone() {
        // 23:30 UTC on the 4th and 00:30 UTC on the 5th are the same day at UTC+2
        let records = [
            record_at(Utc.with_ymd_and_hms(2024, 4, 4, 23, 30, 0).unwrap()),
            record_at(Utc.with_ymd_and_hms(2024, 4, 5, 0, 30, 0).unwrap()),
        ];
        assert_eq!(active_days(&records, &Utc), 2);
        assert_eq!(active_days(&records, &now().timezone()), 1);
    }

    #[test]
    fn statistics_are_consistent() {
        let now = now();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = (0..40)
            .map(|i| {
                let day = start + Duration::days((i * 7 % 90) as i64);
                record_at(day.and_hms_opt((i % 24) as u32, 0, 0).unwrap().and_utc())
            })
            .collect::<Vec<_>>();

        let stats = overall_statistics(&records, &now);
        assert!(stats.weekly <= stats.total);
        assert!(stats.active_days <= stats.total.min(365));
        assert!(stats.active_days > 0);
        let total = stats.daily_average * stats.active_days as f64;
        assert!((total - stats.total as f64).abs() < 1e-9);
    }
}
