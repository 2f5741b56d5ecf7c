use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike};
use tracing::{debug, instrument};

use crate::{
    storage::entities::CreationRecordEntity,
    utils::time::{local_date, trailing_days, week_start},
};

use super::{Bucket, ChartEntry, ChartKind, ChartPayload, DailyCount, OrderedChartList};

/// Days before today covered by the heatmap. Today is included as well.
pub const HEATMAP_DAYS: u32 = 365;
/// Days before today covered by the trend line. Today is included as well.
pub const LINE_DAYS: u32 = 30;
/// Weeks covered by the bar chart, including the current one.
pub const BAR_WEEKS: u32 = 12;

/// Part of the day used by the pie chart. Hours are `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySlot {
    pub name: &'static str,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl DaySlot {
    fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

pub const DAY_SLOTS: [DaySlot; 4] = [
    DaySlot {
        name: "Morning",
        start_hour: 6,
        end_hour: 12,
    },
    DaySlot {
        name: "Afternoon",
        start_hour: 12,
        end_hour: 18,
    },
    DaySlot {
        name: "Evening",
        start_hour: 18,
        end_hour: 24,
    },
    DaySlot {
        name: "Night",
        start_hour: 0,
        end_hour: 6,
    },
];

/// Builds all charts in their default order: heatmap, bar, pie, line.
#[instrument(skip(records, now), fields(records = records.len()))]
pub fn generate_default_charts<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    now: &DateTime<Tz>,
) -> OrderedChartList {
    debug!("Aggregating {} records", records.len());
    let entries = ChartKind::ALL
        .into_iter()
        .map(|kind| {
            let payload = match kind {
                ChartKind::Heatmap => ChartPayload::Daily(heatmap(records, now)),
                ChartKind::Bar => ChartPayload::Buckets(weekly_bars(records, now)),
                ChartKind::Pie => ChartPayload::Buckets(time_of_day(records, &now.timezone())),
                ChartKind::Line => ChartPayload::Buckets(trend_line(records, now)),
            };
            let (title, subtitle) = titles(kind);
            ChartEntry {
                kind,
                title: title.into(),
                subtitle: subtitle.into(),
                payload,
                position: 0,
            }
        })
        .collect();
    OrderedChartList::from_entries(entries)
}

fn titles(kind: ChartKind) -> (&'static str, &'static str) {
    match kind {
        ChartKind::Heatmap => ("Activity", "Records created over the past year"),
        ChartKind::Bar => ("Weekly", "Records per week, last 12 weeks"),
        ChartKind::Pie => ("Time of Day", "When records are created"),
        ChartKind::Line => ("Trend", "Daily records over the last 30 days"),
    }
}

/// Record counts per calendar day of `tz`.
fn count_by_day<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    tz: &Tz,
) -> HashMap<NaiveDate, u32> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(local_date(&record.created_at, tz)).or_insert(0) += 1;
    }
    counts
}

/// One value per day for the last [HEATMAP_DAYS] days and today. Days without records are kept
/// with a zero count, so the result always holds 366 values.
pub fn heatmap<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    now: &DateTime<Tz>,
) -> Vec<DailyCount> {
    let counts = count_by_day(records, &now.timezone());
    trailing_days(now.date_naive(), HEATMAP_DAYS)
        .map(|date| DailyCount {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Same as [heatmap] but for the last [LINE_DAYS] days, 31 values in total.
pub fn trend_line<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    now: &DateTime<Tz>,
) -> Vec<Bucket> {
    let counts = count_by_day(records, &now.timezone());
    trailing_days(now.date_naive(), LINE_DAYS)
        .map(|date| Bucket {
            label: date.format("%m/%d").to_string(),
            value: counts.get(&date).copied().unwrap_or(0) as f64,
            date: Some(date),
            category: None,
        })
        .collect()
}

/// Key records are grouped by in the bar chart. The year part is the calendar year, not the ISO
/// week year, so the last days of December may land in week 01 of the same year.
pub fn week_key(date: NaiveDate) -> String {
    format!("{}-W{:02}", date.year(), date.iso_week().week())
}

/// Record counts for every week among the last [BAR_WEEKS] weeks that has at least one record.
/// Buckets are sorted by their week key as a string.
pub fn weekly_bars<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    now: &DateTime<Tz>,
) -> Vec<Bucket> {
    let tz = now.timezone();
    let end = now.to_utc();
    let first_day = week_start(now.date_naive()) - Duration::weeks(BAR_WEEKS as i64 - 1);

    // BTreeMap keeps keys in string order
    let mut weeks = BTreeMap::<String, (NaiveDate, u32)>::new();
    for record in records.iter().filter(|v| v.created_at <= end) {
        let date = local_date(&record.created_at, &tz);
        if date < first_day {
            continue;
        }
        let week = weeks
            .entry(week_key(date))
            .or_insert_with(|| (week_start(date), 0));
        week.1 += 1;
    }

    weeks
        .into_iter()
        .map(|(key, (start, count))| Bucket {
            label: format!("W{:02}", start.iso_week().week()),
            value: count as f64,
            date: Some(start),
            category: Some(key),
        })
        .collect()
}

/// Counts records of every [DaySlot] over all time. Empty slots are left out.
pub fn time_of_day<Tz: TimeZone>(records: &[CreationRecordEntity], tz: &Tz) -> Vec<Bucket> {
    let mut counts = [0u32; DAY_SLOTS.len()];
    for record in records {
        let hour = record.created_at.with_timezone(tz).hour();
        if let Some(index) = DAY_SLOTS.iter().position(|slot| slot.contains(hour)) {
            counts[index] += 1;
        }
    }

    DAY_SLOTS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(slot, count)| Bucket {
            label: slot.name.into(),
            value: count as f64,
            date: None,
            category: Some(slot.name.into()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    use crate::{
        charts::{ChartKind, ChartPayload},
        storage::entities::CreationRecordEntity,
        utils::logging::TEST_LOGGING,
    };

    use super::{generate_default_charts, heatmap, time_of_day, trend_line, week_key, weekly_bars};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 5, 15, 30, 0).unwrap()
    }

    fn record_at(moment: DateTime<Utc>) -> CreationRecordEntity {
        CreationRecordEntity::new("test", moment)
    }

    #[test]
    fn default_charts_have_every_kind_once() {
        *TEST_LOGGING;
        let charts = generate_default_charts(&[], &now());
        assert_eq!(charts.kinds(), ChartKind::ALL.to_vec());
        let positions = charts.entries().iter().map(|v| v.position).collect::<Vec<_>>();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert!(charts.entries().iter().all(|v| !v.title.is_empty()));
    }

    #[test]
    fn window_lengths_include_both_ends() {
        let records = (0..500)
            .map(|i| record_at(now() - Duration::hours(i * 13)))
            .collect::<Vec<_>>();
        let empty: Vec<CreationRecordEntity> = vec![];
        for records in [&records[..], &empty[..]] {
            let charts = generate_default_charts(records, &now());
            let Some(ChartPayload::Daily(days)) = charts.get(ChartKind::Heatmap).map(|v| &v.payload)
            else {
                panic!("Heatmap should have daily payload");
            };
            assert_eq!(days.len(), 366);
            let Some(ChartPayload::Buckets(line)) = charts.get(ChartKind::Line).map(|v| &v.payload)
            else {
                panic!("Line should have bucket payload");
            };
            assert_eq!(line.len(), 31);
        }
    }

    #[test]
    fn heatmap_is_dense_and_ascending() {
        let records = [
            record_at(now()),
            record_at(now() - Duration::hours(1)),
            record_at(now() - Duration::days(365)),
            record_at(now() - Duration::days(366)),
        ];
        let days = heatmap(&records, &now());
        assert_eq!(days.first().unwrap().date, NaiveDate::from_ymd_opt(2023, 4, 6).unwrap());
        assert_eq!(days.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
        assert!(days.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
        assert_eq!(days.last().unwrap().count, 2);
        assert_eq!(days.first().unwrap().count, 1);
        assert_eq!(days.iter().map(|v| v.count).sum::<u32>(), 3);
    }

    #[test]
    fn trend_line_counts_by_local_day() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = now().with_timezone(&offset);
        // 02:00 UTC on the 5th is still the 4th at UTC-5
        let records = [record_at(Utc.with_ymd_and_hms(2024, 4, 5, 2, 0, 0).unwrap())];
        let line = trend_line(&records, &now);
        assert_eq!(line.len(), 31);
        assert_eq!(line[29].date, Some(NaiveDate::from_ymd_opt(2024, 4, 4).unwrap()));
        assert_eq!(line[29].value, 1.);
        assert_eq!(line[29].label, "04/04");
        assert_eq!(line[30].value, 0.);
    }

    #[test]
    fn weekly_bars_skip_empty_weeks() {
        let records = [
            record_at(now()),
            record_at(now() - Duration::days(1)),
            record_at(now() - Duration::weeks(3)),
            // Outside of the 12 week window
            record_at(now() - Duration::weeks(12)),
            // In the future
            record_at(now() + Duration::hours(1)),
        ];
        let bars = weekly_bars(&records, &now());
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].category.as_deref(), Some("2024-W11"));
        assert_eq!(bars[0].value, 1.);
        assert_eq!(bars[0].date, Some(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()));
        assert_eq!(bars[1].label, "W14");
        assert_eq!(bars[1].value, 2.);
    }

    #[test]
    fn weekly_bars_window_starts_on_monday() {
        // 2024-01-15 is the monday 11 weeks before the week of 2024-04-05
        let records = [
            record_at(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            record_at(Utc.with_ymd_and_hms(2024, 1, 14, 23, 59, 59).unwrap()),
        ];
        let bars = weekly_bars(&records, &now());
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].category.as_deref(), Some("2024-W03"));
    }

    #[test]
    fn week_keys_use_calendar_year() {
        // ISO week 1 of 2025 starts on 2024-12-30
        assert_eq!(week_key(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()), "2024-W01");
        assert_eq!(week_key(NaiveDate::from_ymd_opt(2024, 12, 27).unwrap()), "2024-W52");
        assert_eq!(week_key(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()), "2025-W01");
    }

    #[test]
    fn time_of_day_slots() {
        let day = NaiveDate::from_ymd_opt(2020, 2, 3).unwrap();
        let at = |hour| record_at(day.and_hms_opt(hour, 0, 0).unwrap().and_utc());
        let records = [at(6), at(11), at(12), at(0), at(5), at(23)];

        let slots = time_of_day(&records, &Utc);
        let values = slots
            .iter()
            .map(|v| (v.label.as_str(), v.value))
            .collect::<Vec<_>>();
        assert_eq!(
            values,
            vec![("Morning", 2.), ("Afternoon", 1.), ("Evening", 1.), ("Night", 2.)]
        );

        let slots = time_of_day(&[at(13)], &Utc);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].category.as_deref(), Some("Afternoon"));
        assert!(time_of_day(&[], &Utc).is_empty());
    }
}
