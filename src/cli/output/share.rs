use crate::charts::statistics::OverallStatistics;

/// Short text about overall activity, meant to be pasted somewhere else.
pub fn share_summary(stats: &OverallStatistics) -> String {
    if stats.total == 0 {
        return "I haven't created any records yet.".into();
    }
    format!(
        "I've created {} {} over {} active {}, {} of them in the last week. That's {:.1} per active day.",
        stats.total,
        plural(stats.total, "record", "records"),
        stats.active_days,
        plural(stats.active_days, "day", "days"),
        stats.weekly,
        stats.daily_average,
    )
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use crate::charts::statistics::OverallStatistics;

    use super::share_summary;

    #[test]
    fn summary() {
        let stats = OverallStatistics {
            total: 5,
            weekly: 3,
            active_days: 2,
            daily_average: 2.5,
        };
        assert_eq!(
            share_summary(&stats),
            "I've created 5 records over 2 active days, 3 of them in the last week. That's 2.5 per active day."
        );
    }

    #[test]
    fn summary_singular_and_empty() {
        let stats = OverallStatistics {
            total: 1,
            weekly: 0,
            active_days: 1,
            daily_average: 1.,
        };
        assert!(share_summary(&stats).starts_with("I've created 1 record over 1 active day,"));
        let empty = OverallStatistics {
            total: 0,
            weekly: 0,
            active_days: 0,
            daily_average: 0.,
        };
        assert_eq!(share_summary(&empty), "I haven't created any records yet.");
    }
}
