//! Plain text rendering of charts. Every chart becomes a few lines that fit into 80 columns.

pub mod share;

use ansi_term::Style;
use chrono::Datelike;

use crate::charts::{Bucket, ChartEntry, ChartKind, ChartPayload, DailyCount, OrderedChartList};

const BAR_WIDTH: usize = 40;
const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const HEAT: [char; 5] = ['·', '░', '▒', '▓', '█'];
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn render_chart(entry: &ChartEntry) -> String {
    let mut output = format!(
        "{} {}\n{}\n",
        Style::new().bold().paint(&entry.title),
        Style::new().dimmed().paint(format!("#{}", entry.position + 1)),
        Style::new().italic().paint(&entry.subtitle),
    );
    let body = match &entry.payload {
        ChartPayload::Daily(days) => render_heatmap(days),
        ChartPayload::Buckets(buckets) => match entry.kind {
            ChartKind::Line => render_sparkline(buckets),
            _ => render_bars(buckets),
        },
    };
    output.push_str(&body);
    output
}

/// `1. heatmap  2. bar ...`
pub fn format_order(list: &OrderedChartList) -> String {
    list.entries()
        .iter()
        .map(|v| format!("{}. {}", v.position + 1, v.kind))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Scales `value` to `0..=steps` relative to `max`. Any non zero value gets at least 1.
fn scale(value: f64, max: f64, steps: usize) -> usize {
    if value <= 0. || max <= 0. {
        return 0;
    }
    ((value / max * steps as f64).round() as usize).clamp(1, steps)
}

/// Calendar grid with a column per week and a row per weekday.
fn render_heatmap(days: &[DailyCount]) -> String {
    let Some(first) = days.first() else {
        return "No data\n".into();
    };
    let max = days.iter().map(|v| v.count).max().unwrap_or(0) as f64;
    let padding = first.date.weekday().num_days_from_monday() as usize;

    let mut rows = vec![String::new(); 7];
    for (index, day) in std::iter::repeat(None)
        .take(padding)
        .chain(days.iter().map(Some))
        .enumerate()
    {
        let glyph = match day {
            Some(day) => HEAT[scale(day.count as f64, max, HEAT.len() - 1)],
            None => ' ',
        };
        rows[index % 7].push(glyph);
    }

    let total = days.iter().map(|v| v.count as u64).sum::<u64>();
    let mut output = String::new();
    for (name, row) in WEEKDAYS.iter().zip(rows) {
        output.push_str(&format!("{name} {row}\n"));
    }
    output.push_str(&format!(
        "{} to {}, {total} records\n",
        first.date,
        days[days.len() - 1].date
    ));
    output
}

fn render_bars(buckets: &[Bucket]) -> String {
    if buckets.is_empty() {
        return "No data\n".into();
    }
    let max = buckets.iter().map(|v| v.value).fold(0., f64::max);
    let total = buckets.iter().map(|v| v.value).sum::<f64>();
    let label_width = buckets.iter().map(|v| v.label.chars().count()).max().unwrap_or(0);

    let mut output = String::new();
    for bucket in buckets {
        let share = if total > 0. {
            bucket.value / total * 100.
        } else {
            0.
        };
        output.push_str(&format!(
            "{:<label_width$} {:<BAR_WIDTH$} {} ({share:.0}%)\n",
            bucket.label,
            "█".repeat(scale(bucket.value, max, BAR_WIDTH)),
            bucket.value,
        ));
    }
    output
}

fn render_sparkline(buckets: &[Bucket]) -> String {
    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return "No data\n".into();
    };
    let max = buckets.iter().map(|v| v.value).fold(0., f64::max);
    let line = buckets
        .iter()
        .map(|v| match scale(v.value, max, SPARKS.len()) {
            0 => ' ',
            level => SPARKS[level - 1],
        })
        .collect::<String>();
    format!("{line}\n{} to {}, at most {max} a day\n", first.label, last.label)
}
