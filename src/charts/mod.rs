//! Everything needed to turn creation records into the four dashboard charts and to keep them in
//! the order the user chose.
//!
//!  - [aggregator] builds the charts themselves.
//!  - [statistics] computes the summary numbers shown next to them.
//!  - [merge] reconciles freshly built charts with a previously known order.
//!  - [reorder] moves a chart when the user drags it onto another one.

pub mod aggregator;
pub mod merge;
pub mod reorder;
pub mod statistics;

use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kinds of charts shown on the dashboard. There is always exactly one chart of every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Heatmap,
    Bar,
    Pie,
    Line,
}

impl ChartKind {
    /// All kinds in the order charts are generated.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Heatmap,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Line,
    ];

    /// Stable identifier used when persisting the order and in the cli.
    pub fn identifier(&self) -> &'static str {
        match self {
            ChartKind::Heatmap => "heatmap",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
        }
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for ChartKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.identifier().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown chart kind {s}"))
    }
}

/// A single plotted value of bar, pie and line charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub value: f64,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Amount of records created on a single day. Used by the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartPayload {
    Daily(Vec<DailyCount>),
    Buckets(Vec<Bucket>),
}

impl ChartPayload {
    pub fn len(&self) -> usize {
        match self {
            ChartPayload::Daily(v) => v.len(),
            ChartPayload::Buckets(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub kind: ChartKind,
    pub title: String,
    pub subtitle: String,
    pub payload: ChartPayload,
    /// Place of the chart on the dashboard. After every operation this equals the index of the
    /// entry inside its [OrderedChartList].
    pub position: i64,
}

/// Charts in the order they are displayed.
///
/// The list keeps `position` of each entry equal to its index. Entries are only ever moved by
/// index, kind being the only identity an entry has.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OrderedChartList {
    entries: Vec<ChartEntry>,
}

impl OrderedChartList {
    /// Takes entries in the given order and renumbers their positions.
    pub fn from_entries(entries: Vec<ChartEntry>) -> Self {
        let mut list = Self { entries };
        list.normalize_positions();
        list
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ChartEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> Vec<ChartKind> {
        self.entries.iter().map(|v| v.kind).collect()
    }

    pub fn index_of(&self, kind: ChartKind) -> Option<usize> {
        self.entries.iter().position(|v| v.kind == kind)
    }

    pub fn get(&self, kind: ChartKind) -> Option<&ChartEntry> {
        self.entries.iter().find(|v| v.kind == kind)
    }

    /// Order of the list in its durable form.
    pub fn order(&self) -> Vec<PersistedOrderEntry> {
        self.entries
            .iter()
            .map(|v| PersistedOrderEntry {
                kind: v.kind,
                position: v.position,
            })
            .collect()
    }

    fn normalize_positions(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = index as i64;
        }
    }
}

/// The only part of the dashboard that is saved. Chart data is always rebuilt from records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedOrderEntry {
    pub kind: ChartKind,
    pub position: i64,
}
