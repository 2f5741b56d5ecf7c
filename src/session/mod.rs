//! Dashboard state of a single user session. [ChartSession] owns the displayed charts and is the
//! only thing that changes them: data refreshes and drag gestures both go through it.
//! [board::ChartBoard] connects a session to record and order storage.

pub mod board;

use anyhow::{bail, Result};
use chrono::{DateTime, TimeZone};
use tracing::{debug, info};

use crate::{
    charts::{
        aggregator::generate_default_charts, merge::merge_order, reorder::reorder, ChartKind,
        OrderedChartList, PersistedOrderEntry,
    },
    storage::{entities::CreationRecordEntity, persisted_order},
};

/// Builds charts for a freshly opened dashboard, ordered as saved in `persisted` if it's readable.
pub fn generate_chart_data<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    now: &DateTime<Tz>,
    persisted: Option<&[u8]>,
) -> OrderedChartList {
    let reference = persisted.and_then(persisted_order::deserialize);
    ChartSession::load(generate_default_charts(records, now), reference.as_deref())
        .committed()
        .clone()
}

/// Rebuilds charts from `records` while keeping the order of `current`.
pub fn refresh_chart_data<Tz: TimeZone>(
    records: &[CreationRecordEntity],
    now: &DateTime<Tz>,
    current: &OrderedChartList,
) -> OrderedChartList {
    merge_order(generate_default_charts(records, now), &current.order())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new charts are displayed.
    Applied,
    /// A drag is in progress. The new charts are applied when it ends.
    Deferred,
}

#[derive(Debug, Clone)]
struct DragState {
    kind: ChartKind,
    preview: OrderedChartList,
}

#[derive(Debug, Clone)]
pub struct ChartSession {
    committed: OrderedChartList,
    drag: Option<DragState>,
    pending_refresh: Option<OrderedChartList>,
}

impl ChartSession {
    /// Cold start. `generated` is expected in default order, `persisted` is the saved order, if
    /// there is one.
    pub fn load(generated: OrderedChartList, persisted: Option<&[PersistedOrderEntry]>) -> Self {
        let defaults = merge_order(generated, &[]);
        let committed = match persisted {
            Some(reference) => merge_order(defaults, reference),
            None => defaults,
        };
        debug!("Loaded charts in order {:?}", committed.kinds());
        Self {
            committed,
            drag: None,
            pending_refresh: None,
        }
    }

    /// Charts to display. While dragging this is the preview.
    pub fn current(&self) -> &OrderedChartList {
        match &self.drag {
            Some(drag) => &drag.preview,
            None => &self.committed,
        }
    }

    /// Charts as of the last committed change.
    pub fn committed(&self) -> &OrderedChartList {
        &self.committed
    }

    pub fn dragged_kind(&self) -> Option<ChartKind> {
        self.drag.as_ref().map(|v| v.kind)
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending_refresh.is_some()
    }

    /// Replaces the charts with freshly `generated` ones, keeping the current order. While a drag
    /// is in progress the charts are kept aside instead, a later refresh replacing them.
    pub fn refresh(&mut self, generated: OrderedChartList) -> RefreshOutcome {
        if self.drag.is_some() {
            debug!("Deferring refresh until the drag ends");
            self.pending_refresh = Some(generated);
            return RefreshOutcome::Deferred;
        }
        self.committed = merge_order(generated, &self.committed.order());
        RefreshOutcome::Applied
    }

    /// Starts dragging `kind`. Only one drag can be in progress.
    pub fn begin_drag(&mut self, kind: ChartKind) -> Result<()> {
        if let Some(drag) = &self.drag {
            bail!("Can't start dragging {kind}, {} is already being dragged", drag.kind);
        }
        if self.committed.index_of(kind).is_none() {
            bail!("Can't start dragging {kind}, it's not on the dashboard");
        }
        debug!("Started dragging {kind}");
        self.drag = Some(DragState {
            kind,
            preview: self.committed.clone(),
        });
        Ok(())
    }

    /// Moves the dragged chart onto `drop_onto` in the preview. Nothing is saved until
    /// [Self::commit_reorder].
    pub fn preview_reorder(
        &mut self,
        dragged: ChartKind,
        drop_onto: ChartKind,
    ) -> Result<&OrderedChartList> {
        let Some(drag) = self.drag.as_mut() else {
            bail!("Can't preview moving {dragged}, nothing is being dragged");
        };
        if drag.kind != dragged {
            bail!("Can't preview moving {dragged}, {} is being dragged", drag.kind);
        }
        drag.preview = reorder(&drag.preview, dragged, drop_onto);
        Ok(&drag.preview)
    }

    /// Ends the drag keeping the previewed order. Returns the order encoded for saving.
    pub fn commit_reorder(&mut self) -> Result<Vec<u8>> {
        let Some(drag) = self.drag.take() else {
            bail!("Can't commit, nothing is being dragged");
        };
        self.committed = drag.preview;
        info!("Committed chart order {:?}", self.committed.kinds());
        self.apply_pending_refresh();
        Ok(persisted_order::serialize(&self.committed))
    }

    /// Ends the drag restoring the last committed order. Does nothing without a drag.
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!("Cancelled dragging {}", drag.kind);
            self.apply_pending_refresh();
        }
    }

    /// Puts the charts back into their default order.
    pub fn reset_order(&mut self) -> Result<()> {
        if let Some(drag) = &self.drag {
            bail!("Can't reset the order while {} is being dragged", drag.kind);
        }
        let mut entries = self.committed.clone().into_entries();
        // Kinds are declared in default order
        entries.sort_by_key(|v| v.kind);
        self.committed = OrderedChartList::from_entries(entries);
        Ok(())
    }

    fn apply_pending_refresh(&mut self) {
        if let Some(generated) = self.pending_refresh.take() {
            debug!("Applying deferred refresh");
            self.refresh(generated);
        }
    }
}
