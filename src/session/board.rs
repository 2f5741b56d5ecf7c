use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{info, instrument, warn};

use crate::{
    charts::{
        aggregator::generate_default_charts,
        statistics::{overall_statistics, OverallStatistics},
        ChartKind, OrderedChartList,
    },
    storage::{
        entities::CreationRecordEntity,
        order_store::{OrderStore, CHART_ORDER_KEY},
        persisted_order,
        record_storage::RecordSource,
    },
    utils::clock::Clock,
};

use super::{ChartSession, RefreshOutcome};

/// Builds charts on the blocking pool. Aggregating a big record set takes a while, and the
/// caller only ever sees the complete result.
pub async fn aggregate(
    records: Vec<CreationRecordEntity>,
    now: DateTime<Local>,
) -> Result<OrderedChartList> {
    let charts =
        tokio::task::spawn_blocking(move || generate_default_charts(&records, &now)).await?;
    Ok(charts)
}

/// Dashboard backed by storage. Owns the [ChartSession] and saves the chart order whenever a drag
/// is committed.
pub struct ChartBoard<S: RecordSource, K: OrderStore> {
    source: S,
    store: K,
    clock: Box<dyn Clock>,
    session: ChartSession,
}

impl<S: RecordSource, K: OrderStore> ChartBoard<S, K> {
    /// Reads records and the saved chart order and builds the first set of charts.
    #[instrument(skip_all)]
    pub async fn open(source: S, store: K, clock: Box<dyn Clock>) -> Result<Self> {
        let records = source.query_all().await?;
        let generated = aggregate(records, clock.time()).await?;

        let saved = match store.get(CHART_ORDER_KEY) {
            Ok(v) => v,
            Err(e) => {
                warn!("Couldn't read saved chart order, using the default one: {e:?}");
                None
            }
        };
        let reference = saved.as_deref().and_then(persisted_order::deserialize);
        let session = ChartSession::load(generated, reference.as_deref());
        info!("Opened dashboard with order {:?}", session.current().kinds());

        Ok(Self {
            source,
            store,
            clock,
            session,
        })
    }

    pub fn session(&self) -> &ChartSession {
        &self.session
    }

    pub fn charts(&self) -> &OrderedChartList {
        self.session.current()
    }

    /// Rebuilds charts from the current records, keeping the displayed order.
    #[instrument(skip_all)]
    pub async fn refresh(&mut self) -> Result<RefreshOutcome> {
        let records = self.source.query_all().await?;
        let generated = aggregate(records, self.clock.time()).await?;
        Ok(self.session.refresh(generated))
    }

    pub fn begin_drag(&mut self, kind: ChartKind) -> Result<()> {
        self.session.begin_drag(kind)
    }

    pub fn preview_reorder(
        &mut self,
        dragged: ChartKind,
        drop_onto: ChartKind,
    ) -> Result<&OrderedChartList> {
        self.session.preview_reorder(dragged, drop_onto)
    }

    pub fn cancel_drag(&mut self) {
        self.session.cancel_drag()
    }

    /// Keeps the previewed order and saves it. Returns the saved bytes.
    pub fn commit_reorder(&mut self) -> Result<Vec<u8>> {
        let bytes = self.session.commit_reorder()?;
        self.store.set(CHART_ORDER_KEY, &bytes)?;
        Ok(bytes)
    }

    /// Drags `dragged` onto `drop_onto` and commits right away.
    pub fn move_chart(&mut self, dragged: ChartKind, drop_onto: ChartKind) -> Result<Vec<u8>> {
        self.begin_drag(dragged)?;
        if let Err(e) = self.preview_reorder(dragged, drop_onto) {
            self.cancel_drag();
            return Err(e);
        }
        self.commit_reorder()
    }

    /// Returns to the default order and forgets the saved one.
    pub fn reset_order(&mut self) -> Result<()> {
        self.session.reset_order()?;
        self.store.set(CHART_ORDER_KEY, &[])?;
        Ok(())
    }

    pub async fn overall_statistics(&self) -> Result<OverallStatistics> {
        let records = self.source.query_all().await?;
        Ok(overall_statistics(&records, &self.clock.time()))
    }
}
