use std::path::Path;

use anyhow::Result;
use chrono::{Local, Utc};
use tracing::info;

use crate::{
    charts::ChartKind,
    session::board::ChartBoard,
    storage::{
        entities::CreationRecordEntity,
        order_store::FileOrderStore,
        record_storage::{RecordSource, RecordStorageImpl},
    },
    utils::clock::{Clock, DefaultClock},
};

use super::{
    moment::MomentArgs,
    output::{format_order, render_chart, share::share_summary},
};

type FileBoard = ChartBoard<RecordStorageImpl, FileOrderStore>;

fn record_storage(dir: &Path) -> Result<RecordStorageImpl> {
    Ok(RecordStorageImpl::new(dir.join("records"))?)
}

async fn open_board(dir: &Path, clock: Box<dyn Clock>) -> Result<FileBoard> {
    let store = FileOrderStore::new(dir.join("state"))?;
    ChartBoard::open(record_storage(dir)?, store, clock).await
}

pub async fn process_add_command(
    dir: &Path,
    title: Option<String>,
    moment: MomentArgs,
) -> Result<()> {
    let created_at = moment.moment()?.map_or_else(Utc::now, |v| v.to_utc());
    let record = CreationRecordEntity::new(title.unwrap_or_default(), created_at);
    record_storage(dir)?.append(&record).await?;
    info!("Added record {record:?}");
    println!(
        "Added record at {}",
        created_at.with_timezone(&Local).format("%x %H:%M:%S")
    );
    Ok(())
}

/// Prints records newest first.
pub async fn process_list_command(dir: &Path, limit: usize) -> Result<()> {
    let mut records = record_storage(dir)?.query_all().await?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    for record in records.iter().take(limit) {
        println!(
            "{}\t{}",
            record.created_at.with_timezone(&Local).format("%x %H:%M"),
            record.title
        );
    }
    if records.len() > limit {
        println!("... and {} more", records.len() - limit);
    }
    Ok(())
}

pub async fn process_charts_command(dir: &Path, moment: MomentArgs, json: bool) -> Result<()> {
    let board = open_board(dir, moment.clock()?).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(board.charts())?);
        return Ok(());
    }
    for entry in board.charts().entries() {
        println!("{}", render_chart(entry));
    }
    Ok(())
}

pub async fn process_move_command(dir: &Path, dragged: ChartKind, onto: ChartKind) -> Result<()> {
    let mut board = open_board(dir, Box::new(DefaultClock)).await?;
    board.move_chart(dragged, onto)?;
    println!("{}", format_order(board.charts()));
    Ok(())
}

pub async fn process_order_command(dir: &Path) -> Result<()> {
    let board = open_board(dir, Box::new(DefaultClock)).await?;
    println!("{}", format_order(board.charts()));
    Ok(())
}

pub async fn process_reset_command(dir: &Path) -> Result<()> {
    let mut board = open_board(dir, Box::new(DefaultClock)).await?;
    board.reset_order()?;
    println!("{}", format_order(board.charts()));
    Ok(())
}

pub async fn process_stats_command(
    dir: &Path,
    moment: MomentArgs,
    share: bool,
    json: bool,
) -> Result<()> {
    let board = open_board(dir, moment.clock()?).await?;
    let stats = board.overall_statistics().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if share {
        println!("{}", share_summary(&stats));
    } else {
        println!("Total\t{}", stats.total);
        println!("This week\t{}", stats.weekly);
        println!("Active days\t{}", stats.active_days);
        println!("Daily average\t{:.2}", stats.daily_average);
    }
    Ok(())
}
