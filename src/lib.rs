//! Dashboard for creation records. Records are summarized into four charts (a yearly heatmap,
//! weekly bars, a time of day split and a 30 day trend) that can be reordered. The order is
//! remembered between runs while the charts themselves are always rebuilt from records.
//!

pub mod charts;
pub mod cli;
pub mod session;
pub mod storage;
pub mod utils;
