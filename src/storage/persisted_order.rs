//! Conversion between the chart order and the bytes it's saved as. The format is a json array of
//! `{"kind": "pie", "position": 0}` objects in display order.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::charts::{ChartKind, OrderedChartList, PersistedOrderEntry};

/// Kinds are read as plain strings, so that an order saved by a build with more chart kinds can
/// still be read.
#[derive(Debug, Serialize, Deserialize)]
struct StoredOrderEntry {
    kind: String,
    position: i64,
}

/// Encodes only the kind and position of every chart, in list order.
pub fn serialize(list: &OrderedChartList) -> Vec<u8> {
    let entries = list
        .order()
        .into_iter()
        .map(|v| StoredOrderEntry {
            kind: v.kind.identifier().to_string(),
            position: v.position,
        })
        .collect::<Vec<_>>();
    // A vector of plain structs can't fail to serialize
    serde_json::to_vec(&entries).unwrap_or_default()
}

/// Decodes an order saved by [serialize]. Returns `None` for empty or unreadable data, which
/// callers treat the same way as a first run. Unknown chart kinds are skipped.
pub fn deserialize(bytes: &[u8]) -> Option<Vec<PersistedOrderEntry>> {
    if bytes.is_empty() {
        return None;
    }

    let stored = match serde_json::from_slice::<Vec<StoredOrderEntry>>(bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!("Saved chart order is corrupted, falling back to the default order: {e}");
            return None;
        }
    };

    let entries = stored
        .into_iter()
        .filter_map(|v| match v.kind.parse::<ChartKind>() {
            Ok(kind) => Some(PersistedOrderEntry {
                kind,
                position: v.position,
            }),
            Err(_) => {
                debug!("Skipping unknown chart kind {}", v.kind);
                None
            }
        })
        .collect();
    Some(entries)
}
