use tracing::trace;

use super::{ChartEntry, OrderedChartList, PersistedOrderEntry};

/// Puts freshly generated charts into the order described by `reference`.
///
/// `reference` is either the order read from disk when the dashboard opens, or the order of the
/// charts currently on screen when data is refreshed. Kinds from `reference` that `generated`
/// doesn't have are dropped. Generated kinds that `reference` doesn't mention are appended in their
/// generated order with their generated positions, then everything is sorted by position and
/// renumbered so that positions match indices.
pub fn merge_order(
    generated: OrderedChartList,
    reference: &[PersistedOrderEntry],
) -> OrderedChartList {
    let mut available = generated.into_entries().into_iter().map(Some).collect::<Vec<_>>();
    let mut merged = Vec::<ChartEntry>::with_capacity(available.len());

    for reference_entry in reference {
        let found = available
            .iter_mut()
            .find(|v| matches!(v, Some(entry) if entry.kind == reference_entry.kind))
            .and_then(Option::take);
        match found {
            Some(mut entry) => {
                entry.position = reference_entry.position;
                merged.push(entry);
            }
            None => trace!("Dropping {} from reference order", reference_entry.kind),
        }
    }

    // Whatever the reference did not mention keeps its generated position
    merged.extend(available.into_iter().flatten());

    // Stable, so entries with equal positions keep the order they were added in
    merged.sort_by_key(|v| v.position);

    OrderedChartList::from_entries(merged)
}
