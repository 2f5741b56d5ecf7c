use tracing::warn;

use super::{ChartKind, OrderedChartList};

/// Moves `dragged` to the place `drop_onto` currently occupies. Charts in between shift by one
/// towards the old place of `dragged`.
///
/// Dropping a chart onto itself, or naming a kind the list doesn't have, returns the list as is.
pub fn reorder(
    list: &OrderedChartList,
    dragged: ChartKind,
    drop_onto: ChartKind,
) -> OrderedChartList {
    if dragged == drop_onto {
        return list.clone();
    }

    let (Some(from), Some(to)) = (list.index_of(dragged), list.index_of(drop_onto)) else {
        warn!("Can't move {dragged} onto {drop_onto}, one of them is not on the dashboard");
        return list.clone();
    };

    let mut entries = list.entries().to_vec();
    let entry = entries.remove(from);
    entries.insert(to, entry);
    OrderedChartList::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::charts::{aggregator::generate_default_charts, ChartKind, OrderedChartList};

    use super::reorder;

    fn generated() -> OrderedChartList {
        generate_default_charts(&[], &Utc.with_ymd_and_hms(2024, 4, 5, 12, 0, 0).unwrap())
    }

    fn positions(list: &OrderedChartList) -> Vec<i64> {
        list.entries().iter().map(|v| v.position).collect()
    }

    #[test]
    fn move_last_onto_first() {
        use ChartKind::*;
        let result = reorder(&generated(), Line, Heatmap);
        assert_eq!(result.kinds(), vec![Line, Heatmap, Bar, Pie]);
        assert_eq!(positions(&result), vec![0, 1, 2, 3]);
    }

    #[test]
    fn move_forward() {
        use ChartKind::*;
        let result = reorder(&generated(), Heatmap, Pie);
        assert_eq!(result.kinds(), vec![Bar, Pie, Heatmap, Line]);
        assert_eq!(positions(&result), vec![0, 1, 2, 3]);
    }

    #[test]
    fn neighbours_swap() {
        use ChartKind::*;
        let result = reorder(&generated(), Bar, Pie);
        assert_eq!(result.kinds(), vec![Heatmap, Pie, Bar, Line]);
        let back = reorder(&result, Bar, Pie);
        assert_eq!(back, generated());
    }

    #[test]
    fn drop_onto_itself_changes_nothing() {
        let list = generated();
        for kind in ChartKind::ALL {
            assert_eq!(reorder(&list, kind, kind), list);
        }
    }

    #[test]
    fn missing_kind_changes_nothing() {
        use ChartKind::*;
        let list = OrderedChartList::from_entries(
            generated()
                .into_entries()
                .into_iter()
                .filter(|v| v.kind != Pie)
                .collect(),
        );
        assert_eq!(reorder(&list, Pie, Heatmap), list);
        assert_eq!(reorder(&list, Line, Pie), list);
    }

    #[test]
    fn repeated_previews_end_in_the_same_place() {
        use ChartKind::*;
        // Dragging the line chart over the pie chart and then over the heatmap
        let preview = reorder(&generated(), Line, Pie);
        assert_eq!(preview.kinds(), vec![Heatmap, Bar, Line, Pie]);
        let preview = reorder(&preview, Line, Heatmap);
        assert_eq!(preview.kinds(), vec![Line, Heatmap, Bar, Pie]);
        assert_eq!(preview, reorder(&generated(), Line, Heatmap));
    }
}
