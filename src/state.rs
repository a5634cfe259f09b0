use std::path::PathBuf;

use crate::data::engine::{compute, Filter, FilterSelection, SeriesResult};
use crate::data::model::SalesTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The table is loaded once and never mutated afterwards; the series is a
/// cache of `compute(table, selection)`, refreshed on every selection change.
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub table: Option<SalesTable>,

    /// Current filter choices (None until a table is loaded).
    pub selection: Option<FilterSelection>,

    /// Cached engine output for the current selection.
    pub series: SeriesResult,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Target path of a chart export awaiting the screenshot event.
    pub pending_chart_export: Option<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            selection: None,
            series: SeriesResult::NoData,
            status_message: None,
            pending_chart_export: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table and derive a default selection: all
    /// states, all months, first metric, `category` as the dimension.
    pub fn set_table(&mut self, table: SalesTable) {
        let dimension = if table.categorical_columns.iter().any(|c| c == "category") {
            "category".to_string()
        } else {
            table.categorical_columns.first().cloned().unwrap_or_default()
        };
        let metric = table.metric_columns.first().cloned().unwrap_or_default();

        self.selection = Some(FilterSelection {
            state: Filter::All,
            month: Filter::All,
            metric,
            dimension,
        });
        self.table = Some(table);
        self.status_message = None;
        self.recompute();
    }

    /// Recompute the cached series from the current table and selection.
    ///
    /// An invalid selection is recoverable: the previous series stays on
    /// screen and the error goes to the status line.
    pub fn recompute(&mut self) {
        let (Some(table), Some(selection)) = (&self.table, &self.selection) else {
            self.series = SeriesResult::NoData;
            return;
        };
        match compute(table, selection) {
            Ok(series) => {
                self.series = series;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("selection rejected: {e}");
                self.status_message = Some(format!("Selection rejected: {e}"));
            }
        }
    }

    pub fn set_state_filter(&mut self, filter: Filter) {
        if let Some(sel) = &mut self.selection {
            sel.state = filter;
            self.recompute();
        }
    }

    pub fn set_month_filter(&mut self, filter: Filter) {
        if let Some(sel) = &mut self.selection {
            sel.month = filter;
            self.recompute();
        }
    }

    pub fn set_metric(&mut self, metric: String) {
        if let Some(sel) = &mut self.selection {
            sel.metric = metric;
            self.recompute();
        }
    }

    pub fn set_dimension(&mut self, dimension: String) {
        if let Some(sel) = &mut self.selection {
            sel.dimension = dimension;
            self.recompute();
        }
    }

    /// Chart heading, e.g. `"revenue by category — SP / Jan"`.
    pub fn chart_title(&self) -> Option<String> {
        let sel = self.selection.as_ref()?;
        let state = match &sel.state {
            Filter::All => "all states",
            Filter::Only(s) => s.as_str(),
        };
        let month = match &sel.month {
            Filter::All => "all months",
            Filter::Only(m) => m.as_str(),
        };
        Some(format!(
            "{} by {} — {} / {}",
            sel.metric, sel.dimension, state, month
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, SalesRecord};
    use std::collections::BTreeMap;

    fn sample_table() -> SalesTable {
        let mut values = BTreeMap::new();
        values.insert("state".to_string(), CellValue::Text("SP".into()));
        values.insert("month".to_string(), CellValue::Text("Jan".into()));
        values.insert("category".to_string(), CellValue::Text("A".into()));
        values.insert("revenue".to_string(), CellValue::Number(42.0));
        SalesTable::from_records(
            vec![SalesRecord { values }],
            vec!["category".into(), "month".into(), "state".into()],
            vec!["revenue".into()],
        )
    }

    #[test]
    fn loading_a_table_derives_a_default_selection() {
        let mut state = AppState::default();
        state.set_table(sample_table());

        let sel = state.selection.as_ref().expect("selection after load");
        assert_eq!(sel.state, Filter::All);
        assert_eq!(sel.month, Filter::All);
        assert_eq!(sel.metric, "revenue");
        assert_eq!(sel.dimension, "category");
        assert!(matches!(state.series, SeriesResult::Series(_)));
    }

    #[test]
    fn invalid_selection_keeps_previous_series() {
        let mut state = AppState::default();
        state.set_table(sample_table());
        let before = state.series.clone();

        state.set_dimension("nope".into());

        assert_eq!(state.series, before);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn filter_change_triggers_recompute() {
        let mut state = AppState::default();
        state.set_table(sample_table());

        state.set_state_filter(Filter::Only("RJ".into()));
        assert_eq!(state.series, SeriesResult::NoData);

        state.set_state_filter(Filter::All);
        assert!(matches!(state.series, SeriesResult::Series(_)));
    }
}
