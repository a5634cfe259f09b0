use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{SalesRecord, SalesTable, MONTH_COLUMN, STATE_COLUMN};

// ---------------------------------------------------------------------------
// FilterSelection – the user's current choices
// ---------------------------------------------------------------------------

/// A single-value filter with an explicit "all" sentinel. Filtering with
/// `All` is equivalent to skipping the filter entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Only(String),
}

impl Filter {
    fn matches(&self, record: &SalesRecord, column: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => record
                .get(column)
                .and_then(|v| v.as_text())
                .is_some_and(|v| v == wanted),
        }
    }
}

/// The user's current choice of state, month, metric, and dimension.
/// Ephemeral and session-scoped; always passed into [`compute`] explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub state: Filter,
    pub month: Filter,
    /// Name of the numeric column to aggregate.
    pub metric: String,
    /// Name of the categorical column to group by.
    pub dimension: String,
}

// ---------------------------------------------------------------------------
// AggregatedSeries – the engine's output
// ---------------------------------------------------------------------------

/// One bar of the chart: a dimension value and its aggregated metric.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SeriesPoint {
    pub group: String,
    pub value: f64,
}

/// Ordered (group, mean) pairs plus the overall mean, ready for rendering.
///
/// Per-group aggregation is the arithmetic mean, not the sum, so output
/// magnitude is comparable across groups of different sizes. `overall_mean`
/// is the mean of the per-group means (the reference line the chart draws),
/// which diverges from the mean of raw rows whenever group sizes differ.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    /// Sorted ascending by group label; one entry per distinct label.
    pub points: Vec<SeriesPoint>,
    pub overall_mean: f64,
}

/// Outcome of a computation. An empty filtered set is a valid result, not an
/// error: the front-end renders it as "no data", never divides by zero.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesResult {
    Series(AggregatedSeries),
    NoData,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The selection referenced a column the table does not have. Recoverable:
/// the caller should reject the selection and keep its previous state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidSelectionError {
    #[error("unknown dimension column '{0}'")]
    UnknownDimension(String),

    #[error("unknown metric column '{0}'")]
    UnknownMetric(String),
}

// ---------------------------------------------------------------------------
// compute – filter, group, aggregate
// ---------------------------------------------------------------------------

/// Filter the table by the selection's state and month, group by the
/// dimension column, and aggregate the metric column per group.
///
/// Pure function of its two inputs: same `(table, selection)` always yields
/// the same result, with deterministic ascending group order.
pub fn compute(
    table: &SalesTable,
    selection: &FilterSelection,
) -> Result<SeriesResult, InvalidSelectionError> {
    if !table
        .categorical_columns
        .iter()
        .any(|c| *c == selection.dimension)
    {
        return Err(InvalidSelectionError::UnknownDimension(
            selection.dimension.clone(),
        ));
    }
    if !table.metric_columns.iter().any(|c| *c == selection.metric) {
        return Err(InvalidSelectionError::UnknownMetric(selection.metric.clone()));
    }

    // BTreeMap keeps groups sorted ascending by label, independent of row
    // order; ties cannot occur since the label is the key.
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in &table.records {
        if !selection.state.matches(record, STATE_COLUMN)
            || !selection.month.matches(record, MONTH_COLUMN)
        {
            continue;
        }
        // Rows with a blank dimension or metric cell carry nothing to plot.
        let Some(group) = record.get(&selection.dimension).and_then(|v| v.as_text()) else {
            continue;
        };
        let Some(value) = record.get(&selection.metric).and_then(|v| v.as_f64()) else {
            continue;
        };
        groups.entry(group.to_string()).or_default().push(value);
    }

    if groups.is_empty() {
        return Ok(SeriesResult::NoData);
    }

    let points: Vec<SeriesPoint> = groups
        .into_iter()
        .map(|(group, values)| SeriesPoint {
            value: mean(&values),
            group,
        })
        .collect();

    // Mean of the per-group means, not of the raw filtered rows.
    let overall_mean = mean(&points.iter().map(|p| p.value).collect::<Vec<_>>());

    Ok(SeriesResult::Series(AggregatedSeries {
        points,
        overall_mean,
    }))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, SalesTable};
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn row(state: &str, month: &str, category: &str, revenue: f64) -> SalesRecord {
        let mut values = BTreeMap::new();
        values.insert("state".to_string(), CellValue::Text(state.to_string()));
        values.insert("month".to_string(), CellValue::Text(month.to_string()));
        values.insert("category".to_string(), CellValue::Text(category.to_string()));
        values.insert("revenue".to_string(), CellValue::Number(revenue));
        SalesRecord { values }
    }

    fn table(records: Vec<SalesRecord>) -> SalesTable {
        SalesTable::from_records(
            records,
            vec!["category".into(), "month".into(), "state".into()],
            vec!["revenue".into()],
        )
    }

    fn selection(state: Filter, month: Filter) -> FilterSelection {
        FilterSelection {
            state,
            month,
            metric: "revenue".into(),
            dimension: "category".into(),
        }
    }

    fn expect_series(result: SeriesResult) -> AggregatedSeries {
        match result {
            SeriesResult::Series(series) => series,
            SeriesResult::NoData => panic!("expected a series, got NoData"),
        }
    }

    #[test]
    fn aggregates_per_group_mean_and_mean_of_means() {
        // Unequal group sizes: A has two rows, B has one. A mean-of-raw-rows
        // implementation would report 150 instead of 125.
        let table = table(vec![
            row("SP", "Jan", "A", 100.0),
            row("SP", "Jan", "A", 300.0),
            row("SP", "Jan", "B", 50.0),
        ]);
        let sel = selection(Filter::Only("SP".into()), Filter::Only("Jan".into()));

        let series = expect_series(compute(&table, &sel).unwrap());
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].group, "A");
        assert_relative_eq!(series.points[0].value, 200.0);
        assert_eq!(series.points[1].group, "B");
        assert_relative_eq!(series.points[1].value, 50.0);
        assert_relative_eq!(series.overall_mean, 125.0);
    }

    #[test]
    fn groups_are_sorted_ascending_regardless_of_row_order() {
        let table = table(vec![
            row("SP", "Jan", "zebra", 1.0),
            row("SP", "Jan", "apple", 2.0),
            row("SP", "Jan", "mango", 3.0),
        ]);
        let sel = selection(Filter::All, Filter::All);

        let series = expect_series(compute(&table, &sel).unwrap());
        let labels: Vec<&str> = series.points.iter().map(|p| p.group.as_str()).collect();
        assert_eq!(labels, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn all_sentinel_is_equivalent_to_no_filter() {
        let table = table(vec![
            row("SP", "Jan", "A", 10.0),
            row("RJ", "Feb", "A", 30.0),
            row("MG", "Mar", "B", 20.0),
        ]);

        let unfiltered = compute(&table, &selection(Filter::All, Filter::All)).unwrap();
        let series = expect_series(unfiltered.clone());
        assert_relative_eq!(series.points[0].value, 20.0);
        assert_relative_eq!(series.points[1].value, 20.0);

        // "all" for one axis, concrete value for the other.
        let sel = selection(Filter::Only("SP".into()), Filter::All);
        let series = expect_series(compute(&table, &sel).unwrap());
        assert_eq!(series.points.len(), 1);
        assert_relative_eq!(series.points[0].value, 10.0);
    }

    #[test]
    fn unmatched_filter_yields_no_data_not_a_panic() {
        let table = table(vec![row("SP", "Jan", "A", 10.0)]);
        let sel = selection(Filter::Only("RJ".into()), Filter::Only("Jan".into()));
        assert_eq!(compute(&table, &sel).unwrap(), SeriesResult::NoData);
    }

    #[test]
    fn empty_table_yields_no_data() {
        let table = table(Vec::new());
        let sel = selection(Filter::All, Filter::All);
        assert_eq!(compute(&table, &sel).unwrap(), SeriesResult::NoData);
    }

    #[test]
    fn unknown_dimension_is_rejected() {
        let table = table(vec![row("SP", "Jan", "A", 10.0)]);
        let sel = FilterSelection {
            state: Filter::All,
            month: Filter::All,
            metric: "revenue".into(),
            dimension: "nonexistent_column".into(),
        };
        assert_eq!(
            compute(&table, &sel),
            Err(InvalidSelectionError::UnknownDimension(
                "nonexistent_column".into()
            ))
        );
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let table = table(vec![row("SP", "Jan", "A", 10.0)]);
        let sel = FilterSelection {
            state: Filter::All,
            month: Filter::All,
            metric: "profit".into(),
            dimension: "category".into(),
        };
        assert_eq!(
            compute(&table, &sel),
            Err(InvalidSelectionError::UnknownMetric("profit".into()))
        );
    }

    #[test]
    fn compute_is_deterministic() {
        let table = table(vec![
            row("SP", "Jan", "B", 5.0),
            row("SP", "Jan", "A", 7.0),
            row("SP", "Feb", "A", 9.0),
        ]);
        let sel = selection(Filter::Only("SP".into()), Filter::All);

        let first = compute(&table, &sel).unwrap();
        let second = compute(&table, &sel).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn grouping_by_month_uses_the_month_column_as_dimension() {
        let table = table(vec![
            row("SP", "Jan", "A", 10.0),
            row("SP", "Feb", "A", 30.0),
        ]);
        let sel = FilterSelection {
            state: Filter::All,
            month: Filter::All,
            metric: "revenue".into(),
            dimension: "month".into(),
        };

        let series = expect_series(compute(&table, &sel).unwrap());
        let labels: Vec<&str> = series.points.iter().map(|p| p.group.as_str()).collect();
        assert_eq!(labels, vec!["Feb", "Jan"]);
        assert_relative_eq!(series.overall_mean, 20.0);
    }
}
