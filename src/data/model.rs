use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source spreadsheet
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell. Categorical columns hold `Text`,
/// metric columns hold `Number`. Must be `Ord` so values can live in
/// `BTreeSet`s that back the selector widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

// -- Manual Eq/Ord: f64 is only PartialOrd, use total_cmp --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        match (self, other) {
            (Text(a), Text(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Number(_), Text(_)) => std::cmp::Ordering::Less,
            (Text(_), Number(_)) => std::cmp::Ordering::Greater,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
        }
    }
}

impl CellValue {
    /// Interpret the cell as a numeric metric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }

    /// Interpret the cell as a categorical label.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the spreadsheet
// ---------------------------------------------------------------------------

/// A single sale transaction (one row of the source spreadsheet).
/// Keys are normalized column names; empty cells are simply absent.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub values: BTreeMap<String, CellValue>,
}

impl SalesRecord {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }
}

// ---------------------------------------------------------------------------
// SalesTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Columns every dataset must carry, in addition to at least one numeric
/// metric column. Month values may be ordinal in the file but are kept as
/// text: they are filter labels, never aggregated.
pub const REQUIRED_COLUMNS: [&str; 4] = ["state", "month", "category", "subcategory"];

/// Column used for the region filter.
pub const STATE_COLUMN: &str = "state";
/// Column used for the month filter.
pub const MONTH_COLUMN: &str = "month";

/// The full parsed dataset with pre-computed column indices.
/// Read-only after load; the engine borrows it, never mutates it.
#[derive(Debug, Clone)]
pub struct SalesTable {
    /// All sale records (rows).
    pub records: Vec<SalesRecord>,
    /// Categorical columns, sorted; candidates for the Dimension selector.
    pub categorical_columns: Vec<String>,
    /// Numeric columns, sorted; candidates for the Metric selector.
    pub metric_columns: Vec<String>,
    /// For each categorical column the sorted set of unique labels.
    pub unique_values: BTreeMap<String, BTreeSet<String>>,
}

impl SalesTable {
    /// Build column indices from loaded records. `categorical` and `metric`
    /// come from the loader's schema pass over the header row.
    pub fn from_records(
        records: Vec<SalesRecord>,
        categorical: Vec<String>,
        metric: Vec<String>,
    ) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for col in &categorical {
            unique_values.insert(col.clone(), BTreeSet::new());
        }

        for rec in &records {
            for (col, val) in &rec.values {
                if let (Some(set), Some(text)) = (unique_values.get_mut(col), val.as_text()) {
                    set.insert(text.to_string());
                }
            }
        }

        SalesTable {
            records,
            categorical_columns: categorical,
            metric_columns: metric,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique labels of a categorical column (empty if unknown).
    pub fn labels(&self, column: &str) -> Vec<String> {
        self.unique_values
            .get(column)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Normalize a column name so later lookups are exact-match safe.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}
