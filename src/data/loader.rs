use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use calamine::{open_workbook, Reader, Xls, Xlsx};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{normalize_column, CellValue, SalesRecord, SalesTable, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Loading failures are fatal to the session: the caller must surface them
/// and refuse to render, never fall back to an empty table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("required column '{0}' is missing from the header row")]
    MissingColumn(String),

    #[error("no numeric metric column found in the header row")]
    NoMetricColumns,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales spreadsheet from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – Excel workbook, first sheet, header row first
/// * `.csv`           – header row with column names
/// * `.json`          – records-oriented: `[{ "state": "SP", ... }, ...]`
///
/// Column names are normalized (trimmed, lowercased). The header must
/// contain `state`, `month`, `category`, `subcategory` and at least one
/// column whose non-empty values are all numeric (a metric).
pub fn load(path: &Path) -> Result<SalesTable, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (headers, rows) = match ext.as_str() {
        "xlsx" => read_excel::<Xlsx<_>>(path)?,
        "xls" => read_excel::<Xls<_>>(path)?,
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    build_table(headers, rows)
}

// ---------------------------------------------------------------------------
// Format readers – all funnel into (headers, raw string rows)
// ---------------------------------------------------------------------------

fn io_err(path: &Path, source: std::io::Error) -> DataLoadError {
    DataLoadError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn parse_err(path: &Path, reason: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), DataLoadError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_err(path, e))?
        .iter()
        .map(normalize_column)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| parse_err(path, e))?;
        rows.push(record.iter().map(|v| v.trim().to_string()).collect());
    }
    Ok((headers, rows))
}

fn read_excel<W>(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), DataLoadError>
where
    W: Reader<std::io::BufReader<File>>,
    W::Error: std::fmt::Display,
{
    if !path.exists() {
        return Err(io_err(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }

    let mut workbook: W = open_workbook(path).map_err(|e| parse_err(path, e))?;

    let sheet_names = workbook.sheet_names();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| parse_err(path, "workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| parse_err(path, e))?;

    let mut sheet_rows = range.rows();
    let header_row = sheet_rows
        .next()
        .ok_or_else(|| parse_err(path, "sheet has no header row"))?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| normalize_column(&cell.to_string()))
        .collect();

    let mut rows = Vec::new();
    for data_row in sheet_rows {
        rows.push(
            data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
        );
    }
    Ok((headers, rows))
}

/// Records-oriented JSON, the default `df.to_json(orient='records')` layout.
fn read_json(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| parse_err(path, e))?;

    let records = root
        .as_array()
        .ok_or_else(|| parse_err(path, "expected a top-level JSON array"))?;

    // Union of keys across records, sorted, is the header row.
    let mut header_set = std::collections::BTreeSet::new();
    for rec in records {
        if let Some(obj) = rec.as_object() {
            header_set.extend(obj.keys().map(|k| normalize_column(k)));
        }
    }
    let headers: Vec<String> = header_set.into_iter().collect();

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| parse_err(path, format!("row {i} is not a JSON object")))?;
        let by_key: BTreeMap<String, String> = obj
            .iter()
            .map(|(k, v)| (normalize_column(k), json_to_string(v)))
            .collect();
        rows.push(
            headers
                .iter()
                .map(|h| by_key.get(h).cloned().unwrap_or_default())
                .collect(),
        );
    }
    Ok((headers, rows))
}

fn json_to_string(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Schema pass – classify columns, build the table
// ---------------------------------------------------------------------------

fn build_table(
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> Result<SalesTable, DataLoadError> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DataLoadError::MissingColumn(required.to_string()));
        }
    }

    // A column is a metric when it has at least one non-empty value and every
    // non-empty value parses as a number. The required columns stay
    // categorical even when their values are ordinal (numeric months).
    let mut metric_columns = Vec::new();
    let mut categorical_columns = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if REQUIRED_COLUMNS.contains(&header.as_str()) {
            categorical_columns.push(header.clone());
            continue;
        }
        let cells = rows.iter().filter_map(|r| r.get(idx)).filter(|v| !v.is_empty());
        let mut any = false;
        let all_numeric = cells.inspect(|_| any = true).all(|v| v.parse::<f64>().is_ok());
        if any && all_numeric {
            metric_columns.push(header.clone());
        } else {
            categorical_columns.push(header.clone());
        }
    }
    if metric_columns.is_empty() {
        return Err(DataLoadError::NoMetricColumns);
    }
    metric_columns.sort();
    categorical_columns.sort();

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut values = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let Some(raw) = row.get(idx) else { continue };
            if raw.is_empty() {
                continue;
            }
            let cell = if metric_columns.contains(header) {
                match raw.parse::<f64>() {
                    Ok(v) => CellValue::Number(v),
                    Err(_) => continue,
                }
            } else {
                CellValue::Text(raw.clone())
            };
            values.insert(header.clone(), cell);
        }
        // Skip fully blank rows (trailing spreadsheet padding).
        if values.is_empty() {
            continue;
        }
        records.push(SalesRecord { values });
    }

    log::info!(
        "loaded {} records, {} categorical columns, {} metric columns",
        records.len(),
        categorical_columns.len(),
        metric_columns.len()
    );

    Ok(SalesTable::from_records(
        records,
        categorical_columns,
        metric_columns,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn loads_csv_and_classifies_columns() {
        let file = write_csv(
            "State,Month,Category,Subcategory,Revenue,Units\n\
             SP,Jan,Food,Snacks,100.5,3\n\
             RJ,Feb,Drink,Soda,80,2\n",
        );
        let table = load(file.path()).expect("load csv");

        assert_eq!(table.len(), 2);
        assert_eq!(table.metric_columns, vec!["revenue", "units"]);
        assert_eq!(
            table.categorical_columns,
            vec!["category", "month", "state", "subcategory"]
        );
        assert_eq!(table.labels("state"), vec!["RJ", "SP"]);
    }

    #[test]
    fn ordinal_months_stay_categorical() {
        let file = write_csv(
            "state,month,category,subcategory,revenue\n\
             SP,1,Food,Snacks,10\n\
             SP,2,Food,Snacks,20\n",
        );
        let table = load(file.path()).expect("load csv");

        assert_eq!(table.metric_columns, vec!["revenue"]);
        assert_eq!(table.labels("month"), vec!["1", "2"]);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let file = write_csv("state,month,category,revenue\nSP,Jan,Food,10\n");
        match load(file.path()) {
            Err(DataLoadError::MissingColumn(col)) => assert_eq!(col, "subcategory"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn table_without_metric_column_is_an_error() {
        let file = write_csv(
            "state,month,category,subcategory,note\n\
             SP,Jan,Food,Snacks,hello\n",
        );
        assert!(matches!(
            load(file.path()),
            Err(DataLoadError::NoMetricColumns)
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let missing = Path::new("definitely/not/here.csv");
        assert!(matches!(load(missing), Err(DataLoadError::Io { .. })));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load(Path::new("sales.parquet")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "parquet"));
    }

    #[test]
    fn loads_records_oriented_json() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("create temp file");
        file.write_all(
            br#"[
                {"state": "SP", "month": "Jan", "category": "A", "subcategory": "x", "revenue": 100},
                {"state": "MG", "month": "Feb", "category": "B", "subcategory": "y", "revenue": 50.5}
            ]"#,
        )
        .expect("write json");

        let table = load(file.path()).expect("load json");
        assert_eq!(table.len(), 2);
        assert_eq!(table.metric_columns, vec!["revenue"]);
        assert_eq!(table.labels("month"), vec!["Feb", "Jan"]);
    }
}
