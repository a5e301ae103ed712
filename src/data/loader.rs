use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::MalformedInputError;
use super::model::{GdpDataset, WideRecord, WideTable, Year};

/// Name of the key column every supported file must carry.
pub const KEY_COLUMN: &str = "country";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a wide GDP table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header `country,1800,1801,...`, one row per country
/// * `.json`    – `[{ "country": "A", "1800": 603.0, ... }, ...]`
/// * `.parquet` – a string `country` column plus one numeric column per year
///
/// Shape problems surface as a [`MalformedInputError`] inside the returned
/// error; callers can recover it with `downcast_ref`.
pub fn load_file(path: &Path) -> Result<GdpDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Header and cell parsing shared by all formats
// ---------------------------------------------------------------------------

/// Where the key column and the year columns sit in a header row.
#[derive(Debug)]
struct HeaderLayout {
    key_idx: usize,
    /// `(column index, year)` in column order.
    year_columns: Vec<(usize, Year)>,
}

impl HeaderLayout {
    fn parse<S: AsRef<str>>(labels: &[S]) -> Result<Self, MalformedInputError> {
        let key_idx = labels
            .iter()
            .position(|l| l.as_ref().trim() == KEY_COLUMN)
            .ok_or(MalformedInputError::MissingKeyColumn(KEY_COLUMN))?;

        let year_columns = labels
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != key_idx)
            .map(|(i, label)| parse_year(label.as_ref()).map(|year| (i, year)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HeaderLayout {
            key_idx,
            year_columns,
        })
    }

    fn table(&self) -> Result<WideTable, MalformedInputError> {
        WideTable::new(self.year_columns.iter().map(|&(_, y)| y).collect())
    }
}

fn parse_year(label: &str) -> Result<Year, MalformedInputError> {
    label
        .trim()
        .parse::<Year>()
        .map_err(|_| MalformedInputError::NonIntegerYear(label.to_string()))
}

/// A cell that is empty, not a number, or not finite is a missing value.
fn parse_cell(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<GdpDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_csv(file).with_context(|| format!("loading {}", path.display()))
}

/// Parse a wide CSV table from any reader.
pub fn read_csv<R: Read>(input: R) -> Result<GdpDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let layout = HeaderLayout::parse(&headers)?;
    let mut table = layout.table()?;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let country = record.get(layout.key_idx).unwrap_or("").trim().to_string();
        let values = layout
            .year_columns
            .iter()
            .map(|&(i, _)| record.get(i).and_then(parse_cell))
            .collect();

        table.push(WideRecord { country, values })?;
    }

    Ok(GdpDataset::from_wide(table)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<GdpDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON {}", path.display()))?;
    parse_json(&text).with_context(|| format!("loading {}", path.display()))
}

/// Parse a records-oriented JSON table (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "country": "Afghanistan", "1800": 603.0, "1801": null },
///   ...
/// ]
/// ```
///
/// JSON objects carry no column order, so year columns come out ascending.
/// A record lacking a year key has a missing value for that year.
pub fn parse_json(text: &str) -> Result<GdpDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut labels: BTreeSet<&str> = BTreeSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        labels.extend(obj.keys().map(String::as_str).filter(|k| *k != KEY_COLUMN));
    }

    let mut year_keys: Vec<(Year, &str)> = labels
        .into_iter()
        .map(|label| parse_year(label).map(|year| (year, label)))
        .collect::<Result<_, _>>()?;
    year_keys.sort_by_key(|&(year, _)| year);

    let mut table = WideTable::new(year_keys.iter().map(|&(y, _)| y).collect())?;

    for (i, rec) in records.iter().enumerate() {
        // Shape was checked while collecting labels.
        let Some(obj) = rec.as_object() else { continue };
        let country = match obj.get(KEY_COLUMN) {
            Some(JsonValue::String(s)) => s.trim().to_string(),
            Some(JsonValue::Null) | None => String::new(),
            Some(other) => bail!("Row {i}: '{KEY_COLUMN}' is not a string: {other}"),
        };
        let values = year_keys
            .iter()
            .map(|&(_, key)| obj.get(key).and_then(json_to_value))
            .collect();

        table.push(WideRecord { country, values })?;
    }

    Ok(GdpDataset::from_wide(table)?)
}

fn json_to_value(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => parse_cell(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a wide Parquet table.
///
/// Expected schema:
/// - `country`: Utf8 / LargeUtf8
/// - one column per year, named by the year, of any numeric type
///
/// Year columns of other types are cast to Float64; cells that do not
/// convert become missing values, as do nulls.
fn load_parquet(path: &Path) -> Result<GdpDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let labels: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let layout = HeaderLayout::parse(&labels)?;
    let mut table = layout.table()?;

    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let key_col = cast(batch.column(layout.key_idx), &DataType::Utf8)
            .with_context(|| format!("reading '{KEY_COLUMN}' column"))?;
        let keys = key_col.as_string::<i32>();

        let year_cols = layout
            .year_columns
            .iter()
            .map(|&(i, year)| {
                cast(batch.column(i), &DataType::Float64)
                    .with_context(|| format!("reading year column {year}"))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let country = if keys.is_null(row) {
                String::new()
            } else {
                keys.value(row).trim().to_string()
            };
            let values = year_cols
                .iter()
                .map(|col| {
                    let arr = col.as_primitive::<Float64Type>();
                    if arr.is_null(row) {
                        None
                    } else {
                        Some(arr.value(row)).filter(|v| v.is_finite())
                    }
                })
                .collect();

            table.push(WideRecord { country, values })?;
        }
    }

    Ok(GdpDataset::from_wide(table)?)
}
