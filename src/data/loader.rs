use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{AirQualityDataset, RawRecord};

const YEAR: &str = "year";
const PM25: &str = "PM2.5";
const WSPM: &str = "WSPM";
const RAIN: &str = "RAIN";
const CATEGORY: &str = "Kategori Kualitas Udara";
const CATEGORY_ALIAS: &str = "AirQualityCategory";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an air-quality dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `year`, `PM2.5`, `WSPM`, `RAIN`,
///   `Kategori Kualitas Udara` (other columns ignored)
/// * `.parquet` – the same columns
/// * `.json`    – `[{ "year": 2013, "PM2.5": 12.0, ... }, ...]`
pub fn load_file(path: &Path) -> Result<AirQualityDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => read_csv(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = AirQualityDataset::from_records(records)
        .with_context(|| format!("validating {}", path.display()))?;

    match dataset.year_bounds() {
        Some(bounds) => log::info!(
            "Loaded {} observations over {} years ({bounds}) from {}",
            dataset.len(),
            dataset.distinct_years().len(),
            path.display()
        ),
        None => log::warn!("{} contains no observations", path.display()),
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows are deserialized by header name, so column order is free and
/// unrelated columns (`No`, `month`, `PM10`, `station`, ...) are skipped.
/// Empty numeric cells come through as `None` and are rejected later.
fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    reader
        .deserialize()
        .enumerate()
        .map(|(i, result)| result.with_context(|| format!("CSV data row {}", i + 1)))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "year": 2013, "PM2.5": 12.0, "WSPM": 1.8, "RAIN": 0.0,
///     "Kategori Kualitas Udara": "Baik" },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// - `year`: Int32 or Int64
/// - `PM2.5` / `WSPM` / `RAIN`: Float64, Float32, Int32 or Int64 (nulls allowed,
///   reported as missing values during validation)
/// - `Kategori Kualitas Udara`: Utf8 or LargeUtf8
fn read_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(records_from_batch(&batch, offset)?);
        offset += batch.num_rows();
    }

    Ok(records)
}

fn records_from_batch(batch: &RecordBatch, offset: usize) -> Result<Vec<RawRecord>> {
    let year = column(batch, YEAR)?;
    let pm25 = column(batch, PM25)?;
    let wspm = column(batch, WSPM)?;
    let rain = column(batch, RAIN)?;
    let category = column(batch, CATEGORY).or_else(|_| column(batch, CATEGORY_ALIAS))?;

    (0..batch.num_rows())
        .map(|row| {
            let at = offset + row + 1;
            let cell = |name: &str| format!("Data row {at}: '{name}'");
            Ok(RawRecord {
                year: extract_year(year, row).with_context(|| cell(YEAR))?,
                pm25: extract_f64(pm25, row).with_context(|| cell(PM25))?,
                wspm: extract_f64(wspm, row).with_context(|| cell(WSPM))?,
                rain: extract_f64(rain, row).with_context(|| cell(RAIN))?,
                category: extract_string(category, row).with_context(|| cell(CATEGORY))?,
            })
        })
        .collect()
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn extract_year(col: &Arc<dyn Array>, row: usize) -> Result<i32> {
    if col.is_null(row) {
        bail!("null year");
    }
    match col.data_type() {
        DataType::Int32 => Ok(col.as_primitive::<arrow::datatypes::Int32Type>().value(row)),
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            i32::try_from(arr.value(row)).context("year out of range")
        }
        other => bail!("Expected Int32 or Int64 year column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(Some(arr.value(row)))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(Some(arr.value(row) as f64))
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(Some(arr.value(row) as f64))
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(Some(arr.value(row) as f64))
    } else {
        bail!("Expected a numeric column, got {:?}", col.data_type())
    }
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null category");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected Utf8 category column, got {other:?}"),
    }
}
