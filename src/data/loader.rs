use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{LaunchDataset, LaunchRecord, LaunchSite, Outcome};

/// Column names of the launch table.
pub const SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_COLUMN: &str = "Payload Mass (kg)";
pub const BOOSTER_COLUMN: &str = "Booster Version Category";
pub const OUTCOME_COLUMN: &str = "class";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the four launch columns (others ignored)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} launch records from {} ({} sites)",
        dataset.len(),
        path.display(),
        dataset.sites().len()
    );
    Ok(dataset)
}

/// Turn the raw cells of one row into a checked record.
///
/// `row` is the 1-based data row, not counting any header line.
fn build_record(
    row: usize,
    site: &str,
    payload_mass_kg: f64,
    booster_version_category: &str,
    class: i64,
) -> Result<LaunchRecord> {
    let site = LaunchSite::lookup(site)
        .with_context(|| format!("Data row {row}: unknown launch site '{site}'"))?;
    if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
        bail!("Data row {row}: payload mass {payload_mass_kg} must be finite and non-negative");
    }
    let outcome = u8::try_from(class)
        .ok()
        .and_then(|c| Outcome::try_from(c).ok())
        .with_context(|| format!("Data row {row}: '{OUTCOME_COLUMN}' must be 0 or 1, got {class}"))?;

    Ok(LaunchRecord::new(
        site,
        payload_mass_kg,
        booster_version_category.trim(),
        outcome,
    ))
}

fn finish(records: Vec<LaunchRecord>) -> Result<LaunchDataset> {
    LaunchDataset::new(records).context("validating launch records")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let site_idx = column(SITE_COLUMN)?;
    let mass_idx = column(PAYLOAD_COLUMN)?;
    let booster_idx = column(BOOSTER_COLUMN)?;
    let class_idx = column(OUTCOME_COLUMN)?;

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result.with_context(|| format!("CSV data row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let mass = cell(mass_idx)
            .parse::<f64>()
            .with_context(|| format!("Data row {row_no}: '{}' is not a number", cell(mass_idx)))?;
        let class = cell(class_idx)
            .parse::<i64>()
            .with_context(|| format!("Data row {row_no}: '{}' is not an integer", cell(class_idx)))?;

        records.push(build_record(
            row_no,
            cell(site_idx),
            mass,
            cell(booster_idx),
            class,
        )?);
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;
    let mut records = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let i = idx + 1;
        let obj = row
            .as_object()
            .with_context(|| format!("Data row {i} is not a JSON object"))?;
        let field = |name: &str| {
            obj.get(name)
                .with_context(|| format!("Data row {i}: missing '{name}'"))
        };

        let site = field(SITE_COLUMN)?
            .as_str()
            .with_context(|| format!("Data row {i}: '{SITE_COLUMN}' is not a string"))?;
        let mass = field(PAYLOAD_COLUMN)?
            .as_f64()
            .with_context(|| format!("Data row {i}: '{PAYLOAD_COLUMN}' is not a number"))?;
        let booster = field(BOOSTER_COLUMN)?
            .as_str()
            .with_context(|| format!("Data row {i}: '{BOOSTER_COLUMN}' is not a string"))?;
        let class = field(OUTCOME_COLUMN)?
            .as_i64()
            .with_context(|| format!("Data row {i}: '{OUTCOME_COLUMN}' is not an integer"))?;

        records.push(build_record(i, site, mass, booster, class)?);
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per launch field.
///
/// The mass column may be any float or integer type; `class` may be
/// Int32 or Int64.  Works with files written by Pandas and Polars.
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx))
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        let site_col = column(SITE_COLUMN)?;
        let mass_col = column(PAYLOAD_COLUMN)?;
        let booster_col = column(BOOSTER_COLUMN)?;
        let class_col = column(OUTCOME_COLUMN)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            let site = extract_str(site_col, row)
                .with_context(|| format!("Data row {row_no}: failed to read '{SITE_COLUMN}'"))?;
            let mass = extract_f64(mass_col, row)
                .with_context(|| format!("Data row {row_no}: failed to read '{PAYLOAD_COLUMN}'"))?;
            let booster = extract_str(booster_col, row)
                .with_context(|| format!("Data row {row_no}: failed to read '{BOOSTER_COLUMN}'"))?;
            let class = extract_i64(class_col, row)
                .with_context(|| format!("Data row {row_no}: failed to read '{OUTCOME_COLUMN}'"))?;

            records.push(build_record(row_no, site, mass, booster, class)?);
        }
    }

    finish(records)
}

// -- Parquet / Arrow helpers --

fn extract_str(col: &Arc<dyn Array>, row: usize) -> Result<&str> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row))
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row)),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as f64)
    } else {
        bail!("expected a numeric column, got {:?}", col.data_type())
    }
}

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as i64)
    } else {
        bail!("expected an integer column, got {:?}", col.data_type())
    }
}
