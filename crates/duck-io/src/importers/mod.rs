//! CSV table importers.
//!
//! Tables are read with polars' CSV reader and converted into
//! [`duck_core::TimeFrame`]s: one column is parsed as the timestamp index,
//! every other column is cast to `Float64` (unparseable cells become
//! missing values).
//!
//! ```no_run
//! use duck_io::importers::{load_solar_frame, ImportOptions};
//! use duck_io::sources::covid_emda;
//!
//! let solar = load_solar_frame(&covid_emda::genmix("caiso"), &ImportOptions::default())?;
//! println!("{} days x {} hours", solar.height(), solar.width());
//! # Ok::<(), anyhow::Error>(())
//! ```

mod timestamps;

use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use duck_core::TimeFrame;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sources::DataSource;

pub use timestamps::{format_timestamp, parse_timestamp};

/// Column names expected in the source tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    #[serde(default = "default_index_column")]
    pub index_column: String,
    #[serde(default = "default_fuel_column")]
    pub fuel_column: String,
    #[serde(default = "default_fuel")]
    pub fuel: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            index_column: default_index_column(),
            fuel_column: default_fuel_column(),
            fuel: default_fuel(),
        }
    }
}

fn default_index_column() -> String {
    "date".to_string()
}

fn default_fuel_column() -> String {
    "fuel".to_string()
}

fn default_fuel() -> String {
    "solar".to_string()
}

/// Parses CSV bytes (with a header row) into a polars frame. Column types
/// are inferred from every row, so whole-MW values followed by a decimal
/// later in the file still read as floats.
pub fn read_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(bytes))
        .has_header(true)
        .infer_schema(None)
        .finish()
        .context("reading CSV table")
}

/// Fetches `source` and parses it as CSV.
pub fn read_table(source: &DataSource) -> Result<DataFrame> {
    let bytes = source.fetch()?;
    let df = read_csv_bytes(bytes).with_context(|| format!("parsing {source}"))?;
    debug!(source = %source, rows = df.height(), cols = df.width(), "read table");
    Ok(df)
}

/// Rows whose `fuel_column` equals `fuel`, with the label column dropped.
pub fn select_fuel(df: &DataFrame, fuel_column: &str, fuel: &str) -> Result<DataFrame> {
    let labels = df
        .column(fuel_column)
        .with_context(|| format!("missing fuel column '{fuel_column}'"))?
        .cast(&DataType::Utf8)
        .context("casting fuel column to Utf8")?;
    let mask: BooleanChunked = labels
        .utf8()?
        .into_iter()
        .map(|label| label == Some(fuel))
        .collect();
    let selected = df.filter(&mask).context("filtering fuel rows")?;
    selected
        .drop(fuel_column)
        .context("dropping fuel column")
}

/// Converts a polars frame into a [`TimeFrame`] indexed by `index_column`.
pub fn frame_from_polars(df: &DataFrame, index_column: &str) -> Result<TimeFrame> {
    let index_series = df
        .column(index_column)
        .with_context(|| format!("missing index column '{index_column}'"))?
        .cast(&DataType::Utf8)
        .context("casting index column to Utf8")?;
    let index = index_series
        .utf8()?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            let raw = cell.ok_or_else(|| anyhow!("row {row}: empty '{index_column}' cell"))?;
            parse_timestamp(raw).with_context(|| format!("row {row}: parsing '{index_column}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut columns = Vec::with_capacity(df.width().saturating_sub(1));
    let mut data = Vec::with_capacity(df.width().saturating_sub(1));
    for series in df.get_columns() {
        if series.name() == index_column {
            continue;
        }
        let values = series
            .cast(&DataType::Float64)
            .with_context(|| format!("casting column '{}' to Float64", series.name()))?;
        data.push(values.f64()?.into_iter().collect::<Vec<Option<f64>>>());
        columns.push(series.name().to_string());
    }

    Ok(TimeFrame::new(index, columns, data)?)
}

/// Loads a numeric table (e.g. load by hour) from `source`.
pub fn load_frame(source: &DataSource, options: &ImportOptions) -> Result<TimeFrame> {
    let df = read_table(source)?;
    frame_from_polars(&df, &options.index_column)
        .with_context(|| format!("converting {source} to a time frame"))
}

/// Loads a generation-mix table and keeps the rows for `options.fuel`.
pub fn load_solar_frame(source: &DataSource, options: &ImportOptions) -> Result<TimeFrame> {
    let df = read_table(source)?;
    let solar = select_fuel(&df, &options.fuel_column, &options.fuel)?;
    debug!(fuel = %options.fuel, rows = solar.height(), "selected fuel rows");
    frame_from_polars(&solar, &options.index_column)
        .with_context(|| format!("converting {} rows of {source} to a time frame", options.fuel))
}
