//! Residual demand (load minus solar) tables.

use anyhow::{Context, Result};
use duck_core::{Alignment, DateRange, DuckResult, MonthSet, TimeFrame};
use duck_io::importers::{load_frame, load_solar_frame, ImportOptions};
use duck_io::DataSource;
use tracing::{info, warn};

/// Everything needed to build a duck-curve table from two sources.
#[derive(Debug, Clone)]
pub struct DuckCurveRequest {
    pub genmix: DataSource,
    pub load: DataSource,
    pub dates: DateRange,
    pub months: MonthSet,
    pub alignment: Alignment,
    pub import: ImportOptions,
}

/// Loads both tables, subtracts solar from load and applies the date and
/// month filters.
pub fn create_duck_curve(request: &DuckCurveRequest) -> Result<TimeFrame> {
    let solar = load_solar_frame(&request.genmix, &request.import)
        .with_context(|| format!("loading generation mix from {}", request.genmix))?;
    let load = load_frame(&request.load, &request.import)
        .with_context(|| format!("loading load from {}", request.load))?;
    let duck = duck_curve_from_frames(
        &load,
        &solar,
        &request.dates,
        &request.months,
        request.alignment,
    )?;
    Ok(duck)
}

/// Pure part of [`create_duck_curve`]; neither input is modified.
pub fn duck_curve_from_frames(
    load: &TimeFrame,
    solar: &TimeFrame,
    dates: &DateRange,
    months: &MonthSet,
    alignment: Alignment,
) -> DuckResult<TimeFrame> {
    let (residual, report) = load.sub_aligned(solar, alignment)?;
    if !report.left_only_columns.is_empty() || !report.right_only_columns.is_empty() {
        warn!(
            load_only = ?report.left_only_columns,
            solar_only = ?report.right_only_columns,
            "load and solar columns differ; unmatched cells are missing"
        );
    }
    if report.left_only_rows > 0 || report.right_only_rows > 0 {
        warn!(
            load_only = report.left_only_rows,
            solar_only = report.right_only_rows,
            "load and solar timestamps differ"
        );
    }

    let duck = residual.filter_dates(dates).filter_months(months);
    info!(
        rows = duck.height(),
        cols = duck.width(),
        dates = %dates,
        months = %months,
        "built duck curve"
    );
    Ok(duck)
}
