//! Duck-curve charts.
//!
//! A [`BandChart`] is computed from a year of residual demand and drawn
//! to SVG or PNG with a shared [`ChartStyle`].

use std::path::Path;

use duck_core::TimeFrame;
use duck_ts::QuantileLevels;
use thiserror::Error;

pub mod band;
pub mod render;
pub mod style;

pub use band::BandChart;
pub use render::{render_chart, ImageFormat};
pub use style::ChartStyle;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("invalid chart style: {0}")]
    Style(String),
    #[error("quantile level {0} missing from table")]
    MissingLevel(f64),
    #[error("invalid chart data: {0}")]
    InvalidData(String),
    #[error("unsupported image format '{0}'; use .svg or .png")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Plots one year's median and quantile bands to `path`.
pub fn plot_duck_curve(
    frame: &TimeFrame,
    year: i32,
    ylim: Option<(f64, f64)>,
    levels: &QuantileLevels,
    style: &ChartStyle,
    path: &Path,
) -> Result<(), PlotError> {
    let chart = BandChart::for_year(frame, year, levels, ylim, &style.x_tick_positions)?;
    render_chart(&chart, style, path)
}
