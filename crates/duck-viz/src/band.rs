//! Quantile-band chart model, independent of any drawing backend.

use duck_core::{TimeFrame, DISPLAY_SCALE_MW};
use duck_ts::{quantile_table, QuantileLevels, QuantileTable};

use crate::PlotError;

pub const MEDIAN: f64 = 0.5;
pub const OUTER_BAND: (f64, f64) = (0.1, 0.9);
pub const INNER_BAND: (f64, f64) = (0.25, 0.75);

/// Median line plus two shaded quantile bands over the table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BandChart {
    pub year: i32,
    pub labels: Vec<String>,
    pub median: Vec<Option<f64>>,
    pub outer: (Vec<Option<f64>>, Vec<Option<f64>>),
    pub inner: (Vec<Option<f64>>, Vec<Option<f64>>),
    pub ylim: Option<(f64, f64)>,
    pub tick_positions: Vec<usize>,
}

impl BandChart {
    /// Builds the chart from already scaled quantiles.
    pub fn from_quantiles(
        year: i32,
        table: &QuantileTable,
        ylim: Option<(f64, f64)>,
        tick_positions: &[usize],
    ) -> Result<Self, PlotError> {
        let level = |q: f64| {
            table
                .row(q)
                .map(<[Option<f64>]>::to_vec)
                .ok_or(PlotError::MissingLevel(q))
        };
        if let Some((lo, hi)) = ylim {
            if !(lo < hi) {
                return Err(PlotError::InvalidData(format!(
                    "y-limits must be increasing, got [{lo}, {hi}]"
                )));
            }
        }
        let labels = table.columns().to_vec();
        Ok(Self {
            year,
            median: level(MEDIAN)?,
            outer: (level(OUTER_BAND.0)?, level(OUTER_BAND.1)?),
            inner: (level(INNER_BAND.0)?, level(INNER_BAND.1)?),
            ylim,
            tick_positions: tick_positions
                .iter()
                .copied()
                .filter(|&i| i < labels.len())
                .collect(),
            labels,
        })
    }

    /// Selects `year`, computes quantiles and scales MW to x10^4 MW.
    pub fn for_year(
        frame: &TimeFrame,
        year: i32,
        levels: &QuantileLevels,
        ylim: Option<(f64, f64)>,
        tick_positions: &[usize],
    ) -> Result<Self, PlotError> {
        let selected = frame.select_year(year);
        if selected.is_empty() {
            return Err(PlotError::InvalidData(format!("no rows for year {year}")));
        }
        let table = quantile_table(&selected, levels)
            .map_err(|e| PlotError::InvalidData(format!("{e:#}")))?
            .scaled(DISPLAY_SCALE_MW);
        Self::from_quantiles(year, &table, ylim, tick_positions)
    }

    /// Explicit limits, otherwise the outer band padded by 5%.
    pub fn y_range(&self) -> Result<(f64, f64), PlotError> {
        if let Some(limits) = self.ylim {
            return Ok(limits);
        }
        let values = self
            .outer
            .0
            .iter()
            .chain(&self.outer.1)
            .chain(&self.median)
            .flatten()
            .copied();
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() || !hi.is_finite() {
            return Err(PlotError::InvalidData(format!(
                "year {} has no values to plot",
                self.year
            )));
        }
        let pad = ((hi - lo) * 0.05).max(1e-6);
        Ok((lo - pad, hi + pad))
    }

    pub fn x_max(&self) -> f64 {
        self.labels.len().saturating_sub(1).max(1) as f64
    }

    pub fn median_points(&self) -> Vec<(f64, f64)> {
        self.median
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
            .collect()
    }

    /// Closed outline of a band: lower edge left to right, upper edge back.
    /// Columns where either edge is missing are skipped.
    pub fn band_polygon(band: &(Vec<Option<f64>>, Vec<Option<f64>>)) -> Vec<(f64, f64)> {
        let pairs: Vec<(f64, f64, f64)> = band
            .0
            .iter()
            .zip(&band.1)
            .enumerate()
            .filter_map(|(i, (lo, hi))| Some((i as f64, (*lo)?, (*hi)?)))
            .collect();
        pairs
            .iter()
            .map(|&(x, lo, _)| (x, lo))
            .chain(pairs.iter().rev().map(|&(x, _, hi)| (x, hi)))
            .collect()
    }

    /// Column label at `x` when `x` is one of the tick positions.
    pub fn tick_label(&self, x: f64) -> String {
        let i = x.round();
        if i < 0.0 || (x - i).abs() > 1e-6 || !self.tick_positions.contains(&(i as usize)) {
            return String::new();
        }
        self.labels.get(i as usize).cloned().unwrap_or_default()
    }
}
