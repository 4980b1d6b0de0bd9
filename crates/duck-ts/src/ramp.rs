//! Hour-to-hour ramping of residual demand.
//!
//! Each row's first difference runs along the column axis; the first
//! column has no predecessor. Ramp-up is the largest difference in a row,
//! ramp-down the smallest (most negative).

use std::fmt;

use anyhow::Result;
use chrono::NaiveDateTime;
use duck_core::TimeFrame;

use crate::describe::Describe;

/// First difference of one row; `None` where either operand is missing.
pub fn row_diff(row: &[Option<f64>]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(row.windows(2).map(|w| match (w[0], w[1]) {
            (Some(prev), Some(cur)) => Some(cur - prev),
            _ => None,
        }))
        .take(row.len())
        .collect()
}

/// `(max, min)` of the defined differences in a row.
pub fn row_ramps(row: &[Option<f64>]) -> (Option<f64>, Option<f64>) {
    row_diff(row)
        .into_iter()
        .flatten()
        .fold((None, None), |(up, down), d| {
            (
                Some(up.map_or(d, |u: f64| u.max(d))),
                Some(down.map_or(d, |l: f64| l.min(d))),
            )
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RampSeries {
    pub index: Vec<NaiveDateTime>,
    pub ramp_up: Vec<Option<f64>>,
    pub ramp_down: Vec<Option<f64>>,
}

pub fn ramp_series(frame: &TimeFrame) -> RampSeries {
    let (ramp_up, ramp_down) = (0..frame.height())
        .map(|i| row_ramps(&frame.row(i)))
        .unzip();
    RampSeries {
        index: frame.index().to_vec(),
        ramp_up,
        ramp_down,
    }
}

/// Summary of one year's daily ramps.
#[derive(Debug, Clone, PartialEq)]
pub struct RampReport {
    pub year: i32,
    pub ramp_up: Describe,
    pub ramp_down: Describe,
}

pub fn ramp_report(frame: &TimeFrame, year: i32) -> Result<RampReport> {
    let series = ramp_series(&frame.select_year(year));
    Ok(RampReport {
        year,
        ramp_up: Describe::from_values("ramp_up", &series.ramp_up)?,
        ramp_down: Describe::from_values("ramp_down", &series.ramp_down)?,
    })
}

impl fmt::Display for RampReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Ramp-Up for year {}:", self.year)?;
        writeln!(f, "{}", self.ramp_up)?;
        writeln!(f)?;
        writeln!(f, "Ramp-Down for year {}:", self.year)?;
        write!(f, "{}", self.ramp_down)
    }
}
