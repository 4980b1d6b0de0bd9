//! Per-column quantiles of a duck-curve table.
//!
//! For a daily table with hourly columns this gives, for every hour, the
//! distribution of residual demand over all selected days. Missing values
//! are skipped and levels between order statistics are linearly
//! interpolated.

use anyhow::{Context, Result};
use duck_core::{DuckError, DuckResult, TimeFrame};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const LEVEL_EPSILON: f64 = 1e-9;

/// Validated list of quantile levels in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct QuantileLevels(Vec<f64>);

impl QuantileLevels {
    pub fn new(levels: Vec<f64>) -> DuckResult<Self> {
        if levels.is_empty() {
            return Err(DuckError::Config("at least one quantile level is required".into()));
        }
        if let Some(bad) = levels.iter().find(|q| !(0.0..=1.0).contains(*q)) {
            return Err(DuckError::Config(format!(
                "quantile level {bad} outside [0, 1]"
            )));
        }
        for (i, a) in levels.iter().enumerate() {
            if levels[i + 1..].iter().any(|b| (a - b).abs() < LEVEL_EPSILON) {
                return Err(DuckError::Config(format!("duplicate quantile level {a}")));
            }
        }
        Ok(Self(levels))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn contains(&self, level: f64) -> bool {
        self.0.iter().any(|q| (q - level).abs() < LEVEL_EPSILON)
    }
}

impl Default for QuantileLevels {
    fn default() -> Self {
        Self(vec![0.1, 0.25, 0.5, 0.75, 0.9])
    }
}

impl TryFrom<Vec<f64>> for QuantileLevels {
    type Error = DuckError;

    fn try_from(levels: Vec<f64>) -> DuckResult<Self> {
        Self::new(levels)
    }
}

impl From<QuantileLevels> for Vec<f64> {
    fn from(levels: QuantileLevels) -> Self {
        levels.0
    }
}

/// Rows are quantile levels, columns the source table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileTable {
    levels: Vec<f64>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl QuantileTable {
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values at `level` across all columns.
    pub fn row(&self, level: f64) -> Option<&[Option<f64>]> {
        self.levels
            .iter()
            .position(|q| (q - level).abs() < LEVEL_EPSILON)
            .map(|i| self.values[i].as_slice())
    }

    pub fn get(&self, level: f64, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.row(level).and_then(|row| row[col])
    }

    /// Every value divided by `divisor`, e.g. MW to x10^4 MW.
    pub fn scaled(&self, divisor: f64) -> QuantileTable {
        QuantileTable {
            levels: self.levels.clone(),
            columns: self.columns.clone(),
            values: self
                .values
                .iter()
                .map(|row| row.iter().map(|v| v.map(|x| x / divisor)).collect())
                .collect(),
        }
    }
}

pub fn quantile_table(frame: &TimeFrame, levels: &QuantileLevels) -> Result<QuantileTable> {
    let mut values = vec![Vec::with_capacity(frame.width()); levels.as_slice().len()];
    for (c, name) in frame.columns().iter().enumerate() {
        let ca =
            Float64Chunked::from_iter_options(name.as_str(), frame.column_at(c).iter().copied());
        for (row, &level) in values.iter_mut().zip(levels.as_slice()) {
            let q = ca
                .quantile(level, QuantileInterpolOptions::Linear)
                .with_context(|| format!("computing quantile {level} of column '{name}'"))?;
            row.push(q);
        }
    }
    Ok(QuantileTable {
        levels: levels.as_slice().to_vec(),
        columns: frame.columns().to_vec(),
        values,
    })
}

/// Quantiles over the rows of one calendar year.
pub fn yearly_quantiles(
    frame: &TimeFrame,
    year: i32,
    levels: &QuantileLevels,
) -> Result<QuantileTable> {
    quantile_table(&frame.select_year(year), levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample() -> TimeFrame {
        // column "a" holds 1..=5 in 2020 and 100 in 2019
        let index = vec![
            day(2019, 3, 1),
            day(2020, 3, 1),
            day(2020, 3, 2),
            day(2020, 3, 3),
            day(2020, 3, 4),
            day(2020, 3, 5),
        ];
        let rows = vec![
            vec![Some(100.0), Some(0.0)],
            vec![Some(3.0), Some(5.0)],
            vec![Some(1.0), None],
            vec![Some(5.0), Some(7.0)],
            vec![Some(2.0), Some(-1.0)],
            vec![Some(4.0), None],
        ];
        TimeFrame::from_rows(index, vec!["a".into(), "b".into()], rows).unwrap()
    }

    #[test]
    fn default_levels() {
        assert_eq!(QuantileLevels::default().as_slice(), &[0.1, 0.25, 0.5, 0.75, 0.9]);
    }

    #[test]
    fn invalid_levels_are_rejected() {
        assert!(QuantileLevels::new(vec![]).is_err());
        assert!(QuantileLevels::new(vec![0.5, 1.5]).is_err());
        assert!(QuantileLevels::new(vec![0.5, 0.5]).is_err());
    }

    #[test]
    fn linear_interpolation() {
        let table = yearly_quantiles(&sample(), 2020, &QuantileLevels::default()).unwrap();
        // a = [1, 2, 3, 4, 5]
        assert_eq!(table.get(0.5, "a"), Some(3.0));
        assert!((table.get(0.1, "a").unwrap() - 1.4).abs() < 1e-12);
        assert!((table.get(0.25, "a").unwrap() - 2.0).abs() < 1e-12);
        assert!((table.get(0.9, "a").unwrap() - 4.6).abs() < 1e-12);
        // b skips missing values: [-1, 5, 7]
        assert_eq!(table.get(0.5, "b"), Some(5.0));
        assert!((table.get(0.25, "b").unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn quantiles_are_ordered_per_column() {
        let table = yearly_quantiles(&sample(), 2020, &QuantileLevels::default()).unwrap();
        for column in table.columns() {
            let values: Vec<f64> = table
                .levels()
                .iter()
                .map(|q| table.get(*q, column).unwrap())
                .collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]), "{column}: {values:?}");
        }
    }

    #[test]
    fn year_selection_excludes_other_years() {
        let levels = QuantileLevels::new(vec![1.0]).unwrap();
        let table = yearly_quantiles(&sample(), 2020, &levels).unwrap();
        assert_eq!(table.get(1.0, "a"), Some(5.0));
    }

    #[test]
    fn empty_selection_yields_missing_values() {
        let table = yearly_quantiles(&sample(), 2018, &QuantileLevels::default()).unwrap();
        assert_eq!(table.row(0.5).unwrap(), &[None, None]);
    }

    #[test]
    fn scaling_divides_every_value() {
        let table = yearly_quantiles(&sample(), 2019, &QuantileLevels::default())
            .unwrap()
            .scaled(1e4);
        assert_eq!(table.get(0.5, "a"), Some(0.01));
        assert_eq!(table.get(0.5, "b"), Some(0.0));
    }
}
