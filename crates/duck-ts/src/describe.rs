//! Descriptive statistics of a single numeric series.

use std::fmt;

use anyhow::Result;
use polars::prelude::*;

/// count, mean, sample std, min, quartiles and max; missing values skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    pub fn from_values(name: &str, values: &[Option<f64>]) -> Result<Self> {
        let ca = Float64Chunked::from_iter_options(name, values.iter().copied());
        let count = ca.len() - ca.null_count();
        let quartile = |q: f64| ca.quantile(q, QuantileInterpolOptions::Linear);
        Ok(Self {
            count,
            mean: ca.mean(),
            std: if count > 1 { ca.std(1) } else { None },
            min: ca.min(),
            q25: quartile(0.25)?,
            q50: quartile(0.5)?,
            q75: quartile(0.75)?,
            max: ca.max(),
        })
    }

    fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

impl fmt::Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<(&str, String)> = self
            .rows()
            .into_iter()
            .map(|(label, value)| {
                let text = match value {
                    Some(v) if !v.is_nan() => format!("{v:.6}"),
                    _ => "NaN".to_string(),
                };
                (label, text)
            })
            .collect();
        let width = cells.iter().map(|(_, t)| t.len()).max().unwrap_or(0) + 4;
        for (label, text) in &cells {
            writeln!(f, "{label:<5}{text:>width$}")?;
        }
        write!(f, "dtype: float64")
    }
}
