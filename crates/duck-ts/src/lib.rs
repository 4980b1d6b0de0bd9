//! Duck-curve time-series analysis.
//!
//! - [`builder`] - load minus solar, filtered by date range and month
//! - [`quantile`] - per-column quantile bands for one year
//! - [`ramp`] - daily ramp-up / ramp-down statistics
//! - [`describe`] - count/mean/std/quartile summaries

pub mod builder;
pub mod describe;
pub mod quantile;
pub mod ramp;

pub use builder::{create_duck_curve, duck_curve_from_frames, DuckCurveRequest};
pub use describe::Describe;
pub use quantile::{quantile_table, yearly_quantiles, QuantileLevels, QuantileTable};
pub use ramp::{ramp_report, ramp_series, RampReport, RampSeries};
