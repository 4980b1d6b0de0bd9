//! # duck-core: Residual Demand Tables
//!
//! Fundamental data structures shared by the duck-curve crates.
//!
//! ## Design Philosophy
//!
//! Generation-mix and load datasets are modeled as **time-indexed tables**:
//! - **Rows**: one timestamp each (a day in the CAISO release, an hour in
//!   finer-grained feeds)
//! - **Columns**: value buckets such as hour-of-day (`00:00` .. `23:00`) or
//!   load zones
//! - **Cells**: power in MW, `None` when missing
//!
//! Arithmetic between tables aligns on both axes, so subtracting solar
//! output from load works on partially overlapping datasets.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use duck_core::{Alignment, DateRange, MonthSet, TimeFrame};
//!
//! let day = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let cols = vec!["00:00".to_string(), "01:00".to_string()];
//! let load_row = vec![Some(21_000.0), Some(20_500.0)];
//! let load = TimeFrame::from_rows(vec![day], cols.clone(), vec![load_row]).unwrap();
//! let solar = TimeFrame::from_rows(vec![day], cols, vec![vec![Some(0.0), Some(12.0)]]).unwrap();
//!
//! let (duck, _report) = load.sub_aligned(&solar, Alignment::Outer).unwrap();
//! let range = DateRange::daily(
//!     NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2020, 7, 15).unwrap(),
//! ).unwrap();
//! let months: MonthSet = "3-7".parse().unwrap();
//! let duck = duck.filter_dates(&range).filter_months(&months);
//! assert_eq!(duck.get(0, 1), Some(20_488.0));
//! ```
//!
//! ## Modules
//!
//! - [`frame`] - [`TimeFrame`] and aligned subtraction
//! - [`calendar`] - [`DateRange`] and [`MonthSet`] row filters
//! - [`error`] - [`DuckError`] and [`DuckResult`]

pub mod calendar;
pub mod error;
pub mod frame;

pub use calendar::{DateRange, MonthSet};
pub use error::{DuckError, DuckResult};
pub use frame::{Alignment, AlignmentReport, TimeFrame};

/// Divisor applied to MW values for display (`x10^4 MW`).
pub const DISPLAY_SCALE_MW: f64 = 1e4;
