//! # duck-io: Generation-Mix & Load Table I/O
//!
//! Fetches CSV tables from URLs or local paths, parses them with polars and
//! hands them to the analysis crates as [`duck_core::TimeFrame`]s.
//!
//! ## Quick Start: Load CAISO Solar and Load
//!
//! ```rust,no_run
//! use duck_io::importers::{load_frame, load_solar_frame, ImportOptions};
//! use duck_io::sources::covid_emda;
//!
//! fn main() -> anyhow::Result<()> {
//!     let options = ImportOptions::default();
//!     let solar = load_solar_frame(&covid_emda::genmix("caiso"), &options)?;
//!     let load = load_frame(&covid_emda::load("caiso"), &options)?;
//!     println!("solar rows: {}, load rows: {}", solar.height(), load.height());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! ### Sources ([`sources`])
//! - [`sources::DataSource`] - URL or filesystem path, fetched into memory
//! - [`sources::covid_emda`] - COVID-EMDA data release locations
//!
//! ### Importers ([`importers`])
//! - [`importers::read_table`] - CSV to polars `DataFrame`
//! - [`importers::select_fuel`] - keep one fuel's rows from a generation mix
//! - [`importers::frame_from_polars`] - `DataFrame` to `TimeFrame`
//!
//! ### Exporters ([`exporters`])
//! - [`exporters::write_frame_csv`] - `TimeFrame` to CSV
//!
//! ## Feature Flags
//!
//! - `native-io` (default): HTTP fetching through `ureq`. Without it only
//!   local paths can be read.

pub mod exporters;
pub mod importers;
pub mod sources;

pub use exporters::write_frame_csv;
pub use sources::DataSource;
