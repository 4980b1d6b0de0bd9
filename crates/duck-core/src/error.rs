//! Unified error types for the duck-curve toolkit
//!
//! [`DuckError`] is the common error type at crate boundaries. I/O layers
//! work with `anyhow` internally and raise a typed `DuckError` where the
//! failure is part of the public contract (for example alignment failures).
//!
//! # Example
//!
//! ```ignore
//! use duck_core::{DuckError, DuckResult};
//!
//! fn residual(load: &TimeFrame, solar: &TimeFrame) -> DuckResult<TimeFrame> {
//!     load.sub_aligned(solar, Alignment::Strict)
//! }
//! ```

use thiserror::Error;

/// Unified error type for all duck-curve operations.
#[derive(Error, Debug)]
pub enum DuckError {
    /// I/O errors (file access, sockets, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote source could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Parsing errors (timestamps, CSV cells, month lists)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Two tables could not be aligned under a strict policy
    #[error("Alignment error: {0}")]
    Alignment(String),

    /// Malformed table shape (column lengths, duplicate labels)
    #[error("Shape error: {0}")]
    Shape(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using DuckError.
pub type DuckResult<T> = Result<T, DuckError>;
