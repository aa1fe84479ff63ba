//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use etl_core::prelude::*;
//!
//! let series: Series<f64> = Series::new();
//! let df: DataFrame<f64> = DataFrame::new();
//! assert!(series.is_empty() && df.is_empty());
//! ```

// Core types
pub use crate::batch::Batch;
pub use crate::dataframe::DataFrame;
pub use crate::num::EtlFloat;
pub use crate::series::Series;
pub use crate::source::CsvSource;

// Error types
pub use crate::error::{EtlError, Result};

// Traits
pub use crate::traits::{DegenerateBase, WindowTransform};
