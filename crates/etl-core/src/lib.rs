//! # etl-core
//!
//! Core types shared by the bar-etl crates.
//!
//! This crate provides the foundational abstractions used throughout the workspace:
//!
//! - [`EtlFloat`] - Trait for numeric element types (f32/f64)
//! - [`Series`] - Single column of values
//! - [`DataFrame`] - Multi-column table with deterministic column ordering
//! - [`Batch`] - A group of input windows and their scalar targets
//! - [`EtlError`] - The error type shared by every crate in the workspace
//! - [`source`] - CSV loading into a [`DataFrame`]
//! - [`WindowTransform`] - Fit/transform/inverse contract for per-window normalizers
//!
//! ## Example
//!
//! ```rust
//! use etl_core::prelude::*;
//!
//! let mut df: DataFrame<f64> = DataFrame::new();
//! df.add_column("close".to_string(), Series::from_vec(vec![100.0, 101.5, 99.8])).unwrap();
//!
//! let rows = df.to_row_matrix();
//! assert_eq!(rows.dim(), (3, 1));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod batch;
pub mod dataframe;
pub mod error;
pub mod num;
pub mod prelude;
pub mod series;
pub mod source;
pub mod traits;

// Re-export core types at crate root
pub use batch::Batch;
pub use dataframe::DataFrame;
pub use error::{EtlError, Result};
pub use num::EtlFloat;
pub use series::Series;
pub use source::CsvSource;
pub use traits::{DegenerateBase, WindowTransform};
