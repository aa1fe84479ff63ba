//! # etl-windows
//!
//! Turns a bar table into batches of `(input window, target)` pairs.
//!
//! - [`WindowSpec`]: window sizes, target column, column filter, batching
//! - [`WindowGenerator`]: the lazy, single-pass batch iterator
//! - [`GeneratorStats`]: counters for accepted and dropped windows
//!
//! # Example
//!
//! ```rust
//! use etl_core::{DataFrame, Series};
//! use etl_windows::prelude::*;
//!
//! let close: Series<f64> = (1..=10).map(|v| v as f64).collect();
//! let df = DataFrame::from_columns(vec![("close".to_string(), close)]).unwrap();
//!
//! let mut generator = WindowGenerator::new(&df, WindowSpec::new(3, 1, "close").with_batch_size(4)).unwrap();
//! while let Some(batch) = generator.next_batch() {
//!     let batch = batch.unwrap();
//!     assert_eq!(batch.x.dim(), (4, 3, 1));
//! }
//! // 7 windows: one full batch, three discarded
//! assert_eq!(generator.stats().batches_emitted, 1);
//! assert_eq!(generator.stats().trailing_discarded, 3);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod config;
mod generator;

pub mod prelude;

pub use config::WindowSpec;
pub use generator::{GeneratorStats, WindowGenerator};
