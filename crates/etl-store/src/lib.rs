//! # etl-store
//!
//! Growable on-disk datasets of windowed batches.
//!
//! - [`DatasetWriter`] - Appends [`Batch`](etl_core::Batch)es to an `x`/`y` dataset
//! - [`DatasetReader`] - Replays a finished dataset in fixed-size batches
//! - [`container`] - The directory of `.npy` arrays both are built on
//!
//! ## Example
//!
//! ```rust
//! use etl_core::Batch;
//! use etl_store::prelude::*;
//! use ndarray::{Array1, Array3};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("bars.etl");
//!
//! let x = Array3::from_shape_fn((4, 2, 1), |(w, r, _)| (w + r) as f64);
//! let y = Array1::from_shape_fn(4, |w| w as f64);
//! DatasetWriter::create(&path).unwrap().write_all(vec![Batch::new(x, y)]).unwrap();
//!
//! let reader = DatasetReader::<f64>::open(&path, 3).unwrap();
//! let mut batches = reader.batches(0);
//! assert_eq!(batches.next().unwrap().unwrap().len(), 3);
//! assert_eq!(batches.next().unwrap().unwrap().len(), 1);
//! assert_eq!(batches.next().unwrap().unwrap().len(), 0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod container;
mod reader;
mod writer;

pub mod prelude;

pub use container::NpyElement;
pub use reader::{BatchCursor, DatasetReader};
pub use writer::{DatasetWriter, WriteSummary, X_ARRAY, Y_ARRAY};
