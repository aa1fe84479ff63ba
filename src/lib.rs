//! # bar-etl
//!
//! Turns price/volume bar files into windowed training datasets.
//!
//! A bar table is cut into overlapping input windows, each paired with the
//! mean of a target column over the rows that follow it. Windows with missing
//! cells are dropped, the rest are optionally rescaled against their first
//! row, grouped into batches and appended to an on-disk dataset that can be
//! replayed batch by batch without loading it whole.
//!
//! The workspace crates each cover one stage:
//!
//! - `etl-core` - tables, batches, errors and CSV loading
//! - `etl-transforms` - per-window normalization
//! - `etl-windows` - the window generator
//! - `etl-store` - the dataset writer and reader
//!
//! [`Etl`] ties them together behind one [`EtlConfig`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod config;
mod pipeline;

pub use config::EtlConfig;
pub use pipeline::{BuildReport, Etl};

pub use etl_core::{Batch, DataFrame, DegenerateBase, EtlError, EtlFloat, Result, Series};
pub use etl_store::{BatchCursor, DatasetReader, DatasetWriter, NpyElement, WriteSummary};
pub use etl_transforms::{min_max_normalize, zero_base_standardize};
pub use etl_windows::{GeneratorStats, WindowGenerator, WindowSpec};
