//! # etl-transforms
//!
//! Per-window normalization for the bar-etl pipeline.
//!
//! Both normalizers are available as plain functions with optional,
//! caller-supplied parameters, and as fit/transform objects implementing
//! [`WindowTransform`](etl_core::traits::WindowTransform):
//!
//! - [`zero_base_standardize`] / [`ZeroBaseTransform`]: `x / base - 1`, where the
//!   base defaults to the window's first row
//! - [`min_max_normalize`] / [`MinMaxTransform`]: column-wise `(x - min) / (max - min)`
//!
//! # Example
//!
//! ```rust
//! use etl_transforms::prelude::*;
//! use ndarray::array;
//!
//! let input = array![[1.0], [2.0], [3.0]];
//! let target = array![[4.0]];
//!
//! let (base, x) = zero_base_standardize(input.view(), None).unwrap();
//! let (_, y) = zero_base_standardize(target.view(), Some(base.view())).unwrap();
//!
//! assert_eq!(x, array![[0.0], [1.0], [2.0]]);
//! assert_eq!(y, array![[3.0]]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod min_max;
mod zero_base;

pub mod prelude;

pub use min_max::{min_max_normalize, MinMaxState, MinMaxTransform};
pub use zero_base::{zero_base_columns, zero_base_standardize, ZeroBaseState, ZeroBaseTransform};
