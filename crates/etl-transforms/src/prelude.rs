//! Prelude for etl-transforms.
//!
//! This module re-exports all commonly used types and traits.

pub use crate::min_max::{min_max_normalize, MinMaxState, MinMaxTransform};
pub use crate::zero_base::{
    zero_base_columns, zero_base_standardize, ZeroBaseState, ZeroBaseTransform,
};

// Re-export core WindowTransform trait
pub use etl_core::traits::WindowTransform;
