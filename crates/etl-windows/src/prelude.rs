//! Prelude for etl-windows.

pub use crate::config::WindowSpec;
pub use crate::generator::{GeneratorStats, WindowGenerator};

pub use etl_core::traits::DegenerateBase;
