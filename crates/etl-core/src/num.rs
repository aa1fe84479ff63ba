//! Element types for bar tables and stored windows.

use num_traits::{Float, FromPrimitive};
use serde::{de::DeserializeOwned, Serialize};

/// A float that can hold bar values and be written to a dataset.
///
/// Implemented for `f32` and `f64`. `DTYPE` is the tag a dataset records for
/// its arrays, so a reader can refuse a file written with the other width.
///
/// ```rust
/// use etl_core::EtlFloat;
///
/// fn relative<T: EtlFloat>(value: T, base: T) -> T {
///     value / base - T::ONE
/// }
///
/// assert_eq!(relative(3.0f64, 1.0), 2.0);
/// assert_eq!(<f32 as EtlFloat>::DTYPE, "f32");
/// ```
pub trait EtlFloat:
    Float
    + FromPrimitive
    + Default
    + Send
    + Sync
    + core::fmt::Debug
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Marks a missing cell.
    const NAN: Self;
    /// `0`
    const ZERO: Self;
    /// `1`
    const ONE: Self;
    /// Tag stored with persisted arrays.
    const DTYPE: &'static str;

    /// Narrow (or pass through) a parsed `f64`.
    #[must_use]
    fn from_f64_lossy(value: f64) -> Self;
}

impl EtlFloat for f32 {
    const NAN: Self = f32::NAN;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const DTYPE: &'static str = "f32";

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }
}

impl EtlFloat for f64 {
    const NAN: Self = f64::NAN;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const DTYPE: &'static str = "f64";

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
}
