//! Batches of input windows and their scalar targets.

use ndarray::{Array1, Array2, Array3, ArrayView2, Axis};

use crate::error::{EtlError, Result};
use crate::num::EtlFloat;

/// A group of windows materialized together.
///
/// `x` is laid out as `(window, row_in_window, column)` and `y` holds one
/// target per window, so `x.len_of(Axis(0)) == y.len()` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<T: EtlFloat> {
    /// Input windows.
    pub x: Array3<T>,
    /// One target per window.
    pub y: Array1<T>,
}

impl<T: EtlFloat> Batch<T> {
    /// Build a batch from pre-shaped tensors.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` disagree on the window count.
    pub fn new(x: Array3<T>, y: Array1<T>) -> Result<Self> {
        if x.len_of(Axis(0)) != y.len() {
            return Err(EtlError::LengthMismatch {
                expected: x.len_of(Axis(0)),
                actual: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// An empty batch with the given per-window shape.
    #[must_use]
    pub fn empty(window_rows: usize, columns: usize) -> Self {
        Self {
            x: Array3::from_elem((0, window_rows, columns), T::ZERO),
            y: Array1::from_elem(0, T::ZERO),
        }
    }

    /// Stack equally shaped windows into a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if `windows` and `targets` differ in length or the
    /// windows differ in shape.
    pub fn from_windows(windows: &[Array2<T>], targets: Vec<T>) -> Result<Self> {
        if windows.len() != targets.len() {
            return Err(EtlError::LengthMismatch {
                expected: windows.len(),
                actual: targets.len(),
            });
        }
        let Some(first) = windows.first() else {
            return Ok(Self::empty(0, 0));
        };
        let views: Vec<ArrayView2<'_, T>> = windows.iter().map(Array2::view).collect();
        let x = ndarray::stack(Axis(0), &views).map_err(|_| EtlError::ShapeMismatch {
            expected: first.shape().to_vec(),
            actual: windows
                .iter()
                .map(Array2::shape)
                .find(|s| *s != first.shape())
                .map_or_else(Vec::new, <[usize]>::to_vec),
        })?;
        Ok(Self {
            x,
            y: Array1::from_vec(targets),
        })
    }

    /// Number of windows in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns `true` if the batch holds no windows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Shape of one window: `(rows, columns)`.
    #[must_use]
    pub fn window_shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.x.dim();
        (rows, cols)
    }
}
