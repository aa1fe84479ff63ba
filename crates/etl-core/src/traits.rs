//! Core trait definitions for per-window transforms.

use ndarray::{Array2, ArrayView2};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::Result;
use crate::num::EtlFloat;

/// How to handle a zero cell in a zero-base normalization base row.
///
/// Dividing by a zero base produces an infinite or NaN cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateBase {
    /// Let the non-finite values flow into the output tensors.
    /// This is the default behavior.
    #[default]
    Propagate,
    /// Drop the window, the same way windows with missing cells are dropped.
    Skip,
    /// Stop with [`EtlError::DegenerateBase`](crate::EtlError::DegenerateBase).
    Error,
}

/// Transform state trait bounds.
pub trait TransformState: Clone + Default + Serialize + DeserializeOwned + Send + Sync {}

impl<T> TransformState for T where T: Clone + Default + Serialize + DeserializeOwned + Send + Sync {}

/// Core trait for per-window transformations.
///
/// Windows are `(rows, columns)` matrices. A transform learns its parameters
/// from one window with `fit` and can then be applied to related windows
/// (for example the target window that follows an input window) so that both
/// end up on the same scale.
///
/// # Example
///
/// ```rust,ignore
/// use etl_core::traits::WindowTransform;
///
/// let mut zb = ZeroBaseTransform::<f64>::new();
/// let x = zb.fit_transform(input.view())?;
/// // Same base for the target rows
/// let y = zb.transform(target.view())?;
/// let original = zb.inverse_transform(x.view())?;
/// ```
pub trait WindowTransform<T: EtlFloat>: Send + Sync {
    /// Serializable state type.
    type State: TransformState;

    /// Learn parameters from the window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is empty.
    fn fit(&mut self, window: ArrayView2<'_, T>) -> Result<()>;

    /// Apply the transformation to a window.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform hasn't been fitted or the column
    /// count doesn't match the fitted parameters.
    fn transform(&self, window: ArrayView2<'_, T>) -> Result<Array2<T>>;

    /// Fit the transform and apply it in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting or transformation fails.
    fn fit_transform(&mut self, window: ArrayView2<'_, T>) -> Result<Array2<T>> {
        self.fit(window)?;
        self.transform(window)
    }

    /// Apply the inverse transformation to recover the original window.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform hasn't been fitted or the shape is wrong.
    fn inverse_transform(&self, window: ArrayView2<'_, T>) -> Result<Array2<T>>;

    /// Export the current state for serialization.
    fn get_state(&self) -> Self::State;

    /// Restore state from a previously exported state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state is invalid.
    fn set_state(&mut self, state: Self::State) -> Result<()>;

    /// Check if the transform has been fitted.
    fn is_fitted(&self) -> bool;

    /// Reset the transform to unfitted state.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_base_default() {
        assert_eq!(DegenerateBase::default(), DegenerateBase::Propagate);
    }

    #[test]
    fn test_degenerate_base_serde() {
        let json = serde_json::to_string(&DegenerateBase::Skip).unwrap();
        assert_eq!(json, "\"skip\"");
        let mode: DegenerateBase = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(mode, DegenerateBase::Error);
    }
}
