//! Zero-base standardization.
//!
//! Rescales a window to relative changes from a reference row:
//! `x' = x / base - 1`. With the default base (the window's first row) the
//! first row becomes all zeros and every other cell reads as the fractional
//! return since that row.

use etl_core::{
    error::{EtlError, Result},
    num::EtlFloat,
    traits::WindowTransform,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Standardize `window` against `base`, returning the base used and the result.
///
/// When `base` is `None` the first row of `window` is used. The returned base
/// can be passed back in to put a related window (such as the target rows
/// that follow an input window) on the same scale.
///
/// A zero cell in the base yields an infinite or NaN column; use
/// [`zero_base_columns`] to detect it beforehand.
///
/// # Errors
///
/// Returns an error if `base` is `None` and the window has no rows, or if the
/// base length differs from the window's column count.
///
/// # Example
///
/// ```rust
/// use etl_transforms::zero_base_standardize;
/// use ndarray::array;
///
/// let window = array![[1.0, 10.0], [2.0, 15.0], [3.0, 5.0]];
/// let (base, normalized) = zero_base_standardize(window.view(), None).unwrap();
///
/// assert_eq!(base.to_vec(), vec![1.0, 10.0]);
/// assert_eq!(normalized, array![[0.0, 0.0], [1.0, 0.5], [2.0, -0.5]]);
/// ```
pub fn zero_base_standardize<T: EtlFloat>(
    window: ArrayView2<'_, T>,
    base: Option<ArrayView1<'_, T>>,
) -> Result<(Array1<T>, Array2<T>)> {
    let base = match base {
        Some(base) => base.to_owned(),
        None => first_row(window)?,
    };
    check_width(&base, window)?;

    let mut normalized = window.to_owned();
    for mut row in normalized.rows_mut() {
        row.zip_mut_with(&base, |v, &b| *v = *v / b - T::ONE);
    }
    Ok((base, normalized))
}

/// Indices of the base cells that are exactly zero.
#[must_use]
pub fn zero_base_columns<T: EtlFloat>(base: ArrayView1<'_, T>) -> Vec<usize> {
    base.iter()
        .enumerate()
        .filter(|&(_, &b)| b == T::ZERO)
        .map(|(i, _)| i)
        .collect()
}

fn first_row<T: EtlFloat>(window: ArrayView2<'_, T>) -> Result<Array1<T>> {
    if window.nrows() == 0 {
        return Err(EtlError::InvalidParameter {
            name: "window",
            value: "0 rows".to_string(),
            expected: "at least one row to take the base from",
        });
    }
    Ok(window.row(0).to_owned())
}

fn check_width<T: EtlFloat>(base: &Array1<T>, window: ArrayView2<'_, T>) -> Result<()> {
    if base.len() != window.ncols() {
        return Err(EtlError::ShapeMismatch {
            expected: vec![window.ncols()],
            actual: vec![base.len()],
        });
    }
    Ok(())
}

/// State for ZeroBaseTransform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(bound = "T: EtlFloat")]
pub struct ZeroBaseState<T: EtlFloat> {
    /// Version tag for state compatibility.
    pub version: u32,
    /// Base row, one value per column.
    pub base: Vec<T>,
    /// Whether the transform is fitted.
    pub fitted: bool,
}

/// Zero-base standardization as a fit/transform object.
///
/// `fit` takes the base from the window's first row; `transform` applies the
/// stored base to any window with the same column count.
#[derive(Debug, Clone, Default)]
pub struct ZeroBaseTransform<T: EtlFloat> {
    state: ZeroBaseState<T>,
}

impl<T: EtlFloat> ZeroBaseTransform<T> {
    /// Create an unfitted transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ZeroBaseState::default(),
        }
    }

    /// Create a transform fitted to an explicit base row.
    #[must_use]
    pub fn with_base(base: Vec<T>) -> Self {
        Self {
            state: ZeroBaseState {
                version: 1,
                base,
                fitted: true,
            },
        }
    }

    /// The fitted base row, if any.
    #[must_use]
    pub fn base(&self) -> Option<&[T]> {
        self.state.fitted.then_some(self.state.base.as_slice())
    }

    fn fitted_base(&self) -> Result<ArrayView1<'_, T>> {
        self.base()
            .map(ArrayView1::from)
            .ok_or_else(|| EtlError::InvalidParameter {
                name: "transform",
                value: "unfitted".to_string(),
                expected: "fit() before transform()",
            })
    }
}

impl<T: EtlFloat> WindowTransform<T> for ZeroBaseTransform<T> {
    type State = ZeroBaseState<T>;

    fn fit(&mut self, window: ArrayView2<'_, T>) -> Result<()> {
        let base = first_row(window)?;
        self.state = ZeroBaseState {
            version: 1,
            base: base.to_vec(),
            fitted: true,
        };
        Ok(())
    }

    fn transform(&self, window: ArrayView2<'_, T>) -> Result<Array2<T>> {
        let base = self.fitted_base()?;
        zero_base_standardize(window, Some(base)).map(|(_, normalized)| normalized)
    }

    fn inverse_transform(&self, window: ArrayView2<'_, T>) -> Result<Array2<T>> {
        let base = self.fitted_base()?.to_owned();
        check_width(&base, window)?;

        // x = (x' + 1) * base
        let mut original = window.to_owned();
        for mut row in original.rows_mut() {
            row.zip_mut_with(&base, |v, &b| *v = (*v + T::ONE) * b);
        }
        Ok(original)
    }

    fn get_state(&self) -> Self::State {
        self.state.clone()
    }

    fn set_state(&mut self, state: Self::State) -> Result<()> {
        if state.version != 1 {
            return Err(EtlError::InvalidParameter {
                name: "version",
                value: state.version.to_string(),
                expected: "state version 1",
            });
        }
        self.state = state;
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.state.fitted
    }

    fn reset(&mut self) {
        self.state = ZeroBaseState::default();
    }
}
