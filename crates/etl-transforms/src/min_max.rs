//! Column-wise min-max normalization.
//!
//! Scales each column of a window into `[0, 1]` with
//! `x' = (x - min) / (max - min)`. Not used by the window generator; kept as a
//! reusable utility for callers that prefer bounded features.

use etl_core::{
    error::{EtlError, Result},
    num::EtlFloat,
    traits::WindowTransform,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Normalize `window` column-wise, returning `(min, max, normalized)`.
///
/// Missing bounds are computed from the window itself, skipping NaN cells.
/// A constant column (`max == min`) produces NaN.
///
/// # Errors
///
/// Returns an error if a bound must be computed from a window with no rows,
/// or if a supplied bound's length differs from the column count.
///
/// # Example
///
/// ```rust
/// use etl_transforms::min_max_normalize;
/// use ndarray::array;
///
/// let window = array![[1.0, 10.0], [3.0, 30.0], [2.0, 20.0]];
/// let (min, max, normalized) = min_max_normalize(window.view(), None, None).unwrap();
///
/// assert_eq!(min.to_vec(), vec![1.0, 10.0]);
/// assert_eq!(max.to_vec(), vec![3.0, 30.0]);
/// assert_eq!(normalized.column(0).to_vec(), vec![0.0, 1.0, 0.5]);
/// ```
pub fn min_max_normalize<T: EtlFloat>(
    window: ArrayView2<'_, T>,
    data_min: Option<ArrayView1<'_, T>>,
    data_max: Option<ArrayView1<'_, T>>,
) -> Result<(Array1<T>, Array1<T>, Array2<T>)> {
    let data_min = match data_min {
        Some(min) => min.to_owned(),
        None => column_fold(window, T::infinity(), T::min)?,
    };
    let data_max = match data_max {
        Some(max) => max.to_owned(),
        None => column_fold(window, T::neg_infinity(), T::max)?,
    };
    check_width(&data_min, window)?;
    check_width(&data_max, window)?;

    let normalized = scale(window, &data_min, &data_max, |v, lo, hi| (v - lo) / (hi - lo));
    Ok((data_min, data_max, normalized))
}

/// Reduce each column with `f`. `T::min`/`T::max` ignore NaN operands.
fn column_fold<T: EtlFloat>(
    window: ArrayView2<'_, T>,
    init: T,
    f: fn(T, T) -> T,
) -> Result<Array1<T>> {
    if window.nrows() == 0 {
        return Err(EtlError::InvalidParameter {
            name: "window",
            value: "0 rows".to_string(),
            expected: "at least one row to compute column bounds",
        });
    }
    Ok(window.fold_axis(Axis(0), init, |&acc, &v| f(acc, v)))
}

fn check_width<T: EtlFloat>(bound: &Array1<T>, window: ArrayView2<'_, T>) -> Result<()> {
    if bound.len() != window.ncols() {
        return Err(EtlError::ShapeMismatch {
            expected: vec![window.ncols()],
            actual: vec![bound.len()],
        });
    }
    Ok(())
}

fn scale<T: EtlFloat>(
    window: ArrayView2<'_, T>,
    lo: &Array1<T>,
    hi: &Array1<T>,
    f: impl Fn(T, T, T) -> T,
) -> Array2<T> {
    let mut out = window.to_owned();
    for mut row in out.rows_mut() {
        for ((v, &l), &h) in row.iter_mut().zip(lo.iter()).zip(hi.iter()) {
            *v = f(*v, l, h);
        }
    }
    out
}

/// State for MinMaxTransform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(bound = "T: EtlFloat")]
pub struct MinMaxState<T: EtlFloat> {
    /// Version tag for state compatibility.
    pub version: u32,
    /// Minimum per column.
    pub min: Vec<T>,
    /// Maximum per column.
    pub max: Vec<T>,
    /// Whether the transform is fitted.
    pub fitted: bool,
}

/// Min-max normalization as a fit/transform object.
#[derive(Debug, Clone, Default)]
pub struct MinMaxTransform<T: EtlFloat> {
    state: MinMaxState<T>,
}

impl<T: EtlFloat> MinMaxTransform<T> {
    /// Create an unfitted transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: MinMaxState::default(),
        }
    }

    /// Fitted `(min, max)` bounds, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<(&[T], &[T])> {
        self.state
            .fitted
            .then_some((self.state.min.as_slice(), self.state.max.as_slice()))
    }

    fn fitted_bounds(&self) -> Result<(Array1<T>, Array1<T>)> {
        self.bounds()
            .map(|(lo, hi)| (Array1::from(lo.to_vec()), Array1::from(hi.to_vec())))
            .ok_or_else(|| EtlError::InvalidParameter {
                name: "transform",
                value: "unfitted".to_string(),
                expected: "fit() before transform()",
            })
    }
}

impl<T: EtlFloat> WindowTransform<T> for MinMaxTransform<T> {
    type State = MinMaxState<T>;

    fn fit(&mut self, window: ArrayView2<'_, T>) -> Result<()> {
        let min = column_fold(window, T::infinity(), T::min)?;
        let max = column_fold(window, T::neg_infinity(), T::max)?;
        self.state = MinMaxState {
            version: 1,
            min: min.to_vec(),
            max: max.to_vec(),
            fitted: true,
        };
        Ok(())
    }

    fn transform(&self, window: ArrayView2<'_, T>) -> Result<Array2<T>> {
        let (lo, hi) = self.fitted_bounds()?;
        min_max_normalize(window, Some(lo.view()), Some(hi.view())).map(|(_, _, out)| out)
    }

    fn inverse_transform(&self, window: ArrayView2<'_, T>) -> Result<Array2<T>> {
        let (lo, hi) = self.fitted_bounds()?;
        check_width(&lo, window)?;
        // x = x' * (max - min) + min
        Ok(scale(window, &lo, &hi, |v, l, h| v * (h - l) + l))
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
        if state.min.len() != state.max.len() {
            return Err(EtlError::LengthMismatch {
                expected: state.min.len(),
                actual: state.max.len(),
            });
        }
        self.state = state;
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.state.fitted
    }

    fn reset(&mut self) {
        self.state = MinMaxState::default();
    }
}
