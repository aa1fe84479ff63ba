//! One named column of a bar table.
//!
//! Missing bars are stored as NaN rather than as a separate mask, so a
//! window can be checked for gaps by scanning its values.

use core::ops::Index;

use serde::{Deserialize, Serialize};

use crate::num::EtlFloat;

/// Values of one column, oldest bar first.
///
/// # Example
///
/// ```rust
/// use etl_core::Series;
///
/// let mut volume: Series<f64> = Series::new();
/// volume.push(1000.0);
/// volume.push(f64::NAN);
///
/// assert_eq!(volume.len(), 2);
/// assert_eq!(volume.missing(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: EtlFloat", transparent)]
pub struct Series<T: EtlFloat> {
    values: Vec<T>,
}

impl<T: EtlFloat> Default for Series<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: EtlFloat> Series<T> {
    /// An empty column.
    #[must_use]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Wrap existing values.
    #[must_use]
    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the column has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append the next bar's value.
    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    /// Iterate over the values.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// The values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Number of missing (NaN) cells.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }
}

impl<T: EtlFloat> Index<usize> for Series<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

impl<T: EtlFloat> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T: EtlFloat> IntoIterator for &'a Series<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: EtlFloat> From<Vec<T>> for Series<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_index() {
        let mut close: Series<f64> = Series::new();
        assert!(close.is_empty());

        close.push(10.5);
        close.push(11.0);
        assert_eq!(close.len(), 2);
        assert_eq!(close[1], 11.0);
        assert_eq!(close.as_slice(), &[10.5, 11.0]);
    }

    #[test]
    fn test_missing() {
        let close: Series<f32> = vec![1.0, f32::NAN, 3.0, f32::NAN].into();
        assert_eq!(close.missing(), 2);
        assert_eq!(Series::<f32>::new().missing(), 0);
    }

    #[test]
    fn test_collect_and_iterate() {
        let close: Series<f64> = (1..=4).map(f64::from).collect();
        let total: f64 = (&close).into_iter().sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let close = Series::from_vec(vec![1.0, 2.5]);
        assert_eq!(serde_json::to_string(&close).unwrap(), "[1.0,2.5]");
    }
}
