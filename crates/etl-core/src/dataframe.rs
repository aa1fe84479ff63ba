//! The in-memory bar table.
//!
//! Columns are kept in an `IndexMap` so their order is the order they were
//! read from the file. That order becomes the last axis of every window.

use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{EtlError, Result};
use crate::num::EtlFloat;
use crate::series::Series;

/// Named bar columns of equal length.
///
/// # Example
///
/// ```rust
/// use etl_core::{DataFrame, Series};
///
/// let df: DataFrame<f64> = DataFrame::from_columns(vec![
///     ("close".to_string(), Series::from_vec(vec![100.0, 101.0, 102.0])),
///     ("volume".to_string(), Series::from_vec(vec![1000.0, 1100.0, 1200.0])),
/// ])
/// .unwrap();
///
/// assert_eq!(df.len(), 3);
/// assert_eq!(df.column_names(), vec!["close", "volume"]);
/// assert_eq!(df.column_index("volume"), Some(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: EtlFloat")]
pub struct DataFrame<T: EtlFloat> {
    columns: IndexMap<String, Series<T>>,
}

impl<T: EtlFloat> DataFrame<T> {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
        }
    }

    /// Build a table from `(name, column)` pairs, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if a name repeats or the columns differ in length.
    pub fn from_columns(columns: Vec<(String, Series<T>)>) -> Result<Self> {
        let mut df = Self {
            columns: IndexMap::with_capacity(columns.len()),
        };
        for (name, series) in columns {
            df.add_column(name, series)?;
        }
        Ok(df)
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Series::len)
    }

    /// Returns `true` if the table has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Position of `name` along the column axis.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// The column called `name`.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Series<T>> {
        self.columns.get(name)
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::InvalidParameter`] for a duplicate name and
    /// [`EtlError::LengthMismatch`] if the column has a different number of
    /// bars than the table.
    pub fn add_column(&mut self, name: String, series: Series<T>) -> Result<()> {
        if self.columns.contains_key(&name) {
            return Err(EtlError::InvalidParameter {
                name: "column_name",
                value: name,
                expected: "unique column name",
            });
        }
        if !self.columns.is_empty() && series.len() != self.len() {
            return Err(EtlError::LengthMismatch {
                expected: self.len(),
                actual: series.len(),
            });
        }
        self.columns.insert(name, series);
        Ok(())
    }

    /// Names of the columns `keep` selects, in table order. `None` selects
    /// every column and names the table does not have are ignored.
    #[must_use]
    pub fn select_columns<S: AsRef<str>>(&self, keep: Option<&[S]>) -> Vec<&str> {
        self.columns
            .keys()
            .map(String::as_str)
            .filter(|name| keep.map_or(true, |keep| keep.iter().any(|k| k.as_ref() == *name)))
            .collect()
    }

    /// Row-major `(bars, columns)` copy of the whole table.
    #[must_use]
    pub fn to_row_matrix(&self) -> Array2<T> {
        fill_rows(self.len(), self.columns.values())
    }

    /// Row-major `(bars, columns.len())` copy of the named columns, in the
    /// order given. Only those columns are copied.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::MissingColumn`] for a name the table does not have.
    pub fn to_row_matrix_of<S: AsRef<str>>(&self, columns: &[S]) -> Result<Array2<T>> {
        let series = columns
            .iter()
            .map(|name| {
                self.get_column(name.as_ref())
                    .ok_or_else(|| EtlError::MissingColumn(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(fill_rows(self.len(), series.into_iter()))
    }

    /// `(name, column)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series<T>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn fill_rows<'a, T, I>(rows: usize, columns: I) -> Array2<T>
where
    T: EtlFloat,
    I: ExactSizeIterator<Item = &'a Series<T>>,
{
    let mut matrix = Array2::from_elem((rows, columns.len()), T::NAN);
    for (mut col, series) in matrix.columns_mut().into_iter().zip(columns) {
        for (cell, &value) in col.iter_mut().zip(series.iter()) {
            *cell = value;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars() -> DataFrame<f64> {
        DataFrame::from_columns(vec![
            ("open".to_string(), Series::from_vec(vec![1.0, 2.0, 3.0])),
            ("close".to_string(), Series::from_vec(vec![1.5, 2.5, 3.5])),
            ("volume".to_string(), Series::from_vec(vec![10.0, 20.0, 30.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_table() {
        let df: DataFrame<f64> = DataFrame::new();
        assert!(df.is_empty());
        assert_eq!(df.column_count(), 0);
        assert_eq!(df.to_row_matrix().dim(), (0, 0));
    }

    #[test]
    fn test_ragged_column_rejected() {
        let mut df = bars();
        let result = df.add_column("accprice".to_string(), Series::from_vec(vec![1.0]));
        assert!(matches!(
            result,
            Err(EtlError::LengthMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut df = bars();
        assert!(df
            .add_column("close".to_string(), Series::from_vec(vec![0.0; 3]))
            .is_err());
    }

    #[test]
    fn test_column_index() {
        let df = bars();
        assert_eq!(df.column_index("open"), Some(0));
        assert_eq!(df.column_index("volume"), Some(2));
        assert_eq!(df.column_index("time"), None);
    }

    #[test]
    fn test_select_columns_uses_table_order() {
        let df = bars();
        let keep = ["volume".to_string(), "open".to_string(), "accprice".to_string()];
        assert_eq!(df.select_columns(Some(&keep[..])), vec!["open", "volume"]);
        assert_eq!(df.select_columns::<String>(None), vec!["open", "close", "volume"]);
    }

    #[test]
    fn test_to_row_matrix_of() {
        let df = bars();
        let m = df.to_row_matrix_of(&["volume", "open"]).unwrap();
        assert_eq!(m.dim(), (3, 2));
        assert_eq!(m.row(2).to_vec(), vec![30.0, 3.0]);
        assert!(matches!(
            df.to_row_matrix_of(&["time"]),
            Err(EtlError::MissingColumn(ref c)) if c == "time"
        ));
    }

    #[test]
    fn test_to_row_matrix() {
        let m = bars().to_row_matrix();
        assert_eq!(m.dim(), (3, 3));
        assert_eq!(m.row(1).to_vec(), vec![2.0, 2.5, 20.0]);
        assert_eq!(m[[2, 2]], 30.0);
    }
}
