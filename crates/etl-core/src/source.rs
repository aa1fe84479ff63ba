//! Loading bar files into a [`DataFrame`].
//!
//! The expected layout is a CSV file with a header row whose first column is
//! a row index. The index column is discarded; every other column becomes a
//! [`Series`]. Empty cells and the usual missing-value spellings are read as
//! NaN so the window generator can skip the windows that contain them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::info;

use crate::dataframe::DataFrame;
use crate::error::{EtlError, Result};
use crate::num::EtlFloat;
use crate::series::Series;

const MISSING: [&str; 6] = ["", "nan", "NaN", "NA", "N/A", "null"];

/// CSV reader configuration.
///
/// # Example
///
/// ```rust
/// use etl_core::CsvSource;
///
/// let data = "idx,time,close\n0,t0,1.0\n1,t1,\n";
/// let df = CsvSource::new()
///     .with_columns(vec!["close".to_string()])
///     .read_from::<f64, _>(data.as_bytes())
///     .unwrap();
///
/// assert_eq!(df.column_names(), vec!["close"]);
/// assert!(df.get_column("close").unwrap()[1].is_nan());
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    delimiter: u8,
    columns: Option<Vec<String>>,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self {
            delimiter: b',',
            columns: None,
        }
    }
}

impl CsvSource {
    /// Create a reader for comma separated files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Only parse the named columns. Other columns are never converted, so
    /// non-numeric columns such as timestamps can be left out.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Read a CSV file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is malformed, or a
    /// retained cell is not a number.
    pub fn read<T: EtlFloat, P: AsRef<Path>>(&self, path: P) -> Result<DataFrame<T>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = self.read_from(file)?;
        let missing: usize = df.iter().map(|(_, series)| series.missing()).sum();
        info!(
            "Read {} rows x {} columns from {} ({} missing cells)",
            df.len(),
            df.column_count(),
            path.display(),
            missing
        );
        Ok(df)
    }

    /// Read CSV data from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is malformed or a retained cell is not a number.
    pub fn read_from<T: EtlFloat, R: Read>(&self, reader: R) -> Result<DataFrame<T>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        // Skip the leading index column.
        let selected: Vec<(usize, String)> = rdr
            .headers()?
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, name)| {
                self.columns
                    .as_ref()
                    .map_or(true, |keep| keep.iter().any(|k| k == name))
            })
            .map(|(i, name)| (i, name.to_string()))
            .collect();

        let mut values: Vec<Vec<T>> = vec![Vec::new(); selected.len()];

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for ((field, name), column) in selected.iter().zip(values.iter_mut()) {
                let raw = record.get(*field).unwrap_or("").trim();
                column.push(parse_cell(raw).ok_or_else(|| EtlError::Parse {
                    row,
                    column: name.clone(),
                    value: raw.to_string(),
                })?);
            }
        }

        DataFrame::from_columns(
            selected
                .into_iter()
                .zip(values)
                .map(|((_, name), column)| (name, Series::from_vec(column)))
                .collect(),
        )
    }
}

fn parse_cell<T: EtlFloat>(raw: &str) -> Option<T> {
    if MISSING.contains(&raw) {
        return Some(T::NAN);
    }
    raw.parse::<f64>().ok().map(T::from_f64_lossy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BARS: &str = "\
,time,open,high,low,close,accprice,volume
0,2017-01-02 09:00,10,11,9,10.5,100,1000
1,2017-01-02 09:01,10.5,12,10,11,110,
2,2017-01-02 09:02,11,11.5,10.5,11.2,120,1500
";

    #[test]
    fn test_read_selected_columns() {
        let df: DataFrame<f64> = CsvSource::new()
            .with_columns(vec!["close".to_string(), "volume".to_string()])
            .read_from(BARS.as_bytes())
            .unwrap();

        assert_eq!(df.len(), 3);
        assert_eq!(df.column_names(), vec!["close", "volume"]);
        assert_eq!(df.get_column("close").unwrap().as_slice(), &[10.5, 11.0, 11.2]);
        assert!(df.get_column("volume").unwrap()[1].is_nan());
    }

    #[test]
    fn test_non_numeric_column_is_an_error_when_kept() {
        let result: Result<DataFrame<f64>> = CsvSource::new().read_from(BARS.as_bytes());
        match result {
            Err(EtlError::Parse { row, column, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "time");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_index_column_is_dropped() {
        let data = "idx,close\n5,1.0\n6,2.0\n";
        let df: DataFrame<f32> = CsvSource::new().read_from(data.as_bytes()).unwrap();
        assert_eq!(df.column_names(), vec!["close"]);
        assert_eq!(df.get_column("close").unwrap().as_slice(), &[1.0f32, 2.0]);
    }

    #[test]
    fn test_missing_spellings() {
        for raw in MISSING {
            assert!(parse_cell::<f64>(raw).unwrap().is_nan(), "{raw:?}");
        }
        assert_eq!(parse_cell::<f64>("1e3"), Some(1000.0));
        assert_eq!(parse_cell::<f64>("abc"), None);
    }

    #[test]
    fn test_delimiter() {
        let data = "i;close\n0;3.5\n";
        let df: DataFrame<f64> = CsvSource::new()
            .with_delimiter(b';')
            .read_from(data.as_bytes())
            .unwrap();
        assert_eq!(df.get_column("close").unwrap()[0], 3.5);
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.csv");
        File::create(&path).unwrap().write_all(BARS.as_bytes()).unwrap();

        let df: DataFrame<f64> = CsvSource::new()
            .with_columns(vec!["open".to_string()])
            .read(&path)
            .unwrap();
        assert_eq!(df.len(), 3);
    }
}
