//! The end-to-end extract, window and load pipeline.

use std::marker::PhantomData;

use etl_core::{dataframe::DataFrame, error::Result, source::CsvSource};
use etl_store::{BatchCursor, DatasetReader, DatasetWriter, NpyElement, WriteSummary};
use etl_windows::{GeneratorStats, WindowGenerator};
use log::info;
use serde::Serialize;

use crate::config::EtlConfig;

/// Outcome of [`Etl::create_clean_datafile`].
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Columns stored in each window, in order.
    pub columns: Vec<String>,
    /// Scan counters.
    pub stats: GeneratorStats,
    /// What was written.
    pub summary: WriteSummary,
}

/// Builds a dataset from a bar file and replays it.
///
/// The three stages mirror the data flow: [`clean_data`](Self::clean_data)
/// windows the source table, [`create_clean_datafile`](Self::create_clean_datafile)
/// persists those batches, and [`generate_clean_data`](Self::generate_clean_data)
/// replays the persisted dataset.
///
/// # Example
///
/// ```rust
/// use bar_etl::{Etl, EtlConfig, WindowSpec};
///
/// let dir = tempfile::tempdir().unwrap();
/// let csv = dir.path().join("bars.csv");
/// let rows: String = (1..=20).map(|i| format!("{i},{i}\n")).collect();
/// std::fs::write(&csv, format!(",close\n{rows}")).unwrap();
///
/// let window = WindowSpec::new(3, 1, "close").with_batch_size(2);
/// let etl = Etl::<f64>::new(EtlConfig::new(&csv, dir.path().join("bars.etl"), window)).unwrap();
///
/// let report = etl.create_clean_datafile().unwrap();
/// assert_eq!(report.summary.batches, 8);
///
/// let first = etl.generate_clean_data(0).unwrap().next().unwrap().unwrap();
/// assert_eq!(first.y.to_vec(), vec![3.0, 1.5]);
/// ```
#[derive(Debug, Clone)]
pub struct Etl<T = f64> {
    config: EtlConfig,
    _marker: PhantomData<T>,
}

impl<T: NpyElement> Etl<T> {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: EtlConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            _marker: PhantomData,
        })
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Read the source file, parsing only the filtered columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a kept cell is not a number.
    pub fn load_table(&self) -> Result<DataFrame<T>> {
        let mut source = CsvSource::new();
        if let Some(keep) = self.config.window.active_filter() {
            source = source.with_columns(keep.to_vec());
        }
        source.read(&self.config.filename_in)
    }

    /// Window the source file into batches.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or lacks the target column.
    pub fn clean_data(&self) -> Result<WindowGenerator<T>> {
        WindowGenerator::new(&self.load_table()?, self.config.window.clone())
    }

    /// Window the source file and persist every batch to `filename_out`.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::EmptyInput`](etl_core::EtlError::EmptyInput) if the
    /// source is too short for a single batch, or the first error raised while
    /// reading, windowing or writing. No dataset is left behind on error.
    pub fn create_clean_datafile(&self) -> Result<BuildReport> {
        let mut generator = self.clean_data()?;
        let columns = generator.columns().to_vec();
        info!(
            "Creating x & y data in {}",
            self.config.filename_out.display()
        );

        let summary = DatasetWriter::<T>::create(&self.config.filename_out)?.write_all(&mut generator)?;
        let stats = generator.stats().clone();
        info!(
            "Clean dataset created in {}: {} windows accepted, {} dropped for missing data",
            summary.path.display(),
            stats.windows_accepted,
            stats.dropped_missing
        );

        Ok(BuildReport {
            columns,
            stats,
            summary,
        })
    }

    /// Replay the persisted dataset in `batch_size` batches from `start_index`.
    ///
    /// The returned cursor does not end by itself; see [`BatchCursor`].
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be opened.
    pub fn generate_clean_data(&self, start_index: usize) -> Result<BatchCursor<T>> {
        let reader = DatasetReader::open(&self.config.filename_out, self.config.window.batch_size)?;
        Ok(reader.batches(start_index))
    }
}
