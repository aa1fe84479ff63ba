//! Incremental dataset writer.

use std::path::{Path, PathBuf};

use etl_core::{
    batch::Batch,
    error::{EtlError, Result},
};
use log::{debug, info};
use serde::Serialize;

use crate::container::{ContainerWriter, NpyElement};

/// Name of the input window array.
pub const X_ARRAY: &str = "x";
/// Name of the target array.
pub const Y_ARRAY: &str = "y";

/// What a finished write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Published dataset path.
    pub path: PathBuf,
    /// Batches appended.
    pub batches: usize,
    /// Windows stored in both `x` and `y`.
    pub rows: usize,
    /// Shape of one stored window: `(rows, columns)`.
    pub window_shape: (usize, usize),
}

/// Appends batches to a growable `x`/`y` dataset.
///
/// The first batch fixes the per-window shape; every later batch grows both
/// arrays along the window axis. Row counts for `x` and `y` are kept apart and
/// compared after each append.
///
/// # Example
///
/// ```rust
/// use etl_core::Batch;
/// use etl_store::DatasetWriter;
/// use ndarray::{Array1, Array3};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("bars.etl");
///
/// let batch = Batch::new(Array3::<f64>::zeros((2, 3, 1)), Array1::zeros(2)).unwrap();
/// let summary = DatasetWriter::create(&path)
///     .unwrap()
///     .write_all(vec![Ok(batch.clone()), Ok(batch)])
///     .unwrap();
///
/// assert_eq!(summary.rows, 4);
/// assert_eq!(summary.window_shape, (3, 1));
/// ```
#[derive(Debug)]
pub struct DatasetWriter<T: NpyElement> {
    container: ContainerWriter<T>,
    window_shape: Option<(usize, usize)>,
    rcount_x: usize,
    rcount_y: usize,
    batches: usize,
}

impl<T: NpyElement> DatasetWriter<T> {
    /// Start a dataset that becomes visible at `path` once finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            container: ContainerWriter::create(path)?,
            window_shape: None,
            rcount_x: 0,
            rcount_y: 0,
            batches: 0,
        })
    }

    /// Windows stored so far.
    pub fn rows(&self) -> usize {
        self.rcount_x
    }

    /// Batches appended so far.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Append one batch, creating the arrays on the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch's window shape differs from the first
    /// batch, the write fails, or `x` and `y` end up with different row counts.
    pub fn append(&mut self, batch: &Batch<T>) -> Result<()> {
        if self.window_shape.is_none() {
            let (rows, cols) = batch.window_shape();
            self.container.create_array(X_ARRAY, &[rows, cols])?;
            self.container.create_array(Y_ARRAY, &[])?;
            self.window_shape = Some((rows, cols));
            info!(
                "creating dataset {} with windows of {rows}x{cols}",
                self.container.path().display()
            );
        }

        self.rcount_x = self.container.append(X_ARRAY, batch.x.view())?;
        self.rcount_y = self.container.append(Y_ARRAY, batch.y.view())?;
        if self.rcount_x != self.rcount_y {
            return Err(EtlError::Misaligned {
                x_rows: self.rcount_x,
                y_rows: self.rcount_y,
            });
        }

        debug!(batch = self.batches, rows = self.rcount_x; "batch appended");
        self.batches += 1;
        Ok(())
    }

    /// Publish the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::EmptyInput`] if no batch was appended (nothing is
    /// left on disk), or an error if the container cannot be finalized.
    pub fn finish(self) -> Result<WriteSummary> {
        let Some(window_shape) = self.window_shape else {
            return Err(EtlError::EmptyInput {
                destination: self.container.path().display().to_string(),
            });
        };
        let (batches, rows) = (self.batches, self.rcount_x);
        let path = self.container.close()?;
        info!("dataset {} finished: {batches} batches, {rows} windows", path.display());

        Ok(WriteSummary {
            path,
            batches,
            rows,
            window_shape,
        })
    }

    /// Drain `batches` into the dataset and publish it.
    ///
    /// The first batch is drawn before anything else to learn the window
    /// shape. Any error, including one yielded by `batches`, abandons the
    /// write and removes the partial container.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::EmptyInput`] if `batches` yields nothing, or the
    /// first error raised while drawing or appending.
    pub fn write_all<I>(mut self, batches: I) -> Result<WriteSummary>
    where
        I: IntoIterator<Item = Result<Batch<T>>>,
    {
        for batch in batches {
            self.append(&batch?)?;
        }
        self.finish()
    }
}
