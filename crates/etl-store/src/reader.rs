//! Batch replay from a finished dataset.

use std::path::Path;

use etl_core::{
    batch::Batch,
    error::{EtlError, Result},
};
use ndarray::{s, Array1, Array3};

use crate::container::{ContainerReader, NpyElement};
use crate::writer::{X_ARRAY, Y_ARRAY};

/// A dataset written by [`DatasetWriter`](crate::DatasetWriter), loaded for
/// replay.
///
/// Both arrays are read into memory when the dataset is opened; replay never
/// touches the file again.
#[derive(Debug, Clone)]
pub struct DatasetReader<T> {
    x: Array3<T>,
    y: Array1<T>,
    batch_size: usize,
}

impl<T: NpyElement> DatasetReader<T> {
    /// Open the dataset at `path` for replay in batches of `batch_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if `batch_size` is zero, the path is not a finished
    /// dataset, its element type is not `T`, or `x` and `y` differ in length.
    pub fn open(path: impl AsRef<Path>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(EtlError::InvalidParameter {
                name: "batch_size",
                value: "0".to_string(),
                expected: "positive integer",
            });
        }

        let container = ContainerReader::open(path)?;
        let x_meta = container.array(X_ARRAY)?;
        let y_meta = container.array(Y_ARRAY)?;
        let (rows, cols) = match x_meta.row_shape[..] {
            [rows, cols] => (rows, cols),
            _ => {
                return Err(EtlError::format(format!(
                    "'{X_ARRAY}' rows have shape {:?}, expected two dimensions",
                    x_meta.row_shape
                )))
            }
        };
        if x_meta.len != y_meta.len {
            return Err(EtlError::Misaligned {
                x_rows: x_meta.len,
                y_rows: y_meta.len,
            });
        }

        let x = Array3::from_shape_vec((x_meta.len, rows, cols), container.read::<T>(X_ARRAY)?)
            .map_err(|e| EtlError::format(format!("stored '{X_ARRAY}' rows: {e}")))?;
        let y = Array1::from_vec(container.read::<T>(Y_ARRAY)?);

        Ok(Self { x, y, batch_size })
    }

    /// Stored windows.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns `true` if the dataset holds no windows.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Windows per replayed batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Shape of one window: `(rows, columns)`.
    pub fn window_shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.x.dim();
        (rows, cols)
    }

    /// Shape of the whole `x` array.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.x.dim()
    }

    /// Windows `[start, end)` as one batch, clamped to the stored length.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored `x` and `y` disagree in length, which
    /// [`open`](Self::open) already rules out.
    pub fn read_range(&self, start: usize, end: usize) -> Result<Batch<T>> {
        let end = end.min(self.len());
        let start = start.min(end);
        Batch::new(
            self.x.slice(s![start..end, .., ..]).to_owned(),
            self.y.slice(s![start..end]).to_owned(),
        )
    }

    /// Replay batches from window `start` onwards.
    ///
    /// The cursor never ends by itself: once it passes the stored length it
    /// keeps yielding short and then empty batches. Use
    /// [`BatchCursor::until_exhausted`] to stop at the end instead.
    pub fn batches(self, start: usize) -> BatchCursor<T> {
        BatchCursor {
            reader: self,
            position: start,
            stop_at_end: false,
        }
    }
}

/// Iterator over fixed-size batches of a [`DatasetReader`].
#[derive(Debug, Clone)]
pub struct BatchCursor<T> {
    reader: DatasetReader<T>,
    position: usize,
    stop_at_end: bool,
}

impl<T: NpyElement> BatchCursor<T> {
    /// The dataset being replayed.
    pub fn reader(&self) -> &DatasetReader<T> {
        &self.reader
    }

    /// Move to window `position`.
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Window index of the next batch.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` once the next batch would be empty.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.reader.len()
    }

    /// Stop at the first batch that would be empty.
    #[must_use]
    pub fn until_exhausted(mut self) -> Self {
        self.stop_at_end = true;
        self
    }
}

impl<T: NpyElement> Iterator for BatchCursor<T> {
    type Item = Result<Batch<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stop_at_end && self.is_exhausted() {
            return None;
        }
        let start = self.position;
        let end = start.saturating_add(self.reader.batch_size);
        self.position = end;
        Some(self.reader.read_range(start, end))
    }
}
