//! Sliding window generator.
//!
//! Walks a table once, top to bottom, pairing each input window with the
//! mean of the target column over the rows that follow it, and groups the
//! accepted pairs into fixed-size batches.

use core::iter::FusedIterator;

use etl_core::{
    batch::Batch,
    dataframe::DataFrame,
    error::{EtlError, Result},
    num::EtlFloat,
    traits::DegenerateBase,
};
use etl_transforms::{zero_base_columns, zero_base_standardize};
use log::{debug, warn};
use ndarray::{s, Array2, ArrayView2};
use serde::Serialize;

use crate::config::WindowSpec;

/// Counters collected while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorStats {
    /// Scan positions visited so far.
    pub positions_scanned: usize,
    /// Windows that passed every check.
    pub windows_accepted: usize,
    /// Windows dropped because the input or target rows had a missing cell.
    pub dropped_missing: usize,
    /// Windows dropped because of a zero normalization base.
    pub dropped_degenerate: usize,
    /// Batches handed out.
    pub batches_emitted: usize,
    /// Accepted windows lost in the trailing partial batch.
    pub trailing_discarded: usize,
}

/// Lazy producer of [`Batch`]es from a table.
///
/// The generator owns a row-major copy of the retained columns and a cursor.
/// Each call to [`next_batch`](Self::next_batch) resumes the scan where the
/// previous one stopped and returns as soon as `batch_size` windows have been
/// accepted. Once the scan reaches the end it only ever returns `None`; a new
/// pass needs a new generator.
///
/// # Example
///
/// ```rust
/// use etl_core::{DataFrame, Series};
/// use etl_windows::{WindowGenerator, WindowSpec};
///
/// let close: Series<f64> = (1..=20).map(|v| v as f64).collect();
/// let df = DataFrame::from_columns(vec![("close".to_string(), close)]).unwrap();
///
/// let spec = WindowSpec::new(3, 1, "close").with_batch_size(2);
/// let batches: Vec<_> = WindowGenerator::new(&df, spec)
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(batches.len(), 8);
/// assert_eq!(batches[0].x.slice(ndarray::s![0, .., 0]).to_vec(), vec![0.0, 1.0, 2.0]);
/// assert_eq!(batches[0].y[0], 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct WindowGenerator<T: EtlFloat> {
    spec: WindowSpec,
    rows: Array2<T>,
    columns: Vec<String>,
    y_index: usize,
    positions: usize,
    cursor: usize,
    windows: Vec<Array2<T>>,
    targets: Vec<T>,
    stats: GeneratorStats,
    finished: bool,
}

impl<T: EtlFloat> WindowGenerator<T> {
    /// Prepare a scan over `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the target column
    /// is not present after filtering.
    pub fn new(table: &DataFrame<T>, spec: WindowSpec) -> Result<Self> {
        spec.validate()?;

        let columns: Vec<String> = table
            .select_columns(spec.active_filter())
            .into_iter()
            .map(String::from)
            .collect();
        let y_index = columns
            .iter()
            .position(|c| *c == spec.y_col)
            .ok_or_else(|| EtlError::MissingColumn(spec.y_col.clone()))?;
        let rows = table.to_row_matrix_of(&columns)?;
        let positions = spec.positions(rows.nrows());

        debug!(
            "window scan over {} rows x {} columns, {} positions",
            rows.nrows(),
            rows.ncols(),
            positions
        );

        // never more than one batch, and never more than the scan can accept
        let capacity = spec.batch_size.min(positions);
        Ok(Self {
            windows: Vec::with_capacity(capacity),
            targets: Vec::with_capacity(capacity),
            spec,
            rows,
            columns,
            y_index,
            positions,
            cursor: 0,
            stats: GeneratorStats::default(),
            finished: false,
        })
    }

    /// Columns in window order, after filtering.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Shape of one input window: `(x_window_size, columns)`.
    pub fn window_shape(&self) -> (usize, usize) {
        (self.spec.x_window_size, self.columns.len())
    }

    /// The configuration this generator runs with.
    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    /// Counters so far.
    pub fn stats(&self) -> &GeneratorStats {
        &self.stats
    }

    /// Returns `true` once the scan has reached the end of the table.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Produce the next batch, or `None` at end of data.
    ///
    /// An error ends the scan; later calls return `None`.
    pub fn next_batch(&mut self) -> Option<Result<Batch<T>>> {
        if self.finished {
            return None;
        }

        while self.cursor < self.positions {
            let i = self.cursor;
            self.cursor += 1;
            self.stats.positions_scanned += 1;

            match self.window_at(i) {
                Ok(Some((window, target))) => {
                    self.windows.push(window);
                    self.targets.push(target);
                    self.stats.windows_accepted += 1;
                    if self.windows.len() == self.spec.batch_size {
                        return Some(self.emit());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        self.finished = true;
        if self.windows.is_empty() {
            return None;
        }
        if self.spec.flush_partial {
            return Some(self.emit());
        }

        warn!(
            "discarding {} trailing windows (fewer than batch_size {})",
            self.windows.len(),
            self.spec.batch_size
        );
        self.stats.trailing_discarded = self.windows.len();
        self.windows.clear();
        self.targets.clear();
        None
    }

    /// Build the (input window, target) pair at scan position `i`, or `None`
    /// if the window is dropped.
    fn window_at(&mut self, i: usize) -> Result<Option<(Array2<T>, T)>> {
        let x_end = i + self.spec.x_window_size;
        let y_end = x_end + self.spec.y_window_size;
        let input = self.rows.slice(s![i..x_end, ..]);
        let target = self.rows.slice(s![x_end..y_end, ..]);

        if has_nan(input) || has_nan(target) {
            self.stats.dropped_missing += 1;
            return Ok(None);
        }

        let (input, target) = if self.spec.normalize {
            let zeros = zero_base_columns(input.row(0));
            if let Some(&column) = zeros.first() {
                match self.spec.degenerate_base {
                    DegenerateBase::Propagate => {
                        warn!(row = i, column = self.columns[column].as_str(); "zero normalization base");
                    }
                    DegenerateBase::Skip => {
                        self.stats.dropped_degenerate += 1;
                        return Ok(None);
                    }
                    DegenerateBase::Error => {
                        return Err(EtlError::DegenerateBase {
                            row: i,
                            column: self.columns[column].clone(),
                        });
                    }
                }
            }

            let (base, input) = zero_base_standardize(input, None)?;
            let (_, target) = zero_base_standardize(target, Some(base.view()))?;
            (input, target)
        } else {
            (input.to_owned(), target.to_owned())
        };

        let mean = target.column(self.y_index).mean().unwrap_or(T::NAN);
        Ok(Some((input, mean)))
    }

    fn emit(&mut self) -> Result<Batch<T>> {
        let windows = std::mem::take(&mut self.windows);
        let targets = std::mem::take(&mut self.targets);
        let capacity = self.spec.batch_size.min(self.positions - self.cursor);
        self.windows.reserve(capacity);
        self.targets.reserve(capacity);
        self.stats.batches_emitted += 1;
        debug!(
            batch = self.stats.batches_emitted - 1, windows = windows.len(), row = self.cursor;
            "batch ready"
        );
        Batch::from_windows(&windows, targets)
    }
}

impl<T: EtlFloat> Iterator for WindowGenerator<T> {
    type Item = Result<Batch<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

impl<T: EtlFloat> FusedIterator for WindowGenerator<T> {}

fn has_nan<T: EtlFloat>(window: ArrayView2<'_, T>) -> bool {
    window.iter().any(|v| v.is_nan())
}
