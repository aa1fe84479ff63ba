//! Window generator configuration.

use etl_core::{
    error::{EtlError, Result},
    traits::DegenerateBase,
};
use serde::{Deserialize, Serialize};

/// Configuration for [`WindowGenerator`](crate::WindowGenerator).
///
/// # Example
///
/// ```rust
/// use etl_windows::WindowSpec;
///
/// let spec = WindowSpec::new(50, 1, "close")
///     .with_batch_size(64)
///     .with_filter_cols(vec!["close".to_string(), "volume".to_string()]);
///
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.span(), Some(51));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    /// Consecutive rows forming one input window.
    pub x_window_size: usize,
    /// Rows after the input window whose target column is averaged.
    pub y_window_size: usize,
    /// Name of the target column.
    pub y_col: String,
    /// Columns to keep; all others are dropped before windowing.
    /// `None` or an empty list keeps every column.
    pub filter_cols: Option<Vec<String>>,
    /// Apply zero-base standardization to every window.
    pub normalize: bool,
    /// Windows per emitted batch.
    pub batch_size: usize,
    /// Emit the trailing group of fewer than `batch_size` windows instead of
    /// discarding it.
    pub flush_partial: bool,
    /// What to do when a normalization base cell is zero.
    pub degenerate_base: DegenerateBase,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            x_window_size: 50,
            y_window_size: 1,
            y_col: "close".to_string(),
            filter_cols: None,
            normalize: true,
            batch_size: 100,
            flush_partial: false,
            degenerate_base: DegenerateBase::Propagate,
        }
    }
}

impl WindowSpec {
    /// Create a configuration with the given window sizes and target column.
    pub fn new(x_window_size: usize, y_window_size: usize, y_col: impl Into<String>) -> Self {
        Self {
            x_window_size,
            y_window_size,
            y_col: y_col.into(),
            ..Self::default()
        }
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Restrict the columns that enter the windows.
    pub fn with_filter_cols(mut self, filter_cols: Vec<String>) -> Self {
        self.filter_cols = Some(filter_cols);
        self
    }

    /// Enable or disable zero-base standardization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Emit the trailing partial batch.
    pub fn with_flush_partial(mut self, flush_partial: bool) -> Self {
        self.flush_partial = flush_partial;
        self
    }

    /// Set the zero-base handling mode.
    pub fn with_degenerate_base(mut self, mode: DegenerateBase) -> Self {
        self.degenerate_base = mode;
        self
    }

    /// Rows covered by one input window plus its target rows, or `None` if
    /// the sum does not fit in `usize`.
    pub fn span(&self) -> Option<usize> {
        self.x_window_size.checked_add(self.y_window_size)
    }

    /// Number of scan positions over a table of `num_rows` rows.
    ///
    /// A span longer than any table gives zero positions.
    pub fn positions(&self, num_rows: usize) -> usize {
        match self.span() {
            Some(span) if span <= num_rows => num_rows - span + 1,
            _ => 0,
        }
    }

    /// The filter list, if it actually filters anything.
    pub fn active_filter(&self) -> Option<&[String]> {
        self.filter_cols
            .as_deref()
            .filter(|cols| !cols.is_empty())
    }

    /// Check the sizes are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a window size or the batch size is zero, or the
    /// target column name is empty.
    pub fn validate(&self) -> Result<()> {
        if self.x_window_size == 0 {
            return Err(EtlError::InvalidWindow {
                name: "x_window_size",
                value: 0,
            });
        }
        if self.y_window_size == 0 {
            return Err(EtlError::InvalidWindow {
                name: "y_window_size",
                value: 0,
            });
        }
        if self.batch_size == 0 {
            return Err(EtlError::InvalidParameter {
                name: "batch_size",
                value: "0".to_string(),
                expected: "positive integer",
            });
        }
        if self.y_col.is_empty() {
            return Err(EtlError::InvalidParameter {
                name: "y_col",
                value: String::new(),
                expected: "non-empty column name",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let spec = WindowSpec::new(3, 1, "close");
        assert_eq!(spec.positions(20), 17);
        assert_eq!(spec.positions(4), 1);
        assert_eq!(spec.positions(3), 0);
        assert_eq!(spec.positions(0), 0);
    }

    #[test]
    fn test_oversized_span_has_no_positions() {
        let spec = WindowSpec::new(usize::MAX, 1, "close");
        assert!(spec.validate().is_ok());
        assert_eq!(spec.span(), None);
        assert_eq!(spec.positions(20), 0);
        assert_eq!(spec.positions(usize::MAX), 0);

        let spec = WindowSpec::new(usize::MAX - 1, 1, "close");
        assert_eq!(spec.positions(usize::MAX), 1);
    }

    #[test]
    fn test_validate() {
        assert!(WindowSpec::default().validate().is_ok());
        assert!(WindowSpec::new(0, 1, "close").validate().is_err());
        assert!(WindowSpec::new(3, 0, "close").validate().is_err());
        assert!(WindowSpec::new(3, 1, "close")
            .with_batch_size(0)
            .validate()
            .is_err());
        assert!(WindowSpec::new(3, 1, "").validate().is_err());
    }

    #[test]
    fn test_empty_filter_is_inactive() {
        let spec = WindowSpec::default().with_filter_cols(vec![]);
        assert!(spec.active_filter().is_none());

        let spec = spec.with_filter_cols(vec!["close".to_string()]);
        assert_eq!(spec.active_filter().map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_serde_defaults() {
        let spec: WindowSpec =
            serde_json::from_str(r#"{"x_window_size": 10, "y_col": "open"}"#).unwrap();
        assert_eq!(spec.x_window_size, 10);
        assert_eq!(spec.y_window_size, 1);
        assert_eq!(spec.y_col, "open");
        assert!(spec.normalize);
        assert_eq!(spec.degenerate_base, DegenerateBase::Propagate);
    }
}
