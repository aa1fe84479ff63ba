//! Error types for windowing, normalization and dataset persistence.
//!
//! Every crate in the workspace reports failures through [`EtlError`], with
//! full error chaining support via `thiserror`.

use thiserror::Error;

/// Result type alias used throughout the workspace.
pub type Result<T> = core::result::Result<T, EtlError>;

/// Errors that can occur while building or replaying a windowed dataset.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Required column not found in the table.
    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    /// Invalid window size parameter.
    #[error("Invalid window size '{name}': {value} (must be > 0)")]
    InvalidWindow {
        /// Name of the window parameter.
        name: &'static str,
        /// Provided value.
        value: usize,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {value} (expected {expected})")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Provided value as string.
        value: String,
        /// Description of expected value.
        expected: &'static str,
    },

    /// The batch sequence produced nothing to persist.
    #[error("Empty input: no complete batch to write to '{destination}'")]
    EmptyInput {
        /// Dataset path that was not written.
        destination: String,
    },

    /// A normalization base cell is zero.
    #[error("Degenerate normalization base at row {row}, column '{column}'")]
    DegenerateBase {
        /// Source row of the base.
        row: usize,
        /// Column holding the zero cell.
        column: String,
    },

    /// Series length mismatch.
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Array shape mismatch.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// The `x` and `y` arrays disagree on their row count.
    #[error("Dataset misaligned: x has {x_rows} rows, y has {y_rows}")]
    Misaligned {
        /// Rows stored in `x`.
        x_rows: usize,
        /// Rows stored in `y`.
        y_rows: usize,
    },

    /// Named array not present in the container.
    #[error("Unknown array: '{0}'")]
    UnknownArray(String),

    /// Stored element type does not match the requested one.
    #[error("Dtype mismatch: container holds {stored}, requested {requested}")]
    DtypeMismatch {
        /// Element type in the container.
        stored: String,
        /// Element type requested by the caller.
        requested: &'static str,
    },

    /// A cell could not be parsed as a number.
    #[error("Cannot parse '{value}' in column '{column}' at row {row}")]
    Parse {
        /// Data row (0-based, header excluded).
        row: usize,
        /// Column name.
        column: String,
        /// Raw cell text.
        value: String,
    },

    /// Corrupt, truncated or unfinalized container.
    #[error("Invalid container format: {context}")]
    Format {
        /// What was wrong.
        context: String,
    },

    /// Underlying I/O failure.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// CSV reader failure.
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl EtlError {
    /// Create a format error with context.
    #[must_use]
    pub fn format(context: impl Into<String>) -> Self {
        Self::Format {
            context: context.into(),
        }
    }

    /// Returns `true` for errors caused by the configuration rather than the data.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn(_) | Self::InvalidWindow { .. } | Self::InvalidParameter { .. }
        )
    }
}
