//! Pipeline configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use etl_core::error::{EtlError, Result};
use etl_windows::WindowSpec;
use serde::{Deserialize, Serialize};

/// Everything needed to build and replay one dataset.
///
/// Window options are flattened, so a JSON config reads as one flat object:
///
/// ```rust
/// use bar_etl::EtlConfig;
///
/// let config: EtlConfig = serde_json::from_str(r#"{
///     "filename_in": "bars.csv",
///     "filename_out": "bars.etl",
///     "batch_size": 100,
///     "x_window_size": 50,
///     "y_window_size": 1,
///     "y_col": "close",
///     "filter_cols": ["open", "high", "low", "close", "volume"],
///     "normalize": true
/// }"#).unwrap();
///
/// assert_eq!(config.window.x_window_size, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Source CSV file.
    pub filename_in: PathBuf,
    /// Dataset file to create.
    pub filename_out: PathBuf,
    /// Windowing and batching options.
    #[serde(flatten)]
    pub window: WindowSpec,
}

impl EtlConfig {
    /// Create a configuration.
    pub fn new(
        filename_in: impl Into<PathBuf>,
        filename_out: impl Into<PathBuf>,
        window: WindowSpec,
    ) -> Self {
        Self {
            filename_in: filename_in.into(),
            filename_out: filename_out.into(),
            window,
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Check the file names and window options.
    ///
    /// # Errors
    ///
    /// Returns an error if a file name is empty or the window options are invalid.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("filename_in", &self.filename_in),
            ("filename_out", &self.filename_out),
        ] {
            if path.as_os_str().is_empty() {
                return Err(EtlError::InvalidParameter {
                    name,
                    value: String::new(),
                    expected: "a file path",
                });
            }
        }
        self.window.validate()
    }
}
