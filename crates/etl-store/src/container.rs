//! Directory of named, growable `.npy` arrays.
//!
//! Layout:
//!
//! ```text
//! <path>/
//!     manifest.json    element type, row shape and row count of every array
//!     <name>.npy       one per array, rows flattened in order
//! ```
//!
//! Rows are streamed into one-dimensional `.npy` files as they are appended;
//! the header length is fixed up by `npyz` when the array is finished. The
//! manifest is written last and is what restores each array's row shape. A
//! directory without a manifest was never closed and is rejected on open.
//!
//! The writer builds into `<path>.tmp` and renames it over `path` on close, so
//! the final name only ever refers to a complete container.

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use etl_core::{
    error::{EtlError, Result},
    num::EtlFloat,
};
use log::{debug, info, warn};
use npyz::WriterBuilder;
use ndarray::{ArrayView, Dimension};
use npyz::{NpyFile, NpyWriter};
use serde::{Deserialize, Serialize};

const MANIFEST_FILE: &str = "manifest.json";
const MANIFEST_VERSION: u32 = 2;

/// Element types that can be streamed to and read back from `.npy` files.
pub trait NpyElement: EtlFloat + npyz::Serialize + npyz::Deserialize + npyz::AutoSerialize {}

impl<T> NpyElement for T where T: EtlFloat + npyz::Serialize + npyz::Deserialize + npyz::AutoSerialize {}

/// Description of one stored array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayMeta {
    /// Array name, also the stem of its `.npy` file.
    pub name: String,
    /// Element type tag, see [`EtlFloat::DTYPE`].
    pub dtype: String,
    /// Shape of one row; empty for a 1-D array.
    pub row_shape: Vec<usize>,
    /// Rows stored (the leading dimension).
    pub len: usize,
}

impl ArrayMeta {
    fn new(name: &str, dtype: &str, row_shape: &[usize]) -> Self {
        Self {
            name: name.to_string(),
            dtype: dtype.to_string(),
            row_shape: row_shape.to_vec(),
            len: 0,
        }
    }

    /// Elements per row.
    pub fn row_len(&self) -> usize {
        self.row_shape.iter().product()
    }

    /// Full shape, leading dimension first.
    pub fn shape(&self) -> Vec<usize> {
        std::iter::once(self.len)
            .chain(self.row_shape.iter().copied())
            .collect()
    }

    fn file_name(&self) -> String {
        format!("{}.npy", self.name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    arrays: Vec<ArrayMeta>,
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Remove whatever sits at `path`, if anything.
fn remove_path(path: &Path) -> std::io::Result<()> {
    let removed = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };
    match removed {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn find<'a>(arrays: &'a [ArrayMeta], name: &str) -> Result<&'a ArrayMeta> {
    arrays
        .iter()
        .find(|a| a.name == name)
        .ok_or_else(|| EtlError::UnknownArray(name.to_string()))
}

fn check_dtype<T: EtlFloat>(meta: &ArrayMeta) -> Result<()> {
    if meta.dtype != T::DTYPE {
        return Err(EtlError::DtypeMismatch {
            stored: meta.dtype.clone(),
            requested: T::DTYPE,
        });
    }
    Ok(())
}

// ============================================================================
// Writer
// ============================================================================

struct ArrayWriter<T: NpyElement> {
    meta: ArrayMeta,
    npy: NpyWriter<T, BufWriter<File>>,
}

/// Exclusive writer for a new container of `T` arrays.
///
/// Dropping the writer without calling [`close`](Self::close) deletes the
/// partial container.
pub struct ContainerWriter<T: NpyElement> {
    tmp_path: PathBuf,
    final_path: PathBuf,
    arrays: Vec<ArrayWriter<T>>,
    finished: bool,
}

impl<T: NpyElement> fmt::Debug for ContainerWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerWriter")
            .field("tmp_path", &self.tmp_path)
            .field("final_path", &self.final_path)
            .field("arrays", &self.arrays.iter().map(|a| &a.meta).collect::<Vec<_>>())
            .field("finished", &self.finished)
            .finish()
    }
}

impl<T: NpyElement> ContainerWriter<T> {
    /// Start a container that will be published at `path` on close.
    ///
    /// A stale `<path>.tmp` left by an interrupted run is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let final_path = path.as_ref().to_path_buf();
        let tmp_path = tmp_path(&final_path);
        remove_path(&tmp_path)?;
        fs::create_dir(&tmp_path)?;
        debug!("building container in {}", tmp_path.display());

        Ok(Self {
            tmp_path,
            final_path,
            arrays: Vec::new(),
            finished: false,
        })
    }

    /// Path the container is published at.
    pub fn path(&self) -> &Path {
        &self.final_path
    }

    /// Declare an empty array with a fixed per-row shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or cannot be used as a file
    /// stem, or the array file cannot be created.
    pub fn create_array(&mut self, name: &str, row_shape: &[usize]) -> Result<()> {
        let usable = !name.is_empty()
            && name != "manifest"
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !usable || self.arrays.iter().any(|a| a.meta.name == name) {
            return Err(EtlError::InvalidParameter {
                name: "array",
                value: name.to_string(),
                expected: "a new name made of ASCII letters, digits, '_' or '-'",
            });
        }

        let meta = ArrayMeta::new(name, T::DTYPE, row_shape);
        let file = File::create(self.tmp_path.join(meta.file_name()))?;
        let npy = npyz::WriteOptions::new()
            .dtype(T::default_dtype())
            .writer(BufWriter::new(file))
            .begin_1d()?;
        self.arrays.push(ArrayWriter { meta, npy });
        Ok(())
    }

    /// Metadata of a declared array.
    ///
    /// # Errors
    ///
    /// Returns an error if no array has this name.
    pub fn array(&self, name: &str) -> Result<&ArrayMeta> {
        self.arrays
            .iter()
            .map(|a| &a.meta)
            .find(|m| m.name == name)
            .ok_or_else(|| EtlError::UnknownArray(name.to_string()))
    }

    /// Grow `name` by the rows of `data` (its leading axis) and return the new
    /// row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is unknown, the trailing dimensions of
    /// `data` differ from the array's row shape, or the write fails.
    pub fn append<D: Dimension>(&mut self, name: &str, data: ArrayView<'_, T, D>) -> Result<usize> {
        let array = self
            .arrays
            .iter_mut()
            .find(|a| a.meta.name == name)
            .ok_or_else(|| EtlError::UnknownArray(name.to_string()))?;

        let shape = data.shape();
        if shape.is_empty() || shape[1..] != array.meta.row_shape[..] {
            return Err(EtlError::ShapeMismatch {
                expected: std::iter::once(shape.first().copied().unwrap_or(0))
                    .chain(array.meta.row_shape.iter().copied())
                    .collect(),
                actual: shape.to_vec(),
            });
        }

        // logical order is row-major whatever the memory layout
        array.npy.extend(data.iter().copied())?;
        array.meta.len += shape[0];
        Ok(array.meta.len)
    }

    /// Finish every array, write the manifest and publish the container under
    /// its final name, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error if finishing, writing or renaming fails. The partial
    /// container is removed in that case.
    pub fn close(mut self) -> Result<PathBuf> {
        let mut metas = Vec::with_capacity(self.arrays.len());
        for ArrayWriter { meta, npy } in std::mem::take(&mut self.arrays) {
            npy.finish()?;
            metas.push(meta);
        }

        let manifest = Manifest {
            version: MANIFEST_VERSION,
            arrays: metas,
        };
        let mut file = BufWriter::new(File::create(self.tmp_path.join(MANIFEST_FILE))?);
        serde_json::to_writer_pretty(&mut file, &manifest)?;
        file.flush()?;
        file.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        remove_path(&self.final_path)?;
        fs::rename(&self.tmp_path, &self.final_path)?;
        self.finished = true;

        info!(
            "container written to {} ({} arrays)",
            self.final_path.display(),
            manifest.arrays.len()
        );
        Ok(self.final_path.clone())
    }
}

impl<T: NpyElement> Drop for ContainerWriter<T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.arrays.clear();
        match remove_path(&self.tmp_path) {
            Ok(()) => debug!("discarded unfinished container {}", self.tmp_path.display()),
            Err(e) => warn!(
                "could not remove unfinished container {}: {e}",
                self.tmp_path.display()
            ),
        }
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Read-only view of a closed container.
#[derive(Debug)]
pub struct ContainerReader {
    path: PathBuf,
    arrays: Vec<ArrayMeta>,
}

impl ContainerReader {
    /// Open a closed container.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Format`] if `path` is not a container or was never
    /// closed, and [`EtlError::Io`] or [`EtlError::Json`] if its manifest
    /// cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let manifest_path = path.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(EtlError::format(format!(
                "{} is not a closed container",
                path.display()
            )));
        }

        let manifest: Manifest =
            serde_json::from_reader(BufReader::new(File::open(&manifest_path)?))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(EtlError::format(format!(
                "unsupported manifest version {}",
                manifest.version
            )));
        }

        info!(
            "opened container {} ({} arrays)",
            path.display(),
            manifest.arrays.len()
        );
        Ok(Self {
            path,
            arrays: manifest.arrays,
        })
    }

    /// Path of the open container.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored arrays.
    pub fn arrays(&self) -> &[ArrayMeta] {
        &self.arrays
    }

    /// Metadata of one array.
    ///
    /// # Errors
    ///
    /// Returns an error if no array has this name.
    pub fn array(&self, name: &str) -> Result<&ArrayMeta> {
        find(&self.arrays, name)
    }

    /// Load every row of `name` as a flat, row-major vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is unknown, its element type is not `T`,
    /// or its file disagrees with the manifest.
    pub fn read<T: NpyElement>(&self, name: &str) -> Result<Vec<T>> {
        let meta = self.array(name)?;
        check_dtype::<T>(meta)?;

        let file = File::open(self.path.join(meta.file_name()))?;
        let npy = NpyFile::new(BufReader::new(file))?;
        let expected = (meta.len * meta.row_len()) as u64;
        if npy.shape() != &[expected] {
            return Err(EtlError::format(format!(
                "'{}' holds {:?} elements, the manifest records {expected}",
                meta.name,
                npy.shape()
            )));
        }
        Ok(npy.into_vec::<T>()?)
    }
}
