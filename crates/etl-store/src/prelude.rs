//! Prelude for etl-store.

pub use crate::container::NpyElement;
pub use crate::reader::{BatchCursor, DatasetReader};
pub use crate::writer::{DatasetWriter, WriteSummary};
