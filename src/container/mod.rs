//! Document containers: where content documents and the TOC come from.
//!
//! The pipeline only sees the [`Container`] trait. [`EpubContainer`] reads
//! `.epub` packages through the `epub` crate; [`MemoryContainer`] holds
//! already-decoded documents (fixtures, other front ends).

pub mod epub;
pub mod memory;

use std::path::Path;

use crate::error::{IndexError, IndexResult};
use crate::model::{BookMetadata, FlowItem, NavNode};

pub use self::epub::EpubContainer;
pub use self::memory::MemoryContainer;

/// A book package: metadata, content documents in flow order, and a TOC.
pub trait Container {
    fn metadata(&self) -> &BookMetadata;

    /// Content documents in reading order.
    fn flow(&self) -> &[FlowItem];

    /// Author-declared table of contents.
    fn toc(&self) -> &[NavNode];

    /// Raw markup of the flow item at `position`.
    ///
    /// Failure is per-document: callers skip the document and carry on.
    fn read(&mut self, position: usize) -> IndexResult<String>;
}

/// Open a container file, choosing the implementation from its extension.
pub fn open(path: &Path) -> IndexResult<Box<dyn Container>> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "epub" => Ok(Box::new(EpubContainer::open(path)?)),
        other => Err(IndexError::ContainerOpen {
            path: path.display().to_string(),
            message: if other.is_empty() {
                "missing file extension, expected .epub".into()
            } else {
                format!("unsupported extension \".{other}\", expected .epub")
            },
        }),
    }
}
