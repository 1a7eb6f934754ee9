//! In-memory container for books whose documents are already decoded.

use crate::container::Container;
use crate::error::{IndexError, IndexResult};
use crate::model::{BookMetadata, FlowItem, NavNode};

/// A container assembled in memory, document by document.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    metadata: BookMetadata,
    flow: Vec<FlowItem>,
    /// Markup per flow item; `None` marks an unreadable document.
    markup: Vec<Option<String>>,
    toc: Vec<NavNode>,
}

impl MemoryContainer {
    pub fn new(title: &str) -> Self {
        Self {
            metadata: BookMetadata {
                title: Some(title.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn author(mut self, author: &str) -> Self {
        self.metadata.author = Some(author.to_string());
        self
    }

    /// Append a content document in flow order.
    pub fn document(mut self, id: &str, path: &str, markup: &str) -> Self {
        self.flow.push(FlowItem {
            id: id.to_string(),
            path: Some(path.to_string()),
            title: None,
        });
        self.markup.push(Some(markup.to_string()));
        self
    }

    /// Append a flow item with a declared title.
    pub fn titled_document(mut self, id: &str, path: &str, title: &str, markup: &str) -> Self {
        self = self.document(id, path, markup);
        if let Some(item) = self.flow.last_mut() {
            item.title = Some(title.to_string());
        }
        self
    }

    /// Append a flow item whose content cannot be read.
    pub fn unreadable(mut self, id: &str, path: &str) -> Self {
        self.flow.push(FlowItem {
            id: id.to_string(),
            path: Some(path.to_string()),
            title: None,
        });
        self.markup.push(None);
        self
    }

    pub fn toc(mut self, nodes: Vec<NavNode>) -> Self {
        self.toc = nodes;
        self
    }
}

impl Container for MemoryContainer {
    fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    fn flow(&self) -> &[FlowItem] {
        &self.flow
    }

    fn toc(&self) -> &[NavNode] {
        &self.toc
    }

    fn read(&mut self, position: usize) -> IndexResult<String> {
        match self.markup.get(position) {
            Some(Some(markup)) => Ok(markup.clone()),
            Some(None) => Err(IndexError::DocumentRead {
                id: self.flow[position].id.clone(),
                message: "document is unreadable".into(),
            }),
            None => Err(IndexError::DocumentRead {
                id: format!("#{position}"),
                message: "no document at this position".into(),
            }),
        }
    }
}
