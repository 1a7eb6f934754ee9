//! Core data types: the serialized book index and its parts.
//!
//! Field names serialize in camelCase because the index is consumed by a
//! JavaScript reading application.

use serde::{Deserialize, Serialize};

/// One paragraph of the flattened book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Global sequential id (array position plus the run's id base).
    pub id: usize,
    /// Whitespace-normalized, non-empty text.
    pub text: String,
    /// Index of the chapter this paragraph belongs to.
    pub chapter_index: usize,
}

/// A chapter boundary pointing into the paragraph list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Position in the chapter list (0-based, contiguous).
    pub index: usize,
    /// Title as declared by the author.
    pub title: String,
    /// Id of the first paragraph of this chapter.
    pub start_paragraph_id: usize,
}

/// The serialized output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookIndex {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub paragraphs: Vec<Paragraph>,
    pub chapters: Vec<Chapter>,
    pub total_words: usize,
}

impl BookIndex {
    /// Id of the first paragraph (0 or 1 depending on how the index was built).
    pub fn id_base(&self) -> usize {
        self.paragraphs.first().map(|p| p.id).unwrap_or(0)
    }

    /// Look up a paragraph by id.
    pub fn paragraph(&self, id: usize) -> Option<&Paragraph> {
        id.checked_sub(self.id_base())
            .and_then(|pos| self.paragraphs.get(pos))
    }
}

/// Top-level metadata of a container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
}

/// One content document in flow order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowItem {
    /// Manifest identifier of the document.
    pub id: String,
    /// Path of the document inside the container, if known.
    pub path: Option<String>,
    /// Title the container declares for this document, if any.
    pub title: Option<String>,
}

/// A node of the author-declared table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavNode {
    pub title: String,
    /// `path` or `path#anchor`.
    pub href: Option<String>,
    /// Internal identifier of the target document.
    pub id: Option<String>,
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// A leaf entry pointing at `href`.
    pub fn link(title: &str, href: &str) -> Self {
        Self {
            title: title.to_string(),
            href: Some(href.to_string()),
            ..Default::default()
        }
    }

    /// A leaf entry pointing at a document by id.
    pub fn to_id(title: &str, id: &str) -> Self {
        Self {
            title: title.to_string(),
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    /// Attach child entries.
    pub fn with_children(mut self, children: Vec<NavNode>) -> Self {
        self.children = children;
        self
    }
}
