//! Table-of-contents indexing.
//!
//! The TOC tree is flattened once into ordered [`TocEntry`] values and three
//! read-only lookup tables keyed by normalized document path (and bare file
//! name), by `(document, anchor)` and by internal id. Values are always the
//! author's original title.

use std::collections::HashMap;

use crate::model::NavNode;
use crate::text::{file_name, normalize_path, normalize_whitespace};

/// What a TOC entry points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocTarget {
    /// A location inside a document (`file#anchor`).
    Anchored { file: String, anchor: String },
    /// The start of a document.
    Document { file: String },
    /// A document referenced by its internal id.
    Internal { id: String },
    /// Nothing resolvable; only usable for text matching.
    Untargeted,
}

/// One flattened TOC entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Trimmed, non-empty title.
    pub title: String,
    pub target: TocTarget,
    /// Pre-order position of the node in the original tree.
    pub order: usize,
}

impl TocEntry {
    /// Normalized path of the target document, if any.
    pub fn file(&self) -> Option<&str> {
        match &self.target {
            TocTarget::Anchored { file, .. } | TocTarget::Document { file } => Some(file),
            _ => None,
        }
    }

    pub fn anchor(&self) -> Option<&str> {
        match &self.target {
            TocTarget::Anchored { anchor, .. } => Some(anchor),
            _ => None,
        }
    }
}

/// Immutable lookup tables derived from the TOC.
#[derive(Debug, Clone, Default)]
pub struct TocIndex {
    entries: Vec<TocEntry>,
    by_path: HashMap<String, String>,
    by_anchor: HashMap<String, HashMap<String, String>>,
    by_id: HashMap<String, String>,
}

impl TocIndex {
    /// Flatten and index a TOC tree. Entries with blank titles are dropped,
    /// but their children are still visited.
    pub fn build(nodes: &[NavNode]) -> Self {
        let mut index = Self::default();
        let mut order = 0usize;
        for node in nodes {
            index.visit(node, &mut order);
        }
        index
    }

    fn visit(&mut self, node: &NavNode, order: &mut usize) {
        let position = *order;
        *order += 1;

        let title = normalize_whitespace(&node.title);
        if !title.is_empty() {
            let target = classify(node);
            self.insert(&target, &title);
            self.entries.push(TocEntry {
                title,
                target,
                order: position,
            });
        }

        for child in &node.children {
            self.visit(child, order);
        }
    }

    /// Register a target under every key it can be found by. The first
    /// declaration of a key wins.
    fn insert(&mut self, target: &TocTarget, title: &str) {
        match target {
            TocTarget::Anchored { file, anchor } => {
                for key in path_keys(file) {
                    self.by_anchor
                        .entry(key)
                        .or_default()
                        .entry(anchor.clone())
                        .or_insert_with(|| title.to_string());
                }
            }
            TocTarget::Document { file } => {
                for key in path_keys(file) {
                    self.by_path.entry(key).or_insert_with(|| title.to_string());
                }
            }
            TocTarget::Internal { id } => {
                self.by_id
                    .entry(id.clone())
                    .or_insert_with(|| title.to_string());
            }
            TocTarget::Untargeted => {}
        }
    }

    /// All retained entries in declaration order.
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Number of entries the TOC declares (after discarding blank titles).
    pub fn expected_entries(&self) -> usize {
        self.entries.len()
    }

    /// Title of the chapter starting at `anchor` inside the document at `path`.
    /// The bare file name is only consulted when the TOC never mentions the
    /// full normalized path, so a same-named file in another directory cannot
    /// answer for it.
    pub fn anchor_title(&self, path: &str, anchor: &str) -> Option<&str> {
        path_keys(&normalize_path(path))
            .iter()
            .find_map(|key| self.by_anchor.get(key))?
            .get(anchor)
            .map(String::as_str)
    }

    /// Title of the chapter starting at the top of the document at `path`.
    pub fn document_title(&self, path: &str) -> Option<&str> {
        path_keys(&normalize_path(path))
            .iter()
            .find_map(|key| self.by_path.get(key))
            .map(String::as_str)
    }

    /// Title of the chapter declared for the document with internal `id`.
    pub fn id_title(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }
}

fn classify(node: &NavNode) -> TocTarget {
    let href = node.href.as_deref().map(str::trim).filter(|h| !h.is_empty());
    match href {
        Some(href) => {
            let (path, fragment) = match href.split_once('#') {
                Some((path, fragment)) => (path, Some(fragment)),
                None => (href, None),
            };
            let file = normalize_path(path);
            match fragment.filter(|f| !f.is_empty()) {
                Some(anchor) => TocTarget::Anchored {
                    file,
                    anchor: anchor.to_string(),
                },
                None => TocTarget::Document { file },
            }
        }
        None => match node.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => TocTarget::Internal { id: id.to_string() },
            None => TocTarget::Untargeted,
        },
    }
}

/// Full normalized path plus the bare file name, when they differ.
fn path_keys(file: &str) -> Vec<String> {
    let name = file_name(file);
    if name == file {
        vec![file.to_string()]
    } else {
        vec![file.to_string(), name.to_string()]
    }
}
