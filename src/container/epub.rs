//! EPUB container backed by the `epub` crate.
//!
//! Spine items become flow items; the NCX/nav tree becomes the TOC. The
//! content documents themselves are handed out raw and parsed later by the
//! extractor.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use ::epub::doc::{EpubDoc, NavPoint};

use crate::container::Container;
use crate::error::{IndexError, IndexResult};
use crate::model::{BookMetadata, FlowItem, NavNode};
use crate::text::normalize_path;

/// An opened EPUB package.
pub struct EpubContainer<R: Read + Seek> {
    doc: EpubDoc<R>,
    metadata: BookMetadata,
    flow: Vec<FlowItem>,
    toc: Vec<NavNode>,
}

impl EpubContainer<BufReader<File>> {
    /// Open an `.epub` file. Failure here is fatal for the run.
    pub fn open(path: &Path) -> IndexResult<Self> {
        let doc = EpubDoc::new(path).map_err(|e| IndexError::ContainerOpen {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }
}

impl EpubContainer<Cursor<Vec<u8>>> {
    /// Open an EPUB held in memory.
    pub fn from_bytes(data: Vec<u8>) -> IndexResult<Self> {
        let doc = EpubDoc::from_reader(Cursor::new(data)).map_err(|e| {
            IndexError::ContainerOpen {
                path: "(memory)".into(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::from_doc(doc))
    }
}

impl<R: Read + Seek> EpubContainer<R> {
    fn from_doc(mut doc: EpubDoc<R>) -> Self {
        let metadata = extract_metadata(&doc);
        let toc: Vec<NavNode> = doc.toc.iter().map(nav_node).collect();

        let mut flow = Vec::new();
        for position in 0..doc.get_num_chapters() {
            if !doc.set_current_chapter(position) {
                continue;
            }
            let id = doc
                .get_current_id()
                .unwrap_or_else(|| format!("spine-{position}"));
            let path = doc
                .get_current_path()
                .map(|p| p.to_string_lossy().replace('\\', "/"));
            let title = path.as_deref().and_then(|p| toc_title_for(&toc, p));
            flow.push(FlowItem { id, path, title });
        }

        tracing::debug!(
            documents = flow.len(),
            toc_roots = toc.len(),
            title = metadata.title.as_deref().unwrap_or("(untitled)"),
            "opened epub"
        );

        Self {
            doc,
            metadata,
            flow,
            toc,
        }
    }
}

impl<R: Read + Seek> Container for EpubContainer<R> {
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
        let id = self
            .flow
            .get(position)
            .map(|item| item.id.clone())
            .unwrap_or_else(|| format!("spine-{position}"));
        if !self.doc.set_current_chapter(position) {
            return Err(IndexError::DocumentRead {
                id,
                message: "spine position out of range".into(),
            });
        }
        match self.doc.get_current_str() {
            Some((content, _mime)) => Ok(content),
            None => Err(IndexError::DocumentRead {
                id,
                message: "resource missing or not valid UTF-8".into(),
            }),
        }
    }
}

fn extract_metadata<R: Read + Seek>(doc: &EpubDoc<R>) -> BookMetadata {
    BookMetadata {
        title: doc.mdata("title").map(|m| m.value.clone()),
        author: doc.mdata("creator").map(|m| m.value.clone()),
        language: doc.mdata("language").map(|m| m.value.clone()),
    }
}

fn nav_node(point: &NavPoint) -> NavNode {
    NavNode {
        title: point.label.clone(),
        href: Some(point.content.to_string_lossy().replace('\\', "/")),
        id: None,
        children: point.children.iter().map(nav_node).collect(),
    }
}

/// Title of the first TOC node (pre-order) pointing at the document `path`.
fn toc_title_for(nodes: &[NavNode], path: &str) -> Option<String> {
    let wanted = normalize_path(path);
    nodes.iter().find_map(|node| {
        let target = node.href.as_deref().and_then(|h| h.split('#').next());
        if target.is_some_and(|t| normalize_path(t) == wanted) && !node.title.trim().is_empty() {
            return Some(node.title.trim().to_string());
        }
        toc_title_for(&node.children, path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_epub_bytes_are_rejected() {
        let result = EpubContainer::from_bytes(b"This is not an EPUB".to_vec());
        assert!(matches!(result, Err(IndexError::ContainerOpen { .. })));
    }

    #[test]
    fn toc_titles_found_by_normalized_path() {
        let toc = vec![NavNode::link("Part", "OEBPS/part.xhtml").with_children(vec![
            NavNode::link("One", "OEBPS/one.xhtml#start"),
        ])];
        assert_eq!(toc_title_for(&toc, "OEBPS/one.xhtml").as_deref(), Some("One"));
        assert_eq!(toc_title_for(&toc, "part.xhtml").as_deref(), Some("Part"));
        assert_eq!(toc_title_for(&toc, "two.xhtml"), None);
    }
}
