//! Output assembly: the final paragraph and chapter arrays.
//!
//! Paragraph ids are array positions shifted by the run's id base, and
//! chapter starts use the same base, so downstream consumers can index
//! either way consistently.

use std::path::Path;

use crate::error::{IndexError, IndexResult};
use crate::model::{BookIndex, Chapter, Paragraph};
use crate::resolve::ResolvedChapter;
use crate::text::word_count;

/// Book-level fields of the output record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookHeader {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
}

/// Build the output record from paragraph texts in global order and the
/// resolved chapters (0-based positions, sorted).
pub fn assemble(
    header: BookHeader,
    paragraphs: Vec<String>,
    chapters: &[ResolvedChapter],
    id_base: usize,
) -> BookIndex {
    let mut total_words = 0usize;
    let mut current = 0usize;

    let paragraphs: Vec<Paragraph> = paragraphs
        .into_iter()
        .enumerate()
        .map(|(position, text)| {
            while current + 1 < chapters.len() && chapters[current + 1].paragraph <= position {
                current += 1;
            }
            total_words += word_count(&text);
            Paragraph {
                id: position + id_base,
                text,
                chapter_index: current,
            }
        })
        .collect();

    let chapters = chapters
        .iter()
        .map(|c| Chapter {
            index: c.index,
            title: c.title.clone(),
            start_paragraph_id: c.paragraph + id_base,
        })
        .collect();

    BookIndex {
        id: header.id,
        title: header.title,
        author: header.author,
        paragraphs,
        chapters,
        total_words,
    }
}

/// Serialize the index as JSON to `path`, creating parent directories.
pub fn write_index(index: &BookIndex, path: &Path, pretty: bool) -> IndexResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(index)
    } else {
        serde_json::to_string(index)
    }
    .map_err(|e| IndexError::Serialize {
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IndexError::OutputWrite {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, json).map_err(|e| IndexError::OutputWrite {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load an index previously written by [`write_index`].
pub fn read_index(path: &Path) -> IndexResult<BookIndex> {
    let data = std::fs::read_to_string(path).map_err(|e| IndexError::IndexRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&data).map_err(|e| IndexError::IndexRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
