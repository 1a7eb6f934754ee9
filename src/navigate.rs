//! Read-side queries over a finished index.
//!
//! These are what a reader needs from the index: which chapter a paragraph
//! belongs to, how far into the book a position is, and word-by-word
//! stepping. They rely only on chapters being sorted by start and
//! paragraphs being contiguous.

use crate::error::{IndexError, IndexResult};
use crate::model::{BookIndex, Chapter, Paragraph};
use crate::text::tokenize;

/// A word position: paragraph id plus 0-based word index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub paragraph_id: usize,
    pub word_index: usize,
}

impl Position {
    pub fn new(paragraph_id: usize, word_index: usize) -> Self {
        Self {
            paragraph_id,
            word_index,
        }
    }
}

/// The paragraph with `paragraph_id`, or an error naming the valid range.
pub fn paragraph_at(index: &BookIndex, paragraph_id: usize) -> IndexResult<&Paragraph> {
    index
        .paragraph(paragraph_id)
        .ok_or_else(|| IndexError::PositionOutOfRange {
            paragraph_id,
            first: index.id_base(),
            last: (index.id_base() + index.paragraphs.len()).saturating_sub(1),
        })
}

/// The last chapter starting at or before `paragraph_id`; the first chapter
/// when the paragraph precedes all of them.
pub fn chapter_for_paragraph(index: &BookIndex, paragraph_id: usize) -> Option<&Chapter> {
    let first = index.chapters.first()?;
    let after = index
        .chapters
        .partition_point(|c| c.start_paragraph_id <= paragraph_id);
    Some(after.checked_sub(1).map_or(first, |i| &index.chapters[i]))
}

/// Rounded percentage (0..=100) of words before `position`.
pub fn percent_complete(index: &BookIndex, position: Position) -> u8 {
    if index.paragraphs.is_empty() || index.total_words == 0 {
        return 0;
    }
    let base = index.id_base();
    let target = position.paragraph_id.saturating_sub(base);

    let mut words_before = 0usize;
    for (i, paragraph) in index.paragraphs.iter().enumerate() {
        let words = tokenize(&paragraph.text).len();
        if i < target {
            words_before += words;
        } else {
            if i == target {
                words_before += position.word_index.min(words);
            }
            break;
        }
    }

    let percent = words_before as f64 / index.total_words as f64 * 100.0;
    percent.round().clamp(0.0, 100.0) as u8
}

/// The token at `position`, if it exists.
pub fn word_at(index: &BookIndex, position: Position) -> Option<&str> {
    let paragraph = index.paragraph(position.paragraph_id)?;
    tokenize(&paragraph.text).get(position.word_index).copied()
}

/// The position after `position`, skipping paragraphs without words.
pub fn next_position(index: &BookIndex, position: Position) -> Option<Position> {
    let paragraph = index.paragraph(position.paragraph_id)?;
    if position.word_index + 1 < tokenize(&paragraph.text).len() {
        return Some(Position::new(position.paragraph_id, position.word_index + 1));
    }

    let base = index.id_base();
    let start = position.paragraph_id - base + 1;
    index.paragraphs[start.min(index.paragraphs.len())..]
        .iter()
        .find(|p| !tokenize(&p.text).is_empty())
        .map(|p| Position::new(p.id, 0))
}
