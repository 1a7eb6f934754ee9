//! Whole-book text matching of TOC titles against paragraphs.
//!
//! Used when the per-document pass resolved too few chapters. Every
//! comparison is done on comparison keys (case- and diacritic-folded).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::resolve::{ChapterStart, SeenTitles};
use crate::text::normalize_for_comparison;
use crate::toc::TocEntry;

/// `"<number>. <rest>"` titles, e.g. "3. The Silver Sword".
static NUMBERED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*(.+)$").expect("valid numbered title pattern"));

/// Words that prefix a chapter number in headings, in comparison-key form.
const CHAPTER_WORDS: &[&str] = &[
    "chapter", "capitulo", "chapitre", "kapitel", "capitolo", "rozdzial", "rozdział", "hoofdstuk",
];

/// Whether paragraph key `para` plausibly is the heading for title key `title`.
pub fn title_matches(title: &str, para: &str, slack: usize) -> bool {
    if title.is_empty() || para.is_empty() {
        return false;
    }
    if para == title {
        return true;
    }
    if let Some(rest) = para.strip_prefix(title) {
        if rest.starts_with(' ') || rest == "." || rest == "," {
            return true;
        }
    }

    let title_len = title.chars().count();
    let para_len = para.chars().count();
    if para_len.abs_diff(title_len) <= slack && para.contains(title) {
        return true;
    }

    if let Some(caps) = NUMBERED_TITLE.captures(title) {
        let number = &caps[1];
        let remainder = caps[2].trim();
        if para == number || para == remainder {
            return true;
        }
        return CHAPTER_WORDS
            .iter()
            .any(|word| para.strip_prefix(word).and_then(|r| r.strip_prefix(' ')) == Some(number));
    }

    false
}

/// Match every TOC entry, in declaration order, against all paragraphs.
///
/// The first matching paragraph wins for each entry. Entries whose title was
/// already emitted, or whose match starts another chapter, are dropped. The
/// result is ordered by paragraph position.
pub fn match_entries(
    entries: &[TocEntry],
    paragraphs: &[String],
    slack: usize,
) -> Vec<ChapterStart> {
    let keys: Vec<String> = paragraphs
        .iter()
        .map(|p| normalize_for_comparison(p))
        .collect();

    let mut seen = SeenTitles::default();
    let mut claimed = HashSet::new();
    let mut found = Vec::new();

    for entry in entries {
        let title_key = normalize_for_comparison(&entry.title);
        if seen.contains(&entry.title) {
            continue;
        }
        let Some(position) = keys
            .iter()
            .position(|para| title_matches(&title_key, para, slack))
        else {
            tracing::debug!(title = %entry.title, "fuzzy: no paragraph matches entry");
            continue;
        };
        if !claimed.insert(position) {
            tracing::debug!(title = %entry.title, position, "fuzzy: paragraph already claimed");
            continue;
        }
        seen.insert(&entry.title);
        found.push(ChapterStart {
            title: entry.title.clone(),
            paragraph: position,
        });
    }

    found.sort_by_key(|c| c.paragraph);
    found
}
