//! Indexing pipeline.
//!
//! Orchestrates: TOC index → per-document extraction and chapter resolution
//! (in flow order) → global fallbacks → assembly.

use crate::assemble::{BookHeader, assemble};
use crate::config::IndexConfig;
use crate::container::Container;
use crate::error::IndexResult;
use crate::extract::ContentExtractor;
use crate::model::BookIndex;
use crate::resolve::{ChapterResolver, DocumentView, ResolutionTier};
use crate::toc::TocIndex;

/// Counts describing one run, for the summary log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Content documents declared in the flow.
    pub documents: usize,
    /// Documents skipped because they could not be read or held no text.
    pub skipped_documents: usize,
    /// TOC entries with a usable title.
    pub toc_entries: usize,
    pub paragraphs: usize,
    pub chapters: usize,
    pub tier: ResolutionTier,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub index: BookIndex,
    pub report: BuildReport,
}

/// Build the paragraph/chapter index of a container.
///
/// Only an invalid configuration fails here; unreadable or empty documents
/// are skipped, and a book without any resolvable TOC entry still gets a
/// single whole-book chapter.
pub fn build_index<C: Container + ?Sized>(
    container: &mut C,
    book_id: &str,
    config: &IndexConfig,
) -> IndexResult<BuildOutcome> {
    config.validate()?;

    let toc = TocIndex::build(container.toc());
    let extractor = ContentExtractor::new(config.min_paragraph_chars);
    let mut resolver = ChapterResolver::new(&toc, config);

    let flow = container.flow().to_vec();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for (position, item) in flow.iter().enumerate() {
        let markup = match container.read(position) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!(document = %item.id, error = %e, "skipping unreadable document");
                skipped += 1;
                continue;
            }
        };

        let content = extractor.extract(&markup);
        if content.is_empty() {
            tracing::debug!(document = %item.id, "skipping document without text");
            skipped += 1;
            continue;
        }

        let view = DocumentView {
            id: &item.id,
            path: item.path.as_deref(),
            first_paragraph: paragraphs.len(),
            content: &content,
        };
        let matched = resolver.resolve_document(&view);
        tracing::debug!(
            document = %item.id,
            units = content.units.len(),
            anchors = content.anchor_count(),
            ?matched,
            "document processed"
        );

        paragraphs.extend(content.units.into_iter().map(|u| u.text));
    }

    let resolution = resolver.finish(&paragraphs);

    let metadata = container.metadata();
    let header = BookHeader {
        id: book_id.to_string(),
        title: metadata
            .title
            .clone()
            .or_else(|| config.default_title.clone())
            .unwrap_or_else(|| book_id.to_string()),
        author: metadata.author.clone().or_else(|| config.default_author.clone()),
    };

    let report = BuildReport {
        documents: flow.len(),
        skipped_documents: skipped,
        toc_entries: toc.expected_entries(),
        paragraphs: paragraphs.len(),
        chapters: resolution.chapters.len(),
        tier: resolution.tier,
    };

    let index = assemble(header, paragraphs, &resolution.chapters, config.id_base());

    tracing::info!(
        paragraphs = report.paragraphs,
        chapters = report.chapters,
        toc_entries = report.toc_entries,
        skipped = report.skipped_documents,
        tier = %report.tier,
        words = index.total_words,
        "book indexed"
    );

    Ok(BuildOutcome { index, report })
}
