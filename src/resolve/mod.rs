//! Chapter resolution: reconcile extracted paragraphs with the TOC.
//!
//! Documents are fed in flow order. For each one the resolver tries, in
//! order:
//!
//! 1. **Anchors**: a paragraph carrying an anchor the TOC points at starts
//!    that chapter (several chapters per document are possible).
//! 2. **Document level**: internal id, then path, then the document's first
//!    meaningful heading; the chapter starts at the document's first
//!    paragraph.
//!
//! When the whole book has been seen and too few chapters resolved relative
//! to the TOC size, everything is discarded and TOC titles are matched
//! against paragraph text instead ([`fuzzy`]). If still nothing resolves, a
//! single chapter covers the whole book.

pub mod fuzzy;
pub mod strategy;

use std::collections::HashSet;

use crate::config::IndexConfig;
use crate::text::normalize_for_comparison;
use crate::toc::TocIndex;

pub use strategy::{DocumentView, MatchSource, ResolveContext};

/// A chapter boundary before final indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterStart {
    pub title: String,
    /// Global 0-based paragraph position.
    pub paragraph: usize,
}

/// A chapter in its final position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChapter {
    /// 0-based, contiguous.
    pub index: usize,
    pub title: String,
    /// Global 0-based paragraph position.
    pub paragraph: usize,
}

/// Comparison keys of chapter titles already emitted.
#[derive(Debug, Clone, Default)]
pub struct SeenTitles {
    keys: HashSet<String>,
}

impl SeenTitles {
    /// Record a title. Returns `false` if an equivalent title was already seen.
    pub fn insert(&mut self, title: &str) -> bool {
        self.keys.insert(normalize_for_comparison(title))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.keys.contains(&normalize_for_comparison(title))
    }
}

/// What the per-document pass found for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentMatch {
    /// No new chapter starts in this document.
    NoMatch,
    /// This many chapters start at anchored paragraphs.
    Anchored(usize),
    /// One chapter starts at the document's first paragraph.
    DocumentLevel(MatchSource),
}

/// Which tier produced the final chapter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    /// Anchor and document-level matches.
    Incremental,
    /// Whole-book text matching against TOC titles.
    FuzzyFallback,
    /// Nothing resolved; one chapter spans the book.
    WholeBook,
    /// No paragraphs at all.
    Empty,
}

impl ResolutionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incremental => "incremental",
            Self::FuzzyFallback => "fuzzy-fallback",
            Self::WholeBook => "whole-book",
            Self::Empty => "empty",
        }
    }
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final chapter list plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Sorted by paragraph, indices contiguous from 0.
    pub chapters: Vec<ResolvedChapter>,
    pub tier: ResolutionTier,
}

/// Incremental chapter resolver for one run.
#[derive(Debug)]
pub struct ChapterResolver<'a> {
    ctx: ResolveContext<'a>,
    seen: SeenTitles,
    chapters: Vec<ChapterStart>,
}

impl<'a> ChapterResolver<'a> {
    pub fn new(toc: &'a TocIndex, config: &'a IndexConfig) -> Self {
        Self {
            ctx: ResolveContext::new(toc, config),
            seen: SeenTitles::default(),
            chapters: Vec::new(),
        }
    }

    /// Chapters resolved so far by the per-document pass.
    pub fn found(&self) -> usize {
        self.chapters.len()
    }

    /// Resolve chapter starts inside one document. Documents must be fed in
    /// flow order with increasing `first_paragraph`.
    pub fn resolve_document(&mut self, doc: &DocumentView<'_>) -> DocumentMatch {
        let anchored = self.match_anchors(doc);
        if anchored > 0 {
            return DocumentMatch::Anchored(anchored);
        }
        if doc.content.units.is_empty() {
            return DocumentMatch::NoMatch;
        }

        for (source, propose) in strategy::DOCUMENT_STRATEGIES {
            let Some(title) = propose(doc, &self.ctx) else {
                continue;
            };
            if self.ctx.ignored.contains(&title) || !self.seen.insert(&title) {
                tracing::debug!(document = doc.id, %title, %source, "title rejected");
                continue;
            }
            tracing::debug!(document = doc.id, %title, %source, "chapter starts at document");
            self.chapters.push(ChapterStart {
                title,
                paragraph: doc.first_paragraph,
            });
            return DocumentMatch::DocumentLevel(source);
        }

        DocumentMatch::NoMatch
    }

    /// Tier 1: at most one chapter per paragraph, first unseen anchor title wins.
    fn match_anchors(&mut self, doc: &DocumentView<'_>) -> usize {
        let mut matched = 0;
        for (offset, unit) in doc.content.units.iter().enumerate() {
            let candidates = strategy::anchor_titles(&self.ctx, doc, unit);
            let Some(title) = candidates.into_iter().find(|t| !self.seen.contains(t)) else {
                continue;
            };
            let title = title.to_string();
            self.seen.insert(&title);
            tracing::debug!(
                document = doc.id,
                %title,
                paragraph = doc.first_paragraph + offset,
                "chapter starts at anchor"
            );
            self.chapters.push(ChapterStart {
                title,
                paragraph: doc.first_paragraph + offset,
            });
            matched += 1;
        }
        matched
    }

    /// Whether the per-document pass resolved too few chapters for the TOC.
    fn needs_fallback(&self) -> bool {
        let expected = self.ctx.toc.expected_entries();
        let config = self.ctx.config;
        expected > config.fallback_min_entries
            && (self.chapters.len() as f64) < expected as f64 * config.fallback_ratio
    }

    /// Apply the global fallbacks and assign final indices.
    ///
    /// `paragraphs` is the text of every extracted paragraph in global order.
    pub fn finish(self, paragraphs: &[String]) -> Resolution {
        let config = self.ctx.config;
        let mut tier = ResolutionTier::Incremental;
        let mut chapters = if self.needs_fallback() {
            tracing::info!(
                found = self.chapters.len(),
                expected = self.ctx.toc.expected_entries(),
                "too few chapters resolved, matching TOC titles against text"
            );
            tier = ResolutionTier::FuzzyFallback;
            fuzzy::match_entries(self.ctx.toc.entries(), paragraphs, config.fuzzy_length_slack)
        } else {
            self.chapters
        };

        if chapters.is_empty() {
            if paragraphs.is_empty() {
                tier = ResolutionTier::Empty;
            } else {
                tier = ResolutionTier::WholeBook;
                chapters.push(ChapterStart {
                    title: config.whole_book_title.clone(),
                    paragraph: 0,
                });
            }
        }

        let chapters = chapters
            .into_iter()
            .enumerate()
            .map(|(index, c)| ResolvedChapter {
                index,
                title: c.title,
                paragraph: c.paragraph,
            })
            .collect();

        Resolution { chapters, tier }
    }
}
