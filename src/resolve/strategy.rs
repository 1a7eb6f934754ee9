//! Chapter-matching strategies.
//!
//! Each strategy is a pure function of one document and the shared
//! read-only context. The resolver decides what to do with the titles they
//! propose (deduplication, ordering, fallbacks).

use std::collections::HashSet;

use crate::config::IndexConfig;
use crate::extract::{ExtractedDocument, ExtractedUnit};
use crate::text::normalize_for_comparison;
use crate::toc::TocIndex;

/// Heading texts that never name a chapter (table of contents, copyright,
/// cover, title page), in comparison-key form.
const IGNORED_HEADINGS: &[&str] = &[
    // English
    "contents",
    "table of contents",
    "toc",
    "copyright",
    "copyright page",
    "cover",
    "title page",
    "title",
    // Spanish
    "indice",
    "contenido",
    "contenidos",
    "tabla de contenidos",
    "tabla de contenido",
    "derechos de autor",
    "creditos",
    "cubierta",
    "portada",
    "portadilla",
    "pagina de titulo",
    // French
    "table des matieres",
    "sommaire",
    "droits d'auteur",
    "couverture",
    "page de titre",
    // German
    "inhalt",
    "inhaltsverzeichnis",
    "impressum",
    "titelseite",
    // Italian / Portuguese
    "indice dei contenuti",
    "sumario",
    "capa",
    "copertina",
    "frontespizio",
];

/// Where a document-level title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// TOC entry referencing the document's internal id.
    InternalId,
    /// TOC entry referencing the document's path (no fragment).
    Path,
    /// First meaningful heading inside the document itself.
    Heading,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternalId => "internal-id",
            Self::Path => "path",
            Self::Heading => "heading",
        }
    }
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content document as seen by the strategies.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    /// Internal (manifest) id.
    pub id: &'a str,
    /// Path inside the container.
    pub path: Option<&'a str>,
    /// Global position of the document's first paragraph.
    pub first_paragraph: usize,
    pub content: &'a ExtractedDocument,
}

/// Comparison keys of headings that must not become chapter titles.
#[derive(Debug, Clone)]
pub struct IgnoredHeadings {
    keys: HashSet<String>,
}

impl IgnoredHeadings {
    pub fn new(extra: &[String]) -> Self {
        let keys = IGNORED_HEADINGS
            .iter()
            .map(|h| h.to_string())
            .chain(extra.iter().map(|h| normalize_for_comparison(h)))
            .collect();
        Self { keys }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.keys.contains(&normalize_for_comparison(text))
    }
}

/// Read-only inputs shared by all strategies during one run.
#[derive(Debug)]
pub struct ResolveContext<'a> {
    pub toc: &'a TocIndex,
    pub config: &'a IndexConfig,
    pub ignored: IgnoredHeadings,
}

impl<'a> ResolveContext<'a> {
    pub fn new(toc: &'a TocIndex, config: &'a IndexConfig) -> Self {
        Self {
            toc,
            config,
            ignored: IgnoredHeadings::new(&config.extra_ignored_headings),
        }
    }
}

/// Titles declared for the anchors of one paragraph, in anchor order.
pub fn anchor_titles<'c>(
    ctx: &'c ResolveContext<'_>,
    doc: &DocumentView<'_>,
    unit: &'c ExtractedUnit,
) -> Vec<&'c str> {
    let Some(path) = doc.path else {
        return Vec::new();
    };
    unit.anchors
        .iter()
        .filter_map(|anchor| ctx.toc.anchor_title(path, anchor))
        .collect()
}

/// A document-level strategy: proposes at most one title for a document.
pub type DocumentStrategy = fn(&DocumentView<'_>, &ResolveContext<'_>) -> Option<String>;

/// Document-level strategies, tried in order when no anchor matched.
pub const DOCUMENT_STRATEGIES: [(MatchSource, DocumentStrategy); 3] = [
    (MatchSource::InternalId, by_internal_id),
    (MatchSource::Path, by_path),
    (MatchSource::Heading, by_heading),
];

fn by_internal_id(doc: &DocumentView<'_>, ctx: &ResolveContext<'_>) -> Option<String> {
    ctx.toc.id_title(doc.id).map(str::to_string)
}

fn by_path(doc: &DocumentView<'_>, ctx: &ResolveContext<'_>) -> Option<String> {
    ctx.toc.document_title(doc.path?).map(str::to_string)
}

fn by_heading(doc: &DocumentView<'_>, ctx: &ResolveContext<'_>) -> Option<String> {
    doc.content
        .headings
        .iter()
        .find(|h| !ctx.ignored.contains(h))
        .cloned()
}
