//! Paragraph extraction from one content document.
//!
//! Markup is parsed with `scraper` (html5ever), which recovers from almost
//! anything, so extraction never fails outright: a hopeless document simply
//! yields no units and the pipeline skips it.
//!
//! Units come from paragraph-like, list-item-like, heading-like and block
//! container elements. A candidate that wraps another candidate is dropped
//! so that a wrapper and its children are not counted twice; html5ever
//! happily nests `<p>` inside headings and captions, so this applies to
//! every candidate, not only block containers.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::text::normalize_whitespace;

const CANDIDATE_TAGS: &[&str] = &[
    "p", "li", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "div", "section",
    "article", "dd", "dt", "figcaption", "td",
];

/// Elements whose text is never visible.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "head", "template", "noscript"];

static CANDIDATES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&CANDIDATE_TAGS.join(", ")).expect("static selector must parse")
});

static HEADINGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("static selector must parse")
});

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("static selector must parse"));

/// One paragraph-level text unit with the anchors attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUnit {
    pub text: String,
    pub anchors: Vec<String>,
}

/// Everything the resolver needs from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Units in document order.
    pub units: Vec<ExtractedUnit>,
    /// Normalized texts of all `h1`..`h6` elements, in document order.
    pub headings: Vec<String>,
}

impl ExtractedDocument {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Total anchors attributed across all units.
    pub fn anchor_count(&self) -> usize {
        self.units.iter().map(|u| u.anchors.len()).sum()
    }
}

/// Extracts paragraph units from raw (X)HTML.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    min_chars: usize,
}

impl ContentExtractor {
    /// `min_chars` is the shortest normalized text (in characters) kept as a unit.
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn extract(&self, markup: &str) -> ExtractedDocument {
        let html = Html::parse_document(markup);
        let mut claimed = HashSet::new();
        let mut units = Vec::new();

        for el in html.select(&CANDIDATES) {
            if has_candidate_descendant(&el) {
                continue;
            }
            let text = normalize_whitespace(&visible_text(&el));
            if text.chars().count() < self.min_chars {
                continue;
            }
            let anchors = collect_anchors(&el, &mut claimed);
            units.push(ExtractedUnit { text, anchors });
        }

        if units.is_empty() {
            if let Some(unit) = self.whole_document(&html) {
                units.push(unit);
            }
        }

        let headings = html
            .select(&HEADINGS)
            .map(|h| normalize_whitespace(&visible_text(&h)))
            .filter(|t| !t.is_empty())
            .collect();

        ExtractedDocument { units, headings }
    }

    /// The whole body as one anchorless unit, for documents without structure.
    fn whole_document(&self, html: &Html) -> Option<ExtractedUnit> {
        let root = html
            .select(&BODY)
            .next()
            .unwrap_or_else(|| html.root_element());
        let text = normalize_whitespace(&visible_text(&root));
        (text.chars().count() >= self.min_chars).then(|| ExtractedUnit {
            text,
            anchors: Vec::new(),
        })
    }
}

fn has_candidate_descendant(el: &ElementRef<'_>) -> bool {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|d| CANDIDATE_TAGS.contains(&d.value().name()))
}

/// Concatenated text of a subtree, skipping invisible elements. `<br>`
/// counts as a space.
fn visible_text(el: &ElementRef<'_>) -> String {
    let mut out = String::new();
    push_visible_text(el, &mut out);
    out
}

fn push_visible_text(el: &ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            match child_el.value().name() {
                "br" => out.push(' '),
                name if INVISIBLE_TAGS.contains(&name) => {}
                _ => push_visible_text(&child_el, out),
            }
        }
    }
}

/// Identifiers attributed to a unit: its own, its enclosing elements' up to
/// `body` (nearest first), its descendants', then those on the empty siblings
/// right before it. An identifier already claimed by an earlier unit is not
/// repeated, so an enclosing id lands on the first unit inside it.
fn collect_anchors(el: &ElementRef<'_>, claimed: &mut HashSet<String>) -> Vec<String> {
    let mut found = Vec::new();

    found.extend(el.value().id().map(str::to_string));

    for ancestor in el.ancestors().filter_map(ElementRef::wrap) {
        if ancestor.value().name() == "html" {
            break;
        }
        found.extend(ancestor.value().id().map(str::to_string));
    }

    found.extend(subtree_ids(el, true));

    for sibling in el.prev_siblings() {
        if let Some(text) = sibling.value().as_text() {
            if text.trim().is_empty() {
                continue;
            }
            break;
        }
        let Some(sibling_el) = ElementRef::wrap(sibling) else {
            continue;
        };
        if !visible_text(&sibling_el).trim().is_empty() {
            break;
        }
        found.extend(subtree_ids(&sibling_el, false));
    }

    found
        .into_iter()
        .filter(|id| !id.is_empty() && claimed.insert(id.clone()))
        .collect()
}

/// `id` and `name` attributes in a subtree, in document order.
fn subtree_ids(el: &ElementRef<'_>, skip_root: bool) -> Vec<String> {
    el.descendants()
        .skip(usize::from(skip_root))
        .filter_map(ElementRef::wrap)
        .flat_map(|d| {
            let value = d.value();
            [value.id(), value.attr("name")]
        })
        .flatten()
        .map(str::to_string)
        .collect()
}
