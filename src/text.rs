//! Text normalization: whitespace, comparison keys, paths and tokens.
//!
//! Everything here is pure. Comparison keys are for matching and
//! deduplication only; displayed text always keeps its original casing.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Directory names that EPUB packagers put at the container root.
const CONTAINER_ROOTS: &[&str] = &["oebps/", "ops/", "epub/"];

/// Collapse every whitespace run to a single space and trim.
///
/// Covers no-break and other Unicode spaces, which show up constantly in
/// typeset e-books.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case- and diacritic-insensitive key: "Índice" and "indice" map to the
/// same value.
pub fn normalize_for_comparison(text: &str) -> String {
    let folded = normalize_whitespace(text).to_lowercase();
    folded.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Canonical form of a document href (without fragment).
///
/// Relative prefixes and known container roots are stripped until the path
/// stops changing, so `./x.html`, `../x.html` and `OEBPS/x.html` agree.
pub fn normalize_path(href: &str) -> String {
    let mut path = href.trim().replace('\\', "/").to_lowercase();
    loop {
        let before = path.len();
        path = path.trim_start_matches('/').to_string();
        while let Some(rest) = path.strip_prefix("./").or_else(|| path.strip_prefix("../")) {
            path = rest.to_string();
        }
        for root in CONTAINER_ROOTS {
            if let Some(rest) = path.strip_prefix(root) {
                path = rest.to_string();
            }
        }
        if path.len() == before {
            return path;
        }
    }
}

/// Last segment of a (normalized) path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split on whitespace, strip surrounding quote characters, drop empties.
///
/// Word counts everywhere (total words, reading progress) are
/// `tokenize(text).len()`.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c| c == '"' || c == '\''))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Number of tokens in `text`.
pub fn word_count(text: &str) -> usize {
    tokenize(text).len()
}

/// Generate a URL-safe slug from a title string.
pub fn slugify(title: &str) -> String {
    normalize_for_comparison(title)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
