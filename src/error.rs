//! Rich diagnostic error types for book indexing.
//!
//! Only container-level failures abort a run. Per-document read failures are
//! surfaced as [`IndexError::DocumentRead`] so the pipeline can log and skip
//! them; everything else here ends up on stderr through miette.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from book indexing operations.
#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("cannot open container \"{path}\": {message}")]
    #[diagnostic(
        code(book_index::container_open),
        help(
            "The file could not be opened as an EPUB package. Verify the path \
             and that the file is a valid, non-corrupted .epub archive."
        )
    )]
    ContainerOpen { path: String, message: String },

    #[error("cannot read content document \"{id}\": {message}")]
    #[diagnostic(
        code(book_index::document_read),
        help("The document is skipped; no paragraphs or chapters are attributed to it.")
    )]
    DocumentRead { id: String, message: String },

    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(book_index::config_read),
        help("Check that the config file exists and is readable.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file \"{path}\": {message}")]
    #[diagnostic(
        code(book_index::config_parse),
        help(
            "The config file must be valid TOML. Known keys are min_paragraph_chars, \
             fuzzy_length_slack, fallback_ratio, fallback_min_entries, whole_book_title, \
             one_based_ids, extra_ignored_headings, default_title and default_author."
        )
    )]
    ConfigParse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(book_index::invalid_config))]
    InvalidConfig { message: String },

    #[error("failed to write index to {path}")]
    #[diagnostic(
        code(book_index::output_write),
        help("Check that the destination directory is writable.")
    )]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read index \"{path}\": {message}")]
    #[diagnostic(
        code(book_index::index_read),
        help("Pass a JSON file produced by `book-index build`.")
    )]
    IndexRead { path: String, message: String },

    #[error("serialization failed: {message}")]
    #[diagnostic(code(book_index::serialize))]
    Serialize { message: String },

    #[error("paragraph {paragraph_id} is outside the index (valid ids: {first}..={last})")]
    #[diagnostic(code(book_index::position_out_of_range))]
    PositionOutOfRange {
        paragraph_id: usize,
        first: usize,
        last: usize,
    },
}

/// Convenience alias for indexing results.
pub type IndexResult<T> = std::result::Result<T, IndexError>;
