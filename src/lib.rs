// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # book-index
//!
//! Turns an e-book package into a flat, ordered list of paragraphs plus a
//! chapter index pointing into that list, for paragraph-by-paragraph reading
//! front ends.
//!
//! ## Architecture
//!
//! - **Containers** (`container`): EPUB packages and in-memory books behind one trait
//! - **Extraction** (`extract`): readable text units and their anchors per document
//! - **TOC index** (`toc`): flattened, path-normalized table of contents
//! - **Resolution** (`resolve`): tiered chapter matching with fuzzy and whole-book fallbacks
//! - **Assembly** (`assemble`): final paragraph/chapter arrays and JSON output
//! - **Navigation** (`navigate`): chapter lookup and reading progress over a finished index
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use book_index::config::IndexConfig;
//! use book_index::pipeline::build_index;
//!
//! let mut book = book_index::container::open(Path::new("book.epub")).unwrap();
//! let outcome = build_index(book.as_mut(), "book", &IndexConfig::default()).unwrap();
//! println!("{} chapters", outcome.index.chapters.len());
//! ```

pub mod assemble;
pub mod config;
pub mod container;
pub mod error;
pub mod extract;
pub mod model;
pub mod navigate;
pub mod pipeline;
pub mod resolve;
pub mod text;
pub mod toc;
