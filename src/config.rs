//! Indexing configuration.
//!
//! Defaults reproduce the standard behavior; a TOML file can override the
//! matching heuristics when tuning against a particular corpus.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Tunables for extraction, resolution and assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Units whose normalized text is shorter than this (in characters) are dropped.
    pub min_paragraph_chars: usize,
    /// Length tolerance for the "paragraph contains the title" fuzzy match.
    pub fuzzy_length_slack: usize,
    /// The fuzzy pass runs when fewer than `ratio * toc_entries` chapters resolved.
    pub fallback_ratio: f64,
    /// The fuzzy pass never runs for TOCs with this many entries or fewer.
    pub fallback_min_entries: usize,
    /// Title of the synthesized chapter when nothing resolves.
    pub whole_book_title: String,
    /// Number paragraphs from 1 instead of 0.
    pub one_based_ids: bool,
    /// Additional heading texts that never name a chapter.
    pub extra_ignored_headings: Vec<String>,
    /// Used when the container declares no title.
    pub default_title: Option<String>,
    /// Used when the container declares no author.
    pub default_author: Option<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            min_paragraph_chars: 2,
            fuzzy_length_slack: 15,
            fallback_ratio: 0.5,
            fallback_min_entries: 2,
            whole_book_title: "Full Text".into(),
            one_based_ids: false,
            extra_ignored_headings: Vec::new(),
            default_title: None,
            default_author: None,
        }
    }
}

impl IndexConfig {
    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> IndexResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| IndexError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| IndexError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that make the pipeline meaningless.
    pub fn validate(&self) -> IndexResult<()> {
        if self.min_paragraph_chars == 0 {
            return Err(IndexError::InvalidConfig {
                message: "min_paragraph_chars must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.fallback_ratio) {
            return Err(IndexError::InvalidConfig {
                message: format!(
                    "fallback_ratio must be within 0..=1, got {}",
                    self.fallback_ratio
                ),
            });
        }
        if self.whole_book_title.trim().is_empty() {
            return Err(IndexError::InvalidConfig {
                message: "whole_book_title must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Id assigned to the first paragraph.
    pub fn id_base(&self) -> usize {
        usize::from(self.one_based_ids)
    }
}
