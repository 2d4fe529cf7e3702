//! Core data types for the romfinder service.
//!
//! This module defines the catalog record, parsed search terms and
//! the per-command result set shared by the search pipeline and the
//! delivery engine.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single file in the catalog, keyed by its resource URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Top-level collection the file belongs to (e.g. "No-Intro")
    pub section: String,

    /// Platform name
    pub console: String,

    /// File name as shown to users
    pub file: String,

    /// Download URL; unique across the catalog
    pub url: String,
}

impl CatalogRecord {
    pub fn new(
        section: impl Into<String>,
        console: impl Into<String>,
        file: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            console: console.into(),
            file: file.into(),
            url: url.into(),
        }
    }

    /// Compare by (section, console, file), the catalog's display order
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.section
            .cmp(&other.section)
            .then_with(|| self.console.cmp(&other.console))
            .then_with(|| self.file.cmp(&other.file))
    }
}

/// Whether a term must be present or absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Include,
    Exclude,
}

/// A single search token with its polarity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    pub text: String,
    pub polarity: Polarity,
}

impl SearchTerm {
    pub fn include(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            polarity: Polarity::Include,
        }
    }

    pub fn exclude(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            polarity: Polarity::Exclude,
        }
    }
}

/// Output of the term parser, split by polarity in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
}

impl ParsedQuery {
    /// True when no terms were found (matches the whole catalog)
    pub fn is_empty(&self) -> bool {
        self.positives.is_empty() && self.negatives.is_empty()
    }

    /// Flatten into polarity-tagged terms, positives first
    pub fn terms(&self) -> Vec<SearchTerm> {
        self.positives
            .iter()
            .map(SearchTerm::include)
            .chain(self.negatives.iter().map(SearchTerm::exclude))
            .collect()
    }
}

/// Ordered records produced by one query
///
/// `records` holds at most `max_results + 1` entries; `total_matches`
/// is the real number of matching rows in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub records: Vec<CatalogRecord>,
    pub total_matches: usize,
}

impl ResultSet {
    /// Build a result set whose fetch was not truncated
    pub fn complete(records: Vec<CatalogRecord>) -> Self {
        let total_matches = records.len();
        Self {
            records,
            total_matches,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when more rows matched than the caller is willing to send.
    ///
    /// A capped fetch can hold fewer records than matched when storage
    /// returned rows that did not decode, so the match count decides too.
    pub fn exceeds(&self, max_results: usize) -> bool {
        self.records.len() > max_results || self.total_matches > max_results
    }
}

/// Statistics from a catalog ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// New rows written
    pub inserted: usize,

    /// Lines whose URL was already in the catalog
    pub duplicates: usize,

    /// Lines rejected (wrong prefix/extension, malformed, bad encoding)
    pub skipped: usize,

    /// Duration in milliseconds
    pub duration_ms: u64,
}
