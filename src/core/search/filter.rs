//! Filter compilation.
//!
//! Turns parsed terms into a storage-agnostic [`FilterSpec`]: a list of
//! conjoined [`Clause`] trees over the three searchable catalog fields,
//! a fixed sort order and a row cap. Storage adapters compile the tree
//! to their native query language; [`FilterSpec::matches`] evaluates it
//! in memory with the same semantics.

use crate::core::types::CatalogRecord;
use serde::Serialize;

/// Searchable catalog columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Section,
    Console,
    File,
}

impl Field {
    /// All searchable fields, in sort priority order
    pub const ALL: [Field; 3] = [Field::Section, Field::Console, Field::File];

    /// Column name in the catalog schema
    pub fn column(self) -> &'static str {
        match self {
            Field::Section => "section",
            Field::Console => "console",
            Field::File => "file",
        }
    }

    /// Read this field from a record
    pub fn value(self, record: &CatalogRecord) -> &str {
        match self {
            Field::Section => &record.section,
            Field::Console => &record.console,
            Field::File => &record.file,
        }
    }
}

/// Boolean predicate tree over field substring tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Clause {
    /// Case-insensitive substring test; `needle` is already lowercased
    Contains { field: Field, needle: String },
    And { clauses: Vec<Clause> },
    Or { clauses: Vec<Clause> },
    Not { clause: Box<Clause> },
}

impl Clause {
    /// Term must appear in at least one field
    pub fn any_field_contains(term: &str) -> Self {
        let needle = term.to_lowercase();
        Clause::Or {
            clauses: Field::ALL
                .iter()
                .map(|&field| Clause::Contains {
                    field,
                    needle: needle.clone(),
                })
                .collect(),
        }
    }

    /// Term must be absent from every field
    pub fn no_field_contains(term: &str) -> Self {
        let needle = term.to_lowercase();
        Clause::And {
            clauses: Field::ALL
                .iter()
                .map(|&field| Clause::Not {
                    clause: Box::new(Clause::Contains {
                        field,
                        needle: needle.clone(),
                    }),
                })
                .collect(),
        }
    }

    /// Evaluate against a record
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        match self {
            Clause::Contains { field, needle } => {
                field.value(record).to_lowercase().contains(needle.as_str())
            }
            Clause::And { clauses } => clauses.iter().all(|c| c.matches(record)),
            Clause::Or { clauses } => clauses.iter().any(|c| c.matches(record)),
            Clause::Not { clause } => !clause.matches(record),
        }
    }
}

/// Compiled query: conjoined predicates, sort order and row cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    /// All must hold; empty means no filtering
    pub predicates: Vec<Clause>,

    /// Ascending sort keys
    pub order: Vec<Field>,

    /// Rows requested from storage (`max_results + 1`)
    pub limit: usize,
}

impl FilterSpec {
    /// True when the record satisfies every predicate
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// True when no predicates were compiled
    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Compile parsed terms into a filter spec.
///
/// Positives come first, then negatives, each in input order. The row
/// cap is one above `max_results` so an overflow can be detected from
/// the fetch alone.
pub fn compile_filter(positives: &[String], negatives: &[String], max_results: usize) -> FilterSpec {
    let predicates = positives
        .iter()
        .map(|p| Clause::any_field_contains(p))
        .chain(negatives.iter().map(|n| Clause::no_field_contains(n)))
        .collect();

    FilterSpec {
        predicates,
        order: Field::ALL.to_vec(),
        limit: max_results.saturating_add(1),
    }
}
