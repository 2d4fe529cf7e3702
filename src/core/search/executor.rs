//! Catalog query execution.
//!
//! The executor hands a compiled [`FilterSpec`] to a [`CatalogStore`],
//! decodes the returned rows into [`CatalogRecord`]s and produces the
//! ordered [`ResultSet`] for one command.

use crate::core::error::{Result, RomError};
use crate::core::search::filter::FilterSpec;
use crate::core::types::{CatalogRecord, ResultSet};
use std::sync::Arc;
use std::time::Instant;

/// A row as read from storage, before validation
///
/// Columns are optional because the catalog schema does not forbid
/// NULLs; rows with a missing column are skipped by the executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub section: Option<String>,
    pub console: Option<String>,
    pub file: Option<String>,
    pub url: Option<String>,
}

impl RawRow {
    /// Decode into a record, or `None` if any column is missing
    pub fn decode(self) -> Option<CatalogRecord> {
        Some(CatalogRecord {
            section: self.section?,
            console: self.console?,
            file: self.file?,
            url: self.url?,
        })
    }
}

impl From<CatalogRecord> for RawRow {
    fn from(record: CatalogRecord) -> Self {
        Self {
            section: Some(record.section),
            console: Some(record.console),
            file: Some(record.file),
            url: Some(record.url),
        }
    }
}

/// Read-only catalog collaborator
///
/// Implementations must be safe for concurrent readers.
pub trait CatalogStore: Send + Sync {
    /// Return at most `spec.limit` rows matching every predicate,
    /// sorted by `spec.order`
    fn query(&self, spec: &FilterSpec) -> Result<Vec<RawRow>>;

    /// Count every row matching the predicates, ignoring the limit
    fn count(&self, spec: &FilterSpec) -> Result<usize>;
}

/// Executes filter specs against a catalog store
pub struct CatalogExecutor {
    store: Arc<dyn CatalogStore>,
}

impl CatalogExecutor {
    /// Create a new executor over a store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Run the spec and collect ordered records.
    ///
    /// Rows that fail to decode are skipped. Storage failures map to
    /// [`RomError::QueryError`]. When the fetch fills the row cap a
    /// second call counts the true number of matches.
    pub fn execute(&self, spec: &FilterSpec) -> Result<ResultSet> {
        let start = Instant::now();

        let rows = self.store.query(spec).map_err(into_query_error)?;
        let fetched = rows.len();

        let mut records: Vec<CatalogRecord> = rows.into_iter().filter_map(RawRow::decode).collect();
        if records.len() < fetched {
            tracing::debug!("Skipped {} undecodable row(s)", fetched - records.len());
        }

        // Stable, so equal keys keep storage order
        records.sort_by(|a, b| a.display_cmp(b));

        let total_matches = if fetched >= spec.limit {
            self.store.count(spec).map_err(into_query_error)?
        } else {
            records.len()
        };

        tracing::debug!(
            "Query returned {} record(s) of {} match(es) in {}ms",
            records.len(),
            total_matches,
            start.elapsed().as_millis()
        );

        Ok(ResultSet {
            records,
            total_matches,
        })
    }
}

fn into_query_error(err: RomError) -> RomError {
    match err {
        RomError::QueryError(_) => err,
        other => RomError::QueryError(other.to_string()),
    }
}
