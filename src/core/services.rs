//! Unified service container for romfinder
//!
//! Provides shared access to all core services.

use crate::core::catalog::{ingest_file, SqliteCatalog};
use crate::core::config::Config;
use crate::core::delivery::DeliveryEngine;
use crate::core::dispatch::{Dispatcher, EventFilter};
use crate::core::error::Result;
use crate::core::search::{compile_filter, parse_terms, CatalogExecutor};
use crate::core::types::{IngestStats, ResultSet};
use std::path::Path;
use std::sync::Arc;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Catalog database, shared by the executor and ingestion
    pub catalog: Arc<SqliteCatalog>,

    /// Query executor over the catalog
    pub executor: Arc<CatalogExecutor>,

    /// Batching and threading of results
    pub delivery: DeliveryEngine,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration, opening the catalog
    pub fn new(config: Config) -> Result<Self> {
        let catalog = Arc::new(SqliteCatalog::open(&config.catalog.db_path)?);
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create services over an already-open catalog
    pub fn with_catalog(config: Config, catalog: Arc<SqliteCatalog>) -> Self {
        let executor = Arc::new(CatalogExecutor::new(catalog.clone()));
        let delivery = DeliveryEngine::new(config.search.max_results, config.search.batch_size);

        Self {
            catalog,
            executor,
            delivery,
            config: Arc::new(config),
        }
    }

    /// Parse, compile and execute a query without delivering it
    pub fn search(&self, query: &str) -> Result<ResultSet> {
        let parsed = parse_terms(query);
        let spec = compile_filter(
            &parsed.positives,
            &parsed.negatives,
            self.config.search.max_results,
        );
        self.executor.execute(&spec)
    }

    /// Add a link-list file to the catalog
    pub fn ingest(&self, path: impl AsRef<Path>) -> Result<IngestStats> {
        ingest_file(path, &self.catalog, &self.config.ingest)
    }

    /// Build the dispatcher for a logged-in session
    ///
    /// Dispatchers are created per session since the filter depends on
    /// the bot's own user id and start time.
    pub fn dispatcher(&self, filter: EventFilter) -> Dispatcher {
        Dispatcher::new(
            Arc::clone(&self.executor),
            self.delivery,
            self.config.search.command.clone(),
            filter,
        )
    }
}
