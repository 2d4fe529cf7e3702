//! Catalog storage and ingestion.
//!
//! - **sqlite**: the `files` table and its [`CatalogStore`] implementation
//! - **ingest**: building the catalog from a link list
//!
//! [`CatalogStore`]: crate::core::search::CatalogStore

mod ingest;
mod sqlite;

pub use ingest::{ingest_file, ingest_link_list, parse_link};
pub use sqlite::SqliteCatalog;
