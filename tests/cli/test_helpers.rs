//! CLI test helpers
//!
//! Provides a configuration whose catalog lives in a temp directory,
//! optionally pre-filled through the ingest path.

use crate::common::{LinkList, PREFIX};
use romfinder::core::catalog::{ingest_file, SqliteCatalog};
use romfinder::core::config::Config;
use tempfile::TempDir;

/// Config pointing at an empty catalog inside a temp dir
pub fn create_cli_test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.catalog.db_path = temp_dir.path().join("links.db");
    config.sync.session_file = temp_dir.path().join("token.json");
    (config, temp_dir)
}

/// Config whose catalog already holds a few Game Boy titles
pub fn create_seeded_config() -> (Config, TempDir) {
    let (config, temp_dir) = create_cli_test_config();
    let list = LinkList::with_lines(&[
        &format!("{PREFIX}No-Intro/Nintendo%20-%20Game%20Boy/Tetris%20(World).zip"),
        &format!("{PREFIX}No-Intro/Nintendo%20-%20Game%20Boy/Tetris%20(Demo).zip"),
        &format!("{PREFIX}No-Intro/Nintendo%20-%20Game%20Boy/Dr.%20Mario%20(World).zip"),
    ]);

    let catalog = SqliteCatalog::open(&config.catalog.db_path).expect("Failed to open catalog");
    ingest_file(list.path(), &catalog, &config.ingest).expect("Failed to seed catalog");
    (config, temp_dir)
}
