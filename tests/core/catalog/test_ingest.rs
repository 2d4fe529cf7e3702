//! Link-list ingestion tests
//!
//! Build an on-disk catalog from a link-list file, reopen it and search.

use crate::common::{LinkList, PREFIX};
use romfinder::core::catalog::{ingest_file, SqliteCatalog};
use romfinder::core::config::{Config, IngestConfig};
use romfinder::core::services::Services;
use tempfile::TempDir;

fn link_list() -> LinkList {
    LinkList::with_lines(&[
        &format!("{PREFIX}No-Intro/Nintendo%20-%20Game%20Boy/Tetris%20(World).zip"),
        &format!("{PREFIX}No-Intro/Nintendo%20-%20Game%20Boy/Kirby%27s%20Dream%20Land%20(USA).zip"),
        &format!("{PREFIX}No-Intro/Nintendo%20-%20Game%20Boy/Tetris%20(World).zip"),
        &format!("{PREFIX}Redump/Sony%20-%20PlayStation/Final+Fantasy+VII+(Disc+1).zip"),
        &format!("{PREFIX}Redump/Sony%20-%20PlayStation/cue-sheets.txt"),
        "https://example.org/files/A/B/c.zip",
        "",
    ])
}

#[test]
fn test_ingest_then_reopen_and_search() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("catalog").join("links.db");

    {
        let catalog = SqliteCatalog::open(&db).unwrap();
        let stats = ingest_file(link_list().path(), &catalog, &IngestConfig::default()).unwrap();
        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.skipped, 3);
    }

    let mut config = Config::default();
    config.catalog.db_path = db;
    let services = Services::new(config).unwrap();
    assert_eq!(services.catalog.len().unwrap(), 3);

    let results = services.search("\"kirby's\"").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.records[0].console, "Nintendo - Game Boy");
    assert_eq!(results.records[0].file, "Kirby's Dream Land (USA).zip");

    let results = services.search("fantasy").unwrap();
    assert_eq!(results.records[0].file, "Final Fantasy VII (Disc 1).zip");
}

#[test]
fn test_reingest_is_idempotent() {
    let catalog = SqliteCatalog::open_in_memory().unwrap();
    let list = link_list();

    let first = ingest_file(list.path(), &catalog, &IngestConfig::default()).unwrap();
    let second = ingest_file(list.path(), &catalog, &IngestConfig::default()).unwrap();

    assert_eq!(first.inserted, 3);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.duplicates, 4);
    assert_eq!(catalog.len().unwrap(), 3);
}

#[test]
fn test_custom_prefix_and_extension() {
    let catalog = SqliteCatalog::open_in_memory().unwrap();
    let list = LinkList::with_lines(&[
        "https://mirror.example.org/roms/Section/Console/game.7z",
        "https://mirror.example.org/roms/Section/Console/game.zip",
    ]);
    let config = IngestConfig {
        url_prefix: "https://mirror.example.org/roms/".to_string(),
        extension: ".7z".to_string(),
        progress_every: 1,
    };

    let stats = ingest_file(list.path(), &catalog, &config).unwrap();
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.skipped, 1);
}
