//! Search pipeline tests against a SQLite catalog
//!
//! Parse, compile and execute the way the bot does, checking ordering,
//! narrowing and the overflow boundary.

use crate::common::{create_test_catalog, sample_records};
use romfinder::core::search::{compile_filter, parse_terms, CatalogExecutor};
use romfinder::core::types::{CatalogRecord, ResultSet};
use std::sync::Arc;

fn run(records: Vec<CatalogRecord>, query: &str, max_results: usize) -> ResultSet {
    let executor = CatalogExecutor::new(create_test_catalog(records));
    let parsed = parse_terms(query);
    let spec = compile_filter(&parsed.positives, &parsed.negatives, max_results);
    executor.execute(&spec).expect("query should succeed")
}

fn files(results: &ResultSet) -> Vec<&str> {
    results.records.iter().map(|r| r.file.as_str()).collect()
}

#[test]
fn test_quoted_phrase_and_exclusion() {
    let results = run(sample_records(), "\"mario world\" -demo", 1000);
    assert_eq!(files(&results), vec!["Super Mario World (USA).zip"]);
}

#[test]
fn test_term_matches_console_or_section() {
    let results = run(sample_records(), "playstation", 1000);
    assert_eq!(results.len(), 2);

    let results = run(sample_records(), "redump -crash", 1000);
    assert_eq!(files(&results), vec!["Mario's 100% Quiz (Japan).zip"]);
}

#[test]
fn test_results_sorted_by_section_console_file() {
    let results = run(sample_records(), "", 1000);
    assert_eq!(results.len(), sample_records().len());

    for pair in results.records.windows(2) {
        let a = (&pair[0].section, &pair[0].console, &pair[0].file);
        let b = (&pair[1].section, &pair[1].console, &pair[1].file);
        assert!(a <= b, "{a:?} should sort before {b:?}");
    }
}

#[test]
fn test_adding_terms_never_widens() {
    let queries = ["", "mario", "mario super", "mario super -demo", "mario super -demo -land"];
    let sizes: Vec<usize> = queries
        .iter()
        .map(|q| run(sample_records(), q, 1000).len())
        .collect();

    for pair in sizes.windows(2) {
        assert!(pair[1] <= pair[0], "sizes should not grow: {sizes:?}");
    }
    assert_eq!(*sizes.last().unwrap(), 1);
}

#[test]
fn test_case_insensitive_and_literal_percent() {
    let results = run(sample_records(), "\"MARIO'S 100%\"", 1000);
    assert_eq!(files(&results), vec!["Mario's 100% Quiz (Japan).zip"]);

    // '%' must not act as a wildcard
    let results = run(sample_records(), "o%q", 1000);
    assert!(results.is_empty());
}

#[test]
fn test_unmatched_quote_degrades_gracefully() {
    let results = run(sample_records(), "\"sonic", 1000);
    assert_eq!(files(&results), vec!["Sonic The Hedgehog (USA, Europe).zip"]);
}

#[test]
fn test_overflow_boundary_reports_true_count() {
    let records: Vec<CatalogRecord> = (0..25)
        .map(|i| CatalogRecord::new("S", "C", format!("Game {i:02}.zip"), format!("u{i}")))
        .collect();

    let at_limit = run(records.clone(), "game", 25);
    assert_eq!(at_limit.len(), 25);
    assert!(!at_limit.exceeds(25));

    let over = run(records, "game", 10);
    assert_eq!(over.len(), 11, "fetch is capped at max + 1");
    assert!(over.exceeds(10));
    assert_eq!(over.total_matches, 25);
}

#[test]
fn test_no_matches_is_empty_not_error() {
    let results = run(sample_records(), "nonexistent", 1000);
    assert!(results.is_empty());
    assert_eq!(results.total_matches, 0);
}

#[test]
fn test_shared_catalog_concurrent_reads() {
    let catalog = create_test_catalog(sample_records());
    let executor = Arc::new(CatalogExecutor::new(catalog));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let executor = Arc::clone(&executor);
            std::thread::spawn(move || {
                let spec = compile_filter(&["mario".to_string()], &[], 1000);
                executor.execute(&spec).unwrap().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 4);
    }
}
