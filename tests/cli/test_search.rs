//! Tests for the search CLI command
//!
//! Tests the search command handler with various scenarios:
//! - Queries with results
//! - Empty results
//! - Overflow
//! - Output format variations

use crate::cli::test_helpers::{create_cli_test_config, create_seeded_config};
use romfinder::cli::commands::search::{execute, SearchArgs};
use romfinder::cli::OutputFormat;

fn args(query: &[&str]) -> SearchArgs {
    SearchArgs {
        query: query.iter().map(|s| s.to_string()).collect(),
        max_results: None,
        urls: false,
    }
}

#[tokio::test]
async fn test_search_human() {
    let (config, _temp) = create_seeded_config();
    let result = execute(args(&["tetris", "-demo"]), config, OutputFormat::Human).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_json_with_urls() {
    let (config, _temp) = create_seeded_config();
    let mut a = args(&["\"dr. mario\""]);
    a.urls = true;
    let result = execute(a, config, OutputFormat::Json).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_empty_catalog() {
    let (config, _temp) = create_cli_test_config();
    let result = execute(args(&["anything"]), config, OutputFormat::Human).await;
    assert!(result.is_ok(), "Empty results are not an error");
}

#[tokio::test]
async fn test_search_overflow_is_not_an_error() {
    let (config, _temp) = create_seeded_config();
    let mut a = args(&["game", "boy"]);
    a.max_results = Some(1);
    let result = execute(a, config, OutputFormat::Human).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_search_zero_max_rejected() {
    let (config, _temp) = create_seeded_config();
    let mut a = args(&["tetris"]);
    a.max_results = Some(0);
    let err = execute(a, config, OutputFormat::Human).await.unwrap_err();
    assert!(err.to_string().contains("--max-results"));
}
