//! Search pipeline: term parsing, filter compilation and execution.
//!
//! This module turns the text after a command verb into an ordered,
//! capped set of catalog records.

mod executor;
mod filter;
mod terms;

pub use executor::{CatalogExecutor, CatalogStore, RawRow};
pub use filter::{compile_filter, Clause, Field, FilterSpec};
pub use terms::parse_terms;
