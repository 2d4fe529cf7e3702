//! Catalog population from a plain link list.
//!
//! Each line is a download URL of the form
//! `<prefix><section>/<console>/<file>`. Lines outside the prefix, with
//! the wrong extension, with fewer than three path parts or with bad
//! percent-encoding are skipped.

use crate::core::catalog::SqliteCatalog;
use crate::core::config::IngestConfig;
use crate::core::error::{Result, RomError};
use crate::core::types::{CatalogRecord, IngestStats};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

/// Parse one link-list line into a catalog record
///
/// The file part keeps any further `/` separators.
pub fn parse_link(line: &str, url_prefix: &str, extension: &str) -> Option<CatalogRecord> {
    let rel = line.strip_prefix(url_prefix)?;
    if !line.ends_with(extension) {
        return None;
    }

    let mut parts = rel.splitn(3, '/');
    let (section, console, file) = (parts.next()?, parts.next()?, parts.next()?);

    Some(CatalogRecord {
        section: query_unescape(section)?,
        console: query_unescape(console)?,
        file: query_unescape(file)?,
        url: line.to_string(),
    })
}

/// Decode `%XX` escapes and `+` as space; `None` on malformed input
fn query_unescape(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
        }
    }

    let spaced = s.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|c| c.into_owned())
}

/// Read a link list and insert every valid line into the catalog.
///
/// A read error aborts the run and nothing is committed.
pub fn ingest_link_list<R: BufRead>(
    reader: R,
    catalog: &SqliteCatalog,
    config: &IngestConfig,
) -> Result<IngestStats> {
    let start = Instant::now();
    let mut skipped = 0;

    let records = reader.lines().filter_map(|line| match line {
        Err(e) => Some(Err(RomError::Ingest(format!("Failed to read link list: {e}")))),
        Ok(line) => match parse_link(line.trim_end_matches('\r'), &config.url_prefix, &config.extension) {
            Some(record) => Some(Ok(record)),
            None => {
                skipped += 1;
                None
            }
        },
    });

    let (inserted, duplicates) = catalog.insert_records(records, config.progress_every)?;

    let stats = IngestStats {
        inserted,
        duplicates,
        skipped,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        "Ingest done: {} inserted, {} duplicate(s), {} skipped in {}ms",
        stats.inserted,
        stats.duplicates,
        stats.skipped,
        stats.duration_ms
    );

    Ok(stats)
}

/// Ingest a link-list file from disk
pub fn ingest_file(
    path: impl AsRef<Path>,
    catalog: &SqliteCatalog,
    config: &IngestConfig,
) -> Result<IngestStats> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| RomError::Ingest(format!("Could not open {}: {e}", path.display())))?;
    ingest_link_list(BufReader::new(file), catalog, config)
}
