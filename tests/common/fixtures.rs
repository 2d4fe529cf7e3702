// Test fixtures for integration testing

use romfinder::core::types::CatalogRecord;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// URL prefix accepted by the default ingest configuration
#[allow(dead_code)]
pub const PREFIX: &str = "https://myrient.erista.me/files/";

/// A small catalog spanning a few sections and consoles
#[allow(dead_code)]
pub fn sample_records() -> Vec<CatalogRecord> {
    let rows = [
        ("No-Intro", "Nintendo - Super Nintendo Entertainment System", "Super Mario World (USA).zip"),
        ("No-Intro", "Nintendo - Super Nintendo Entertainment System", "Super Mario World (Demo).zip"),
        ("No-Intro", "Nintendo - Super Nintendo Entertainment System", "Legend of Zelda, The - A Link to the Past (USA).zip"),
        ("No-Intro", "Nintendo - Game Boy", "Super Mario Land (World).zip"),
        ("No-Intro", "Sega - Mega Drive - Genesis", "Sonic The Hedgehog (USA, Europe).zip"),
        ("Redump", "Sony - PlayStation", "Crash Bandicoot (USA).zip"),
        ("Redump", "Sony - PlayStation", "Mario's 100% Quiz (Japan).zip"),
    ];

    rows.iter()
        .map(|(section, console, file)| {
            CatalogRecord::new(
                *section,
                *console,
                *file,
                format!("{PREFIX}{section}/{console}/{file}"),
            )
        })
        .collect()
}

/// A link-list file on disk
#[allow(dead_code)]
pub struct LinkList {
    pub file: NamedTempFile,
}

impl LinkList {
    /// Write the given lines, newline-terminated
    #[allow(dead_code)]
    pub fn with_lines(lines: &[&str]) -> Self {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        for line in lines {
            writeln!(file, "{line}").expect("Failed to write link list");
        }
        file.flush().expect("Failed to flush link list");
        Self { file }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
