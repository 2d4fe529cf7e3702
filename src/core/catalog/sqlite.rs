//! SQLite-backed catalog.
//!
//! One table, `files`, keyed by the download URL. Filter clauses are
//! compiled to parameterised `LIKE` predicates over a Unicode-aware
//! `fold_case()` SQL function so storage and in-memory matching agree.

use crate::core::error::{Result, RomError};
use crate::core::search::{CatalogStore, Clause, FilterSpec, RawRow};
use crate::core::types::CatalogRecord;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Rows the executor can decode: every column readable as text
const DECODABLE: &str = "typeof(section) = 'text' AND typeof(console) = 'text' \
    AND typeof(file) = 'text' AND typeof(rawurl) = 'text'";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    section TEXT,
    console TEXT,
    file TEXT,
    rawurl TEXT PRIMARY KEY
);
"#;

/// Catalog stored in a SQLite database file.
///
/// Thread-safe via an internal mutex on the connection.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open (or create) the catalog at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| {
            RomError::QueryError(format!(
                "Failed to open catalog {}: {e}",
                db_path.display()
            ))
        })?;

        tracing::debug!("Opened catalog at {}", db_path.display());
        Self::with_connection(conn)
    }

    /// Open a throwaway in-memory catalog
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.create_scalar_function(
            "fold_case",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value: Option<String> = ctx.get(0)?;
                Ok(value.map(|s| s.to_lowercase()))
            },
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RomError::QueryError(format!("Failed to lock catalog: {e}")))
    }

    /// Number of records in the catalog
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Insert records in a single transaction.
    ///
    /// Existing URLs are left untouched. An `Err` item aborts the whole
    /// batch and rolls back. Returns `(inserted, duplicates)`.
    pub fn insert_records<I>(&self, records: I, progress_every: usize) -> Result<(usize, usize)>
    where
        I: IntoIterator<Item = Result<CatalogRecord>>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        let mut duplicates = 0;
        let mut seen = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO files(section, console, file, rawurl) VALUES (?1, ?2, ?3, ?4)",
            )?;

            for record in records {
                let record = record?;
                match stmt.execute(params![
                    record.section,
                    record.console,
                    record.file,
                    record.url
                ]) {
                    Ok(0) => duplicates += 1,
                    Ok(_) => inserted += 1,
                    Err(e) => tracing::warn!("Failed to insert {}: {}", record.url, e),
                }

                seen += 1;
                if progress_every > 0 && seen % progress_every == 0 {
                    tracing::info!("Inserted {} rows...", seen);
                }
            }
        }

        tx.commit()?;
        Ok((inserted, duplicates))
    }
}

impl CatalogStore for SqliteCatalog {
    fn query(&self, spec: &FilterSpec) -> Result<Vec<RawRow>> {
        let mut params = Vec::new();
        let mut sql = String::from("SELECT section, console, file, rawurl FROM files");
        push_where(&mut sql, &spec.predicates, &mut params);

        if !spec.order.is_empty() {
            let columns: Vec<&str> = spec.order.iter().map(|f| f.column()).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&columns.join(", "));
        }
        sql.push_str(" LIMIT ?");
        params.push(Value::Integer(i64::try_from(spec.limit).unwrap_or(i64::MAX)));

        tracing::trace!("Catalog query: {}", sql);

        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| RomError::QueryError(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                // A column that cannot be read as text decodes as missing
                Ok(RawRow {
                    section: row.get::<_, Option<String>>(0).ok().flatten(),
                    console: row.get::<_, Option<String>>(1).ok().flatten(),
                    file: row.get::<_, Option<String>>(2).ok().flatten(),
                    url: row.get::<_, Option<String>>(3).ok().flatten(),
                })
            })
            .map_err(|e| RomError::QueryError(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| RomError::QueryError(e.to_string()))?);
        }
        Ok(out)
    }

    fn count(&self, spec: &FilterSpec) -> Result<usize> {
        let mut params = Vec::new();
        let mut sql = String::from("SELECT COUNT(*) FROM files");
        push_where(&mut sql, &spec.predicates, &mut params);
        sql.push_str(if spec.predicates.is_empty() { " WHERE " } else { " AND " });
        sql.push_str(DECODABLE);

        let conn = self.lock()?;
        let n: i64 = conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(|e| RomError::QueryError(e.to_string()))?;
        Ok(n as usize)
    }
}

fn push_where(sql: &mut String, predicates: &[Clause], params: &mut Vec<Value>) {
    if predicates.is_empty() {
        return;
    }
    let parts: Vec<String> = predicates.iter().map(|c| clause_sql(c, params)).collect();
    sql.push_str(" WHERE ");
    sql.push_str(&parts.join(" AND "));
}

/// Compile a clause tree to SQL, appending bound values in order
fn clause_sql(clause: &Clause, params: &mut Vec<Value>) -> String {
    match clause {
        Clause::Contains { field, needle } => {
            params.push(Value::Text(format!("%{}%", escape_like(needle))));
            format!("fold_case({}) LIKE ? ESCAPE '\\'", field.column())
        }
        Clause::And { clauses } => join_clauses(clauses, " AND ", "1", params),
        Clause::Or { clauses } => join_clauses(clauses, " OR ", "0", params),
        Clause::Not { clause } => format!("NOT ({})", clause_sql(clause, params)),
    }
}

fn join_clauses(clauses: &[Clause], sep: &str, empty: &str, params: &mut Vec<Value>) -> String {
    if clauses.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = clauses.iter().map(|c| clause_sql(c, params)).collect();
    format!("({})", parts.join(sep))
}

/// Escape LIKE wildcards so terms match literally
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
