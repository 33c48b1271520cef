//! Database layer for the medicine catalog.

mod medicines;
mod schema;

pub use schema::*;

use std::path::Path;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use thiserror::Error;

/// Upper bound on compiled pattern size for the `regexp()` SQL function.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Register SQL functions and initialize schema.
    fn initialize(&self) -> DbResult<()> {
        register_regexp(&self.conn)?;
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Back SQLite's `X REGEXP Y` operator with the `regex` crate.
///
/// SQLite calls `regexp(pattern, text)`. The compiled pattern is cached per
/// statement, and NULL text never matches.
fn register_regexp(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let re: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
                Ok(RegexBuilder::new(vr.as_str()?)
                    .size_limit(REGEX_SIZE_LIMIT)
                    .build()?)
            })?;
            let text: Option<String> = ctx.get(1)?;
            Ok(text.map_or(false, |t| re.is_match(&t)))
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"medicines".to_string()));
    }

    #[test]
    fn test_regexp_function() {
        let db = Database::open_in_memory().unwrap();

        let matched: bool = db
            .conn()
            .query_row("SELECT 'Paracetamol' REGEXP '(?i)CETA'", [], |row| row.get(0))
            .unwrap();
        assert!(matched);

        let matched: bool = db
            .conn()
            .query_row("SELECT NULL REGEXP 'a'", [], |row| row.get(0))
            .unwrap();
        assert!(!matched);
    }

    #[test]
    fn test_invalid_regexp_is_error() {
        let db = Database::open_in_memory().unwrap();

        let result: rusqlite::Result<bool> =
            db.conn()
                .query_row("SELECT 'abc' REGEXP '('", [], |row| row.get(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_open_file_backed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .execute(
                    "INSERT INTO medicines (id, name) VALUES ('m1', 'Dolo 650')",
                    [],
                )
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
