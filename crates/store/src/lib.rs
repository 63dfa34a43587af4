//! `digitlaw-store` — SQLite-backed persistence for validation results.
//!
//! Append-only: records are inserted and read, never updated or deleted
//! through this interface.

mod error;

pub use error::StoreError;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use digitlaw_engine::{ConformityResult, Conformity, DigitDistribution};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS benford (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    filename  TEXT NOT NULL,
    column    TEXT NOT NULL,
    mad       REAL NOT NULL,
    array     TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
"#;

/// Lightweight listing row: enough to label a historical entry without
/// hauling its distribution along.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub filename: String,
    pub column: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only store of conformity results.
///
/// The connection sits behind a mutex so concurrent inserts serialize and
/// every record gets a distinct sequential id.
pub struct ResultStore {
    conn: Mutex<Connection>,
}

impl ResultStore {
    /// Open the store at `path`, creating the schema if absent. Reopening
    /// an existing store leaves its records untouched.
    pub fn open(path: &Path) -> Result<ResultStore, StoreError> {
        let conn = Connection::open(path).map_err(storage)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<ResultStore, StoreError> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<ResultStore, StoreError> {
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(ResultStore {
            conn: Mutex::new(conn),
        })
    }

    /// Append a result; returns its assigned id. A single INSERT runs in
    /// its own implicit transaction, so a failed insert leaves no partial
    /// row behind.
    pub fn insert(&self, result: &ConformityResult) -> Result<i64, StoreError> {
        let array = serde_json::to_string(&result.distribution.observed())
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO benford (filename, column, mad, array, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.source_label,
                result.column_label,
                result.mad_score,
                array,
                result.created_at.to_rfc3339(),
            ],
        )
        .map_err(storage)?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch one result by its stable id.
    pub fn get(&self, id: i64) -> Result<ConformityResult, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT filename, column, mad, array, timestamp FROM benford WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(storage)?;

        let (filename, column, mad, array, timestamp) = row.ok_or(StoreError::NotFound(id))?;

        let observed: Vec<f64> = serde_json::from_str(&array)
            .map_err(|e| StoreError::Corrupt(format!("record {id}: {e}")))?;
        let distribution = DigitDistribution::from_observed(&observed)
            .map_err(|e| StoreError::Corrupt(format!("record {id}: {e}")))?;

        Ok(ConformityResult {
            source_label: filename,
            column_label: column,
            mad_score: mad,
            // The band is a pure function of mad; re-derive instead of storing
            conformity: Conformity::from_mad(mad),
            distribution,
            created_at: parse_timestamp(id, &timestamp)?,
        })
    }

    /// All stored entries in insertion order, without distributions.
    pub fn list(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, filename, column, timestamp FROM benford ORDER BY id")
            .map_err(storage)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(storage)?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, filename, column, timestamp) = row.map_err(storage)?;
            entries.push(HistoryEntry {
                id,
                filename,
                column,
                timestamp: parse_timestamp(id, &timestamp)?,
            });
        }
        Ok(entries)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".to_string()))
    }
}

fn parse_timestamp(id: i64, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("record {id}: bad timestamp: {e}")))
}

fn storage(e: rusqlite::Error) -> StoreError {
    StoreError::Storage(e.to_string())
}
