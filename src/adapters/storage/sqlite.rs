//! SQLite-backed commission storage.
//!
//! One database file holding a `commissions` table and a `schema_meta`
//! key/value table that pins the schema version and day convention.

use crate::core::{Commission, CommissionBackend, CommissionDraft, CommissionId, Result};
use crate::domain::calendar::{DayKey, TimeReference};
use crate::domain::rewards::Rewards;
use crate::utils::error::DailiesError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- AUTOINCREMENT keeps ids of deleted rows from being handed out again.
CREATE TABLE IF NOT EXISTS commissions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    description   TEXT NOT NULL,
    realm         TEXT NOT NULL,
    rewards       TEXT NOT NULL,     -- JSON document
    day           TEXT NOT NULL,     -- YYYY-MM-DD
    created_at_ms INTEGER NOT NULL,
    completed     INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_commissions_day ON commissions(day);
"#;

impl From<rusqlite::Error> for DailiesError {
    fn from(e: rusqlite::Error) -> Self {
        DailiesError::DatabaseError {
            message: e.to_string(),
        }
    }
}

pub struct SqliteBackend {
    path: PathBuf,
    conn: Connection,
    time_reference: TimeReference,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open<P: AsRef<Path>>(path: P, time_reference: TimeReference) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('time_reference', ?1)",
            params![time_reference.as_str()],
        )?;

        let version: String = conn.query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )?;
        if version.parse::<u32>().ok() != Some(SCHEMA_VERSION) {
            return Err(DailiesError::CorruptStorageError {
                path,
                reason: format!("unsupported schema version {}", version),
            });
        }

        let stored: String = conn.query_row(
            "SELECT value FROM schema_meta WHERE key = 'time_reference'",
            [],
            |row| row.get(0),
        )?;
        let stored: TimeReference = stored.parse()?;
        if stored != time_reference {
            return Err(DailiesError::ConfigError {
                message: format!(
                    "{} stores days in {} time but {} was configured",
                    path.display(),
                    stored,
                    time_reference
                ),
            });
        }

        tracing::debug!("Opened SQLite commission store at {}", path.display());
        Ok(Self {
            path,
            conn,
            time_reference,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema_version(&self) -> Result<Option<u32>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|v| v.parse().ok()))
    }
}

impl CommissionBackend for SqliteBackend {
    fn time_reference(&self) -> TimeReference {
        self.time_reference
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn load_day(&self, day: DayKey) -> Result<Vec<Commission>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, realm, rewards, day, created_at_ms, completed \
             FROM commissions WHERE day = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![day.to_string()], row_to_raw)?;

        let mut commissions = Vec::new();
        for row in rows {
            commissions.push(row?.into_commission(&self.path)?);
        }
        Ok(commissions)
    }

    fn insert(&mut self, draft: CommissionDraft) -> Result<Commission> {
        self.conn.execute(
            "INSERT INTO commissions (description, realm, rewards, day, created_at_ms, completed) \
             VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            params![
                draft.description,
                draft.realm,
                draft.rewards.to_payload(),
                draft.date.to_string(),
                draft.created_at_ms
            ],
        )?;
        let id = CommissionId(self.conn.last_insert_rowid());
        Ok(draft.into_commission(id))
    }

    fn mark_completed(&mut self, id: CommissionId) -> Result<Option<bool>> {
        let tx = self.conn.transaction()?;
        let current: Option<bool> = tx
            .query_row(
                "SELECT completed FROM commissions WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()?;

        if current == Some(false) {
            tx.execute(
                "UPDATE commissions SET completed = 1 WHERE id = ?1",
                params![id.0],
            )?;
        }
        tx.commit()?;
        Ok(current)
    }

    fn remove(&mut self, id: CommissionId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM commissions WHERE id = ?1", params![id.0])?;
        Ok(rows > 0)
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| DailiesError::from(e))
    }
}

struct RawRow {
    id: i64,
    description: String,
    realm: String,
    rewards: String,
    day: String,
    created_at_ms: i64,
    completed: bool,
}

impl RawRow {
    fn into_commission(self, path: &Path) -> Result<Commission> {
        let corrupt = |reason: String| DailiesError::CorruptStorageError {
            path: path.to_path_buf(),
            reason: format!("row {}: {}", self.id, reason),
        };
        let rewards = Rewards::parse(&self.rewards).map_err(|e| corrupt(e.to_string()))?;
        let date: DayKey = self.day.parse().map_err(|e: DailiesError| corrupt(e.to_string()))?;

        Ok(Commission {
            id: CommissionId(self.id),
            description: self.description,
            realm: self.realm,
            rewards,
            date,
            created_at_ms: self.created_at_ms,
            completed: self.completed,
        })
    }
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        description: row.get(1)?,
        realm: row.get(2)?,
        rewards: row.get(3)?,
        day: row.get(4)?,
        created_at_ms: row.get(5)?,
        completed: row.get(6)?,
    })
}
