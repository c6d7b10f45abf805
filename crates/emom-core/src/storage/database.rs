//! SQLite-backed session history.
//!
//! Records live in a single `sessions` table. Insertion order (the
//! `seq` column) defines recency, so listings come back most recent first
//! regardless of the wall-clock strings stored with each record.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, RecordPatch, SessionLog, SessionRecord, SessionStatus, Summary};
use crate::error::{DatabaseError, Result};

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/emom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("emom.db"))
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    seq            INTEGER PRIMARY KEY AUTOINCREMENT,
                    id             TEXT NOT NULL UNIQUE,
                    title          TEXT NOT NULL DEFAULT '',
                    date           TEXT NOT NULL,
                    start_time     TEXT NOT NULL,
                    target_minutes INTEGER NOT NULL,
                    actual_minutes INTEGER NOT NULL DEFAULT 0,
                    status         TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_status ON sessions(status);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }
}

impl SessionLog for Database {
    fn append(&mut self, record: SessionRecord) -> Result<String> {
        self.conn.execute(
            "INSERT INTO sessions (id, title, date, start_time, target_minutes, actual_minutes, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.title,
                record.date,
                record.start_time,
                record.target_minutes,
                record.actual_minutes,
                record.status.as_str(),
            ],
        )?;
        Ok(record.id)
    }

    fn update(&mut self, id: &str, patch: RecordPatch) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE sessions
             SET actual_minutes = COALESCE(?2, actual_minutes),
                 status = COALESCE(?3, status)
             WHERE id = ?1",
            params![id, patch.actual_minutes, patch.status.map(SessionStatus::as_str)],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(id.to_string()).into());
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, date, start_time, target_minutes, actual_minutes, status
             FROM sessions
             ORDER BY seq DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                SessionRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    date: row.get(2)?,
                    start_time: row.get(3)?,
                    target_minutes: row.get(4)?,
                    actual_minutes: row.get(5)?,
                    status: SessionStatus::Interrupted,
                },
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (mut record, status) = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable session row");
                    continue;
                }
            };
            match SessionStatus::parse(&status) {
                Some(status) => record.status = status,
                None => {
                    tracing::warn!(id = %record.id, status = %status, "skipping session with unknown status");
                    continue;
                }
            }
            records.push(record);
        }
        Ok(records)
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM sessions", [])?;
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get::<_, i64>(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> SessionRecord {
        SessionRecord {
            id: id.into(),
            title: "E2MOM - 1".into(),
            date: "2026-10-18".into(),
            start_time: "18:05".into(),
            target_minutes: 20,
            actual_minutes: 0,
            status: SessionStatus::Interrupted,
        }
    }

    #[test]
    fn append_and_list() {
        let mut db = Database::open_memory().unwrap();
        db.append(record("a")).unwrap();
        db.append(record("b")).unwrap();
        let list = db.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "b");
        assert_eq!(list[1], record("a"));
        assert_eq!(db.count().unwrap(), 2);
    }

    #[test]
    fn update_applies_patch() {
        let mut db = Database::open_memory().unwrap();
        db.append(record("a")).unwrap();
        db.update("a", RecordPatch::progress(4)).unwrap();
        assert_eq!(db.list().unwrap()[0].actual_minutes, 4);
        db.update("a", RecordPatch::completed(20)).unwrap();
        let r = &db.list().unwrap()[0];
        assert_eq!(r.actual_minutes, 20);
        assert_eq!(r.status, SessionStatus::Completed);
    }

    #[test]
    fn partial_patch_keeps_other_fields() {
        let mut db = Database::open_memory().unwrap();
        db.append(record("a")).unwrap();
        db.update(
            "a",
            RecordPatch {
                actual_minutes: None,
                status: Some(SessionStatus::Completed),
            },
        )
        .unwrap();
        let r = &db.list().unwrap()[0];
        assert_eq!(r.actual_minutes, 0);
        assert_eq!(r.status, SessionStatus::Completed);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut db = Database::open_memory().unwrap();
        let err = db.update("nope", RecordPatch::progress(1)).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn rows_with_unknown_status_are_skipped() {
        let mut db = Database::open_memory().unwrap();
        db.append(record("good")).unwrap();
        db.conn()
            .execute(
                "INSERT INTO sessions (id, date, start_time, target_minutes, status)
                 VALUES ('bad', 'x', 'y', 1, 'exploded')",
                [],
            )
            .unwrap();
        let list = db.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "good");
    }

    #[test]
    fn clear_removes_everything() {
        let mut db = Database::open_memory().unwrap();
        db.append(record("a")).unwrap();
        db.clear().unwrap();
        assert!(db.list().unwrap().is_empty());
        assert_eq!(db.summary().unwrap(), Summary::default());
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emom.db");
        {
            let mut db = Database::open_at(&path).unwrap();
            db.append(record("kept")).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.list().unwrap()[0].id, "kept");
    }
}
