mod config;
pub mod database;
pub mod memory;

pub use config::{Config, CuesConfig};
pub use database::Database;
pub use memory::MemoryLog;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Outcome of a logged session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Completed,
    Interrupted,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Completed => "completed",
            SessionStatus::Interrupted => "interrupted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(SessionStatus::Completed),
            "interrupted" => Some(SessionStatus::Interrupted),
            _ => None,
        }
    }
}

/// One workout attempt as kept in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub target_minutes: u32,
    pub actual_minutes: u32,
    pub status: SessionStatus,
}

/// Partial update applied to an existing record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub actual_minutes: Option<u32>,
    pub status: Option<SessionStatus>,
}

impl RecordPatch {
    pub fn progress(actual_minutes: u32) -> Self {
        Self {
            actual_minutes: Some(actual_minutes),
            status: Some(SessionStatus::Interrupted),
        }
    }

    pub fn completed(actual_minutes: u32) -> Self {
        Self {
            actual_minutes: Some(actual_minutes),
            status: Some(SessionStatus::Completed),
        }
    }

    pub fn apply(&self, record: &mut SessionRecord) {
        if let Some(minutes) = self.actual_minutes {
            record.actual_minutes = minutes;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}

/// Aggregate over the whole history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub interrupted_sessions: u64,
    pub total_actual_minutes: u64,
}

impl Summary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a SessionRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut acc, r| {
            acc.total_sessions += 1;
            acc.total_actual_minutes += u64::from(r.actual_minutes);
            match r.status {
                SessionStatus::Completed => acc.completed_sessions += 1,
                SessionStatus::Interrupted => acc.interrupted_sessions += 1,
            }
            acc
        })
    }
}

/// Durable, most-recent-first session history.
///
/// The workout runner treats the log as infallible: an `Err` from any of
/// these methods is logged and the timer keeps going.
pub trait SessionLog {
    /// Store a new record and return its id.
    fn append(&mut self, record: SessionRecord) -> Result<String>;

    fn update(&mut self, id: &str, patch: RecordPatch) -> Result<()>;

    /// All records, most recent first.
    fn list(&self) -> Result<Vec<SessionRecord>>;

    fn clear(&mut self) -> Result<()>;

    fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    fn summary(&self) -> Result<Summary> {
        Ok(Summary::from_records(&self.list()?))
    }
}

impl<T: SessionLog + ?Sized> SessionLog for Box<T> {
    fn append(&mut self, record: SessionRecord) -> Result<String> {
        (**self).append(record)
    }

    fn update(&mut self, id: &str, patch: RecordPatch) -> Result<()> {
        (**self).update(id, patch)
    }

    fn list(&self) -> Result<Vec<SessionRecord>> {
        (**self).list()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }

    fn summary(&self) -> Result<Summary> {
        (**self).summary()
    }
}

/// Returns the data directory, creating it if needed.
///
/// `EMOM_DATA_DIR` wins when set. Otherwise `~/.config/emom[-dev]/`, where
/// `EMOM_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("EMOM_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("EMOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("emom-dev")
            } else {
                base_dir.join("emom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
