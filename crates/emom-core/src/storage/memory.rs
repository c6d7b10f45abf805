//! In-memory session log, for tests and ephemeral runs.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{RecordPatch, SessionLog, SessionRecord};
use crate::error::{DatabaseError, Result};

/// Clones share the same records.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    records: Arc<Mutex<Vec<SessionRecord>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Vec<SessionRecord>> {
        // A poisoned lock only means a test panicked mid-write; the data is
        // still a valid Vec.
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionLog for MemoryLog {
    fn append(&mut self, record: SessionRecord) -> Result<String> {
        let id = record.id.clone();
        self.records().insert(0, record);
        Ok(id)
    }

    fn update(&mut self, id: &str, patch: RecordPatch) -> Result<()> {
        let mut records = self.records();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;
        patch.apply(record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.records().clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.records().clear();
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records().len())
    }
}
