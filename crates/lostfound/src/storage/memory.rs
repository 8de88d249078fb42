//! In-memory record store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::error::Result;
use crate::record::PersonRecord;

/// Record store that keeps the list in process memory.
///
/// Holds exactly what the last `save` wrote, so it behaves like the file
/// store without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<PersonRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `records`.
    #[must_use]
    pub fn with_records(records: Vec<PersonRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<Vec<PersonRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[PersonRecord]) -> Result<()> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
