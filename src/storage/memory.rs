use std::collections::BTreeMap;

use crate::id::AvatarId;
use crate::record::{AvatarRecord, PostStatus};
use crate::storage::RecordStore;
use crate::{BubbleChatError, Result};

/// Records kept in memory for the lifetime of the store.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: BTreeMap<AvatarId, AvatarRecord>,
    last_id: u64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a record under its own id, e.g. to seed fixtures.
    pub fn insert(&mut self, record: AvatarRecord) {
        self.last_id = self.last_id.max(record.id.0);
        self.records.insert(record.id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, id: AvatarId) -> Result<Option<AvatarRecord>> {
        Ok(self.records.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<AvatarRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn create(
        &mut self,
        title: &str,
        status: PostStatus,
    ) -> Result<AvatarRecord> {
        self.last_id += 1;
        let record = AvatarRecord::new(AvatarId(self.last_id), title, status);
        self.records
            .insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&mut self, record: AvatarRecord) -> Result<()> {
        match self.records.get_mut(&record.id) {
            Some(current) => {
                *current = record;
                Ok(())
            }
            None => Err(BubbleChatError::NotFound(record.id)),
        }
    }

    fn delete(&mut self, id: AvatarId) -> Result<()> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or(BubbleChatError::NotFound(id))
    }
}
