pub mod file_storage;
pub mod memory;

use crate::id::{AttachmentId, AvatarId};
use crate::record::{AvatarRecord, PostStatus};
use crate::{BubbleChatError, Result};

pub use file_storage::FileRecordStore;
pub use memory::MemoryRecordStore;

/// Persistence of avatar records, provided by the host.
pub trait RecordStore {
    /// Look a record up; a missing record is `Ok(None)`.
    fn get(&self, id: AvatarId) -> Result<Option<AvatarRecord>>;

    /// All records in ascending id order.
    fn list(&self) -> Result<Vec<AvatarRecord>>;

    /// Create a record with a fresh, non-zero id and no image.
    fn create(&mut self, title: &str, status: PostStatus)
        -> Result<AvatarRecord>;

    /// Replace an existing record.
    fn update(&mut self, record: AvatarRecord) -> Result<()>;

    /// Remove a record. Nothing else refers to it, so nothing cascades.
    fn delete(&mut self, id: AvatarId) -> Result<()>;

    fn set_image_ref(
        &mut self,
        id: AvatarId,
        image: AttachmentId,
    ) -> Result<()> {
        let mut record = self.require(id)?;
        record.image_ref = Some(image);
        self.update(record)
    }

    fn clear_image_ref(&mut self, id: AvatarId) -> Result<()> {
        let mut record = self.require(id)?;
        record.image_ref = None;
        self.update(record)
    }

    fn set_status(&mut self, id: AvatarId, status: PostStatus) -> Result<()> {
        let mut record = self.require(id)?;
        record.status = status;
        self.update(record)
    }

    fn require(&self, id: AvatarId) -> Result<AvatarRecord> {
        self.get(id)?
            .ok_or(BubbleChatError::NotFound(id))
    }
}
