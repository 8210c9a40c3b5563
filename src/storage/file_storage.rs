use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::id::AvatarId;
use crate::record::{AvatarRecord, PostStatus};
use crate::storage::RecordStore;
use crate::{BubbleChatError, Result};

const LOG_PREFIX: &str = "[file-storage]";
const STORAGE_VERSION: i32 = 1;

/// Avatar records persisted as one JSON document.
///
/// Every mutation is written through to disk right away, so a store
/// opened later on the same path sees it.
pub struct FileRecordStore {
    log_prefix: String,
    label: String,
    path: PathBuf,
    last_id: u64,
    records: BTreeMap<AvatarId, AvatarRecord>,
}

/// On-disk shape of a [`FileRecordStore`].
#[derive(Serialize, Deserialize)]
struct FileRecordData {
    version: i32,
    last_id: u64,
    records: Vec<AvatarRecord>,
}

impl FileRecordStore {
    /// Open a store with a diagnostic label, loading the file if it exists.
    pub fn open(label: String, path: &Path) -> Result<Self> {
        let mut store = Self {
            log_prefix: format!("{} {}", LOG_PREFIX, label),
            label,
            path: PathBuf::from(path),
            last_id: 0,
            records: BTreeMap::new(),
        };
        if store.path.exists() {
            store.read_fs()?;
        } else {
            log::debug!(
                "{} {} does not exist yet, starting empty",
                store.log_prefix,
                store.path.display()
            );
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload everything from disk, dropping the in-memory state.
    pub fn read_fs(&mut self) -> Result<()> {
        let file = File::open(&self.path)?;
        let data: FileRecordData =
            serde_json::from_reader(BufReader::new(file)).map_err(|err| {
                BubbleChatError::Storage(self.label.clone(), err.to_string())
            })?;
        self.verify_version(data.version)?;

        self.records = data
            .records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        let highest = self
            .records
            .keys()
            .next_back()
            .map_or(0, |id| id.0);
        self.last_id = data.last_id.max(highest);

        log::info!(
            "{} {} records have been read",
            self.log_prefix,
            self.records.len()
        );
        Ok(())
    }

    /// Persist the whole store.
    pub fn write_fs(&self) -> Result<()> {
        self.write_records(&self.records, self.last_id)
    }

    /// Write `records` to a sibling temp file and swap it into place, so
    /// the file on disk is always either the old or the new document.
    fn write_records(
        &self,
        records: &BTreeMap<AvatarId, AvatarRecord>,
        last_id: u64,
    ) -> Result<()> {
        let parent_dir = self.path.parent().ok_or_else(|| {
            BubbleChatError::Storage(
                self.label.clone(),
                "Failed to get parent directory".to_owned(),
            )
        })?;
        fs::create_dir_all(parent_dir)?;

        let data = FileRecordData {
            version: STORAGE_VERSION,
            last_id,
            records: records.values().cloned().collect(),
        };
        let temp = TmpFile::create_beside(&self.path)?;
        let mut writer = BufWriter::new(&temp.file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush()?;
        drop(writer);
        temp.file.sync_data()?;
        fs::rename(&temp.path, &self.path)?;

        log::info!(
            "{} {} records have been written",
            self.log_prefix,
            records.len()
        );
        Ok(())
    }

    /// Apply `change` to a copy of the records and adopt the copy only
    /// once it is on disk.
    fn commit<T>(
        &mut self,
        last_id: u64,
        change: impl FnOnce(&mut BTreeMap<AvatarId, AvatarRecord>) -> Result<T>,
    ) -> Result<T> {
        let mut records = self.records.clone();
        let value = change(&mut records)?;
        self.write_records(&records, last_id)?;
        self.records = records;
        self.last_id = last_id;
        Ok(value)
    }

    fn verify_version(&self, version: i32) -> Result<()> {
        match version.cmp(&STORAGE_VERSION) {
            std::cmp::Ordering::Equal => Ok(()),
            std::cmp::Ordering::Greater => Err(BubbleChatError::Storage(
                self.label.clone(),
                "Storage format is newer than the app".to_owned(),
            )),
            std::cmp::Ordering::Less => Err(BubbleChatError::Storage(
                self.label.clone(),
                "Storage format is older than the app".to_owned(),
            )),
        }
    }
}

/// Scratch file next to the store; removed again unless renamed away.
struct TmpFile {
    file: File,
    path: PathBuf,
}

impl TmpFile {
    fn create_beside(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = path.with_file_name(format!(".{}.tmp", name));
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }
}

impl Drop for TmpFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl RecordStore for FileRecordStore {
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
        let last_id = self.last_id + 1;
        let record = AvatarRecord::new(AvatarId(last_id), title, status);
        self.commit(last_id, |records| {
            records.insert(record.id, record.clone());
            Ok(record)
        })
    }

    fn update(&mut self, record: AvatarRecord) -> Result<()> {
        self.commit(self.last_id, |records| {
            let current = records
                .get_mut(&record.id)
                .ok_or(BubbleChatError::NotFound(record.id))?;
            *current = record;
            Ok(())
        })
    }

    fn delete(&mut self, id: AvatarId) -> Result<()> {
        self.commit(self.last_id, |records| {
            records
                .remove(&id)
                .ok_or(BubbleChatError::NotFound(id))?;
            Ok(())
        })
    }
}
