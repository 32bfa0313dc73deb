//! A JSON record file mirrored in memory

use crate::error::{ErrorKind, HoardError, HoardResult};
use crate::store::record::Record;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Default ceiling for a record file (1 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Ordered records of one schema, backed by a single file
#[derive(Debug)]
pub struct RecordStore<R: Record> {
    path: PathBuf,
    records: Vec<R>,
    synced_at: Option<SystemTime>,
    // File mtime observed at the last sync
    synced_mtime: Option<SystemTime>,
    max_bytes: u64,
}

impl<R: Record> RecordStore<R> {
    /// Bind a store to `path` without touching disk
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            synced_at: None,
            synced_mtime: None,
            max_bytes,
        }
    }

    /// Bind a store to `path` and load it if the file exists
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        let mut store = Self::new(path, max_bytes);
        store.sync();
        store
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured file size ceiling in bytes
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// When memory was last known to match disk
    pub fn synced_at(&self) -> Option<SystemTime> {
        self.synced_at
    }

    /// Number of records in memory (no sync)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether memory holds no records (no sync)
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the in-memory records with the file's content
    ///
    /// On any failure the previous records and sync time are kept. Corrupt
    /// content is logged, since it means the file was edited by hand or
    /// written by an incompatible schema.
    pub fn read(&mut self) -> HoardResult<()> {
        let started = SystemTime::now();

        let metadata = fs::metadata(&self.path).map_err(|e| self.open_error(e))?;
        self.check_size(metadata.len())?;
        // Taken before reading: a write racing the read shows up as stale
        let mtime = metadata.modified().ok();

        let content = fs::read(&self.path).map_err(|e| self.open_error(e))?;
        // The file may have grown between stat and read
        self.check_size(content.len() as u64)?;

        let records: Vec<R> = serde_json::from_slice(&content).map_err(|e| {
            warn!("Ignoring corrupt record file {}: {}", self.path.display(), e);
            HoardError::corrupt(&self.path, e)
        })?;

        debug!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        self.records = records;
        self.synced_at = Some(started);
        self.synced_mtime = mtime;
        Ok(())
    }

    /// Overwrite the file with the in-memory records
    ///
    /// Content goes to a temporary sibling first which is then renamed over
    /// the target, so readers see either the old or the new file. Refuses
    /// without touching disk if the serialized form is over the ceiling.
    pub fn write(&mut self) -> HoardResult<()> {
        let content = serde_json::to_vec(&self.records)?;
        self.check_size(content.len() as u64)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                HoardError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        let tmp_path = self.temp_path();
        let mtime = match replace_file(&tmp_path, &self.path, &content) {
            Ok(mtime) => mtime,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&tmp_path) {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
                    }
                }
                return Err(e);
            }
        };

        self.synced_at = Some(SystemTime::now());
        self.synced_mtime = mtime;
        debug!(
            "Wrote {} records ({} bytes) to {}",
            self.records.len(),
            content.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Whether the file changed since the last sync
    ///
    /// Compares the file's modification time with the one seen at the last
    /// read or write, so any change to it counts, including one backwards.
    /// An unknown modification time counts as stale, as does a store that
    /// has never synced.
    pub fn is_stale(&self) -> bool {
        let Some(synced_mtime) = self.synced_mtime else {
            return true;
        };

        match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified != synced_mtime,
            Err(_) => true,
        }
    }

    /// Reload from disk if stale; returns whether a reload happened
    ///
    /// Failures are returned unchanged, leaving memory as it was.
    pub fn try_sync(&mut self) -> HoardResult<bool> {
        if !self.is_stale() {
            return Ok(false);
        }
        self.read().map(|()| true)
    }

    /// Like [`try_sync`](Self::try_sync), but logs failures instead of
    /// returning them
    ///
    /// For readers that are content with the last known records.
    pub fn sync(&mut self) -> bool {
        match self.try_sync() {
            Ok(reloaded) => reloaded,
            Err(e) => {
                match e.kind() {
                    ErrorKind::NotFound => debug!("No record file at {}", self.path.display()),
                    // read() already logged it
                    ErrorKind::Corrupt => {}
                    _ => warn!("Failed to sync {}: {}", self.path.display(), e),
                }
                false
            }
        }
    }

    /// Sync before a mutation
    ///
    /// Only a missing file is an empty starting point. Any other failure
    /// means the file holds records memory does not, and writing would
    /// discard them.
    fn sync_for_write(&mut self) -> HoardResult<()> {
        match self.try_sync() {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No record file at {}, starting empty", self.path.display());
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Refusing to modify {}: it could not be read ({})",
                    self.path.display(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Position of the first in-memory record matching `predicate`
    pub fn find_index<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&R) -> bool,
    {
        self.records.iter().position(predicate)
    }

    /// All records, after a sync
    pub fn records(&mut self) -> &[R] {
        self.sync();
        &self.records
    }

    /// Record stored under `key`, after a sync
    pub fn get(&mut self, key: &R::Key) -> Option<R> {
        self.sync();
        self.find_index(|r| r.key() == *key)
            .map(|i| self.records[i].clone())
    }

    /// Insert `record`, replacing any record with the same key
    ///
    /// Fails without writing if the file exists but cannot be read. Writes
    /// only if something changed. If the write fails the in-memory list is
    /// restored, so memory never holds a change disk refused.
    pub fn upsert(&mut self, record: R) -> HoardResult<()> {
        self.sync_for_write()?;

        let key = record.key();
        match self.find_index(|r| r.key() == key) {
            Some(index) => {
                if self.records[index] == record {
                    return Ok(());
                }
                let previous = std::mem::replace(&mut self.records[index], record);
                if let Err(e) = self.write() {
                    self.records[index] = previous;
                    return Err(e);
                }
            }
            None => {
                self.records.push(record);
                if let Err(e) = self.write() {
                    self.records.pop();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Remove the record stored under `key`; returns whether one existed
    ///
    /// Fails without writing if the file exists but cannot be read.
    pub fn remove(&mut self, key: &R::Key) -> HoardResult<bool> {
        self.sync_for_write()?;

        let Some(index) = self.find_index(|r| r.key() == *key) else {
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.write() {
            self.records.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn check_size(&self, size: u64) -> HoardResult<()> {
        if size > self.max_bytes {
            return Err(HoardError::Oversize {
                path: self.path.clone(),
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    fn open_error(&self, e: std::io::Error) -> HoardError {
        if e.kind() == std::io::ErrorKind::NotFound {
            HoardError::NotFound(self.path.clone())
        } else {
            HoardError::io(format!("reading record file {}", self.path.display()), e)
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("records"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Write `content` to `tmp_path`, flush it, and rename it over `target`
///
/// Returns the new file's modification time, which the rename keeps.
fn replace_file(
    tmp_path: &Path,
    target: &Path,
    content: &[u8],
) -> HoardResult<Option<SystemTime>> {
    let mut file = File::create(tmp_path)
        .map_err(|e| HoardError::io(format!("creating {}", tmp_path.display()), e))?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| HoardError::io(format!("writing {}", tmp_path.display()), e))?;
    let mtime = file.metadata().and_then(|m| m.modified()).ok();
    drop(file);

    fs::rename(tmp_path, target).map_err(|e| {
        HoardError::io(
            format!("replacing {} with {}", target.display(), tmp_path.display()),
            e,
        )
    })?;
    Ok(mtime)
}
