//! File-based counter store shared across processes.

use crate::counter::SequenceCounter;
use crate::error::{StoreError, StoreResult};
use crate::store::CounterStore;
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

/// A file-backed counter store.
///
/// All counters live in one CBOR-encoded file of [`SequenceCounter`]
/// records. Every mutation takes an exclusive advisory lock, so the
/// increment is atomic across processes as well as threads: independent
/// allocators pointed at the same file never observe the same counter
/// value.
///
/// The advisory lock lives on a `<path>.lock` sibling, not on the counter
/// file itself: writes replace the counter file by rename, and a lock held
/// on a replaced inode would no longer exclude anyone.
///
/// # Durability
///
/// Each increment writes the full record list to a `<path>.tmp` sibling,
/// syncs it, and renames it over the counter file. The counter file
/// therefore always holds a complete record list: a crash mid-write leaves
/// the previous values intact, and a value survives any crash that happens
/// after `increment_and_fetch` returns.
///
/// # Thread Safety
///
/// This store is thread-safe. In-process callers are serialized by an
/// internal mutex; cross-process callers by the advisory file lock.
///
/// # Example
///
/// ```no_run
/// use docuseq_store::{CounterStore, FileStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("counters.cbor")).unwrap();
/// let value = store.increment_and_fetch("users").unwrap();
/// assert!(value >= 1);
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_file: Mutex<File>,
}

impl FileStore {
    /// Opens or creates a counter file at the given path.
    ///
    /// Creates the `<path>.lock` sibling, and the counter file itself if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or created.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(Self::sibling(path, ".lock"))?;

        let store = Self {
            path: path.to_path_buf(),
            lock_file: Mutex::new(lock_file),
        };

        {
            let file = store.lock_file.lock();
            file.lock_exclusive()?;
            let result = if store.path.exists() {
                Ok(())
            } else {
                Self::write_counters(&store.path, &[])
            };
            let _ = fs2::FileExt::unlock(&*file);
            result?;
        }

        Ok(store)
    }

    /// Opens or creates a counter file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be opened.
    pub fn open_with_create_dirs(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying counter file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn read_counters(path: &Path) -> StoreResult<Vec<SequenceCounter>> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        // The writer always lands a complete record list; even an empty
        // list encodes to at least one byte.
        if data.is_empty() {
            return Err(StoreError::corrupted("counter file is empty"));
        }

        ciborium::from_reader(&data[..]).map_err(|e| match e {
            ciborium::de::Error::Io(io) => StoreError::Io(io),
            other => StoreError::corrupted(other.to_string()),
        })
    }

    /// Writes the record list to a temp sibling, syncs it, and renames it
    /// over the counter file, so readers only ever see a complete list.
    fn write_counters(path: &Path, counters: &[SequenceCounter]) -> StoreResult<()> {
        let temp_path = Self::sibling(path, ".tmp");

        let mut file = File::create(&temp_path)?;
        ciborium::into_writer(&counters, &mut file).map_err(|e| match e {
            ciborium::ser::Error::Io(io) => StoreError::Io(io),
            other => StoreError::corrupted(other.to_string()),
        })?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path)?;
        Self::sync_parent_dir(path)?;
        Ok(())
    }

    /// Syncs the directory entry after a rename so the swap is durable.
    #[cfg(unix)]
    fn sync_parent_dir(path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                File::open(parent)?.sync_all()?;
            }
        }
        Ok(())
    }

    // Windows NTFS journaling covers metadata durability; directory fsync
    // is not supported there.
    #[cfg(not(unix))]
    fn sync_parent_dir(_path: &Path) -> StoreResult<()> {
        Ok(())
    }
}

impl CounterStore for FileStore {
    fn increment_and_fetch(&self, sequence_name: &str) -> StoreResult<i64> {
        let file = self.lock_file.lock();
        file.lock_exclusive()?;

        let result = (|| -> StoreResult<i64> {
            let mut counters = Self::read_counters(&self.path)?;
            let value = match counters
                .iter_mut()
                .find(|c| c.sequence_name == sequence_name)
            {
                Some(record) => {
                    *record = record.incremented();
                    record.server_value
                }
                None => {
                    counters.push(SequenceCounter::first(sequence_name));
                    1
                }
            };
            Self::write_counters(&self.path, &counters)?;
            Ok(value)
        })();

        let _ = fs2::FileExt::unlock(&*file);
        result
    }

    fn current(&self, sequence_name: &str) -> StoreResult<Option<i64>> {
        let file = self.lock_file.lock();
        file.lock_shared()?;

        let result = Self::read_counters(&self.path).map(|counters| {
            counters
                .iter()
                .find(|c| c.sequence_name == sequence_name)
                .map(|c| c.server_value)
        });

        let _ = fs2::FileExt::unlock(&*file);
        result
    }
}
