//! Store persisted to a JSON file

use super::keyspace::Keyspace;
use super::{KeyType, ListStore};
use crate::error::StoreError;
use bytes::Bytes;
use nix::fcntl::{flock, FlockArg};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Ordered-list store whose keyspace lives in one JSON file
///
/// Every operation loads the file, applies the change and writes it back, so
/// separate runs of the program see each other's queues. The cycle runs under
/// an advisory lock on a `<file>.lock` sibling, shared for reads and exclusive
/// for updates, and each save replaces the file atomically by renaming a
/// fully written temporary file over it.
#[derive(Debug, Clone)]
pub struct FileStore {
    file_path: PathBuf,
    lock_path: PathBuf,
}

/// Held advisory lock; released when the file is closed
struct LockGuard {
    _file: File,
}

impl FileStore {
    /// Create a store backed by the given file (created on first write)
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let mut lock_name = OsString::from(file_path.as_os_str());
        lock_name.push(".lock");

        Self {
            lock_path: PathBuf::from(lock_name),
            file_path,
        }
    }

    /// Get the storage file path
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Store a plain (non-list) value under a key
    pub fn set(&self, key: &str, value: impl Into<Bytes>) -> Result<(), StoreError> {
        let value = value.into();
        self.update(|keyspace| {
            keyspace.set(key, value);
            Ok(())
        })
    }

    fn load(&self) -> Result<Keyspace, StoreError> {
        if !self.file_path.exists() {
            debug!(
                "Store file not found, starting with an empty keyspace: {}",
                self.file_path.display()
            );
            return Ok(Keyspace::new());
        }

        let contents = fs::read_to_string(&self.file_path)?;
        let keyspace: Keyspace = serde_json::from_str(&contents)?;
        debug!(
            "Loaded {} keys from: {}",
            keyspace.key_count(),
            self.file_path.display()
        );
        Ok(keyspace)
    }

    fn save(&self, keyspace: &Keyspace) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(keyspace)?;

        // Readers never see a partly written file
        let mut temp = NamedTempFile::new_in(self.parent_dir()?)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.file_path).map_err(|e| e.error)?;
        debug!(
            "Saved {} keys to: {}",
            keyspace.key_count(),
            self.file_path.display()
        );
        Ok(())
    }

    // Directory holding the store file, created if it doesn't exist
    fn parent_dir(&self) -> Result<&Path, StoreError> {
        let parent = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        Ok(parent)
    }

    fn lock(&self, arg: FlockArg) -> Result<LockGuard, StoreError> {
        self.parent_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.lock_path)?;
        flock(file.as_raw_fd(), arg).map_err(std::io::Error::from)?;
        Ok(LockGuard { _file: file })
    }

    fn read<R>(&self, f: impl FnOnce(&Keyspace) -> Result<R, StoreError>) -> Result<R, StoreError> {
        let _guard = self.lock(FlockArg::LockShared)?;
        f(&self.load()?)
    }

    // Nothing is written back when `f` fails
    fn update<R>(
        &self,
        f: impl FnOnce(&mut Keyspace) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let _guard = self.lock(FlockArg::LockExclusive)?;
        let mut keyspace = self.load()?;
        let result = f(&mut keyspace)?;
        self.save(&keyspace)?;
        Ok(result)
    }
}

impl ListStore for FileStore {
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.read(|keyspace| Ok(keyspace.exists(key)))
    }

    fn key_type(&self, key: &str) -> Result<KeyType, StoreError> {
        self.read(|keyspace| Ok(keyspace.key_type(key)))
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        self.read(|keyspace| keyspace.keys(pattern))
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let existed = self.update(|keyspace| Ok(keyspace.delete(key)))?;
        if existed {
            info!("Deleted key from {}: {}", self.file_path.display(), key);
        }
        Ok(existed)
    }

    fn create_list(&self, key: &str) -> Result<(), StoreError> {
        self.update(|keyspace| keyspace.create_list(key))
    }

    fn push_back(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        self.update(|keyspace| keyspace.push_back(key, values))
    }

    fn push_front(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        self.update(|keyspace| keyspace.push_front(key, values))
    }

    fn pop_back(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.update(|keyspace| keyspace.pop_back(key))
    }

    fn pop_front(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.update(|keyspace| keyspace.pop_front(key))
    }

    fn len(&self, key: &str) -> Result<usize, StoreError> {
        self.read(|keyspace| keyspace.len(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp_dir = tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().join("nonexistent.json"));
        assert_eq!(
            store.lock_path,
            temp_dir.path().join("nonexistent.json.lock")
        );

        assert!(!store.exists("jobs").unwrap());
        assert_eq!(store.len("jobs").unwrap(), 0);
        assert!(store.keys("*").unwrap().is_empty());
        assert!(!store.file_path().exists());
    }

    #[test]
    fn test_values_persist_across_handles() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("store.json");

        let store = FileStore::new(&file_path);
        store
            .push_back("jobs", &[Bytes::from_static(b"a"), Bytes::from_static(b"b")])
            .unwrap();

        let reopened = FileStore::new(&file_path);
        assert_eq!(reopened.key_type("jobs").unwrap(), KeyType::List);
        assert_eq!(
            reopened.pop_back("jobs").unwrap(),
            Some(Bytes::from_static(b"b"))
        );
        assert_eq!(store.len("jobs").unwrap(), 1);
    }

    #[test]
    fn test_create_parent_directories() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested").join("dir").join("store.json");
        let store = FileStore::new(&file_path);

        store.set("marker", "x").unwrap();
        assert!(file_path.exists());
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("store.json");
        let store = FileStore::new(&file_path);
        store.set("marker", "x").unwrap();
        let before = fs::read_to_string(&file_path).unwrap();

        assert!(store
            .push_back("marker", &[Bytes::from_static(b"a")])
            .is_err());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), before);
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("store.json");
        fs::write(&file_path, "not json").unwrap();

        let store = FileStore::new(&file_path);
        assert!(matches!(store.len("jobs"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_independent_handles_do_not_lose_writes() {
        const PER_WRITER: usize = 100;

        let temp_dir = tempdir().unwrap();
        let file_path = Arc::new(temp_dir.path().join("store.json"));

        // Separate handles share no in-process state, like two program runs
        let writers: Vec<_> = (0..2)
            .map(|writer| {
                let file_path = Arc::clone(&file_path);
                thread::spawn(move || {
                    let store = FileStore::new(file_path.as_path());
                    for i in 0..PER_WRITER {
                        let value = Bytes::from(format!("{}-{}", writer, i));
                        store.push_back("jobs", &[value]).unwrap();
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }

        let store = FileStore::new(file_path.as_path());
        assert_eq!(store.len("jobs").unwrap(), 2 * PER_WRITER);
        let contents = fs::read_to_string(file_path.as_path()).unwrap();
        assert!(serde_json::from_str::<Keyspace>(&contents).is_ok());
    }
}
