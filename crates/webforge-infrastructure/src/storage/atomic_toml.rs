//! Atomic TOML document files.
//!
//! One document per file. Writes go to a temp file that is fsynced and
//! renamed over the target, and read-modify-write cycles hold an exclusive
//! `fs2` lock on a sibling `.lock` file, so each document can be updated
//! atomically even when several writers race on it.
//!
//! Everything here is blocking I/O; async callers wrap it in
//! `tokio::task::spawn_blocking`.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Failures of a single-document file operation.
#[derive(Debug, thiserror::Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
    /// The document does not exist.
    #[error("Document not found: {}", .0.display())]
    Missing(PathBuf),
}

/// A handle to one TOML document on disk.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Writes the document atomically (temp file + fsync + rename).
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Read-modify-write of an existing document under the exclusive lock.
    ///
    /// The document is re-read after the lock is taken, so `f` always sees
    /// the latest stored state. If `f` fails nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `Missing` if the document does not exist.
    pub fn update<R, F>(&self, f: F) -> Result<R, AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<R, AtomicTomlError>,
    {
        let _lock = self.acquire_lock()?;

        let mut data = self
            .load()?
            .ok_or_else(|| AtomicTomlError::Missing(self.path.clone()))?;

        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    /// Like [`update`](Self::update), but starts from `default_value` when
    /// the document does not exist yet.
    pub fn upsert<F>(&self, default_value: T, f: F) -> Result<(), AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicTomlError>,
    {
        let _lock = self.acquire_lock()?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)?;

        Ok(())
    }

    /// Writes a new document, failing if one already exists.
    pub fn create(&self, data: &T) -> Result<(), AtomicTomlError> {
        let _lock = self.acquire_lock()?;

        if self.path.exists() {
            return Err(AtomicTomlError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", self.path.display()),
            )));
        }

        self.save(data)
    }

    /// Deletes the document.
    ///
    /// Returns `false` if it did not exist. The lock file is removed as well:
    /// document ids are never reused, so no later writer can contend on it.
    pub fn remove(&self) -> Result<bool, AtomicTomlError> {
        let lock = self.acquire_lock()?;

        let removed = match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if removed {
            let _ = fs::remove_file(&lock.lock_path);
        }

        Ok(removed)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let parent = self.path.parent().ok_or_else(|| {
            AtomicTomlError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicTomlError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }

    fn acquire_lock(&self) -> Result<FileLock, AtomicTomlError> {
        FileLock::acquire(&self.path)
    }
}

/// Exclusive lock guard, released when dropped.
///
/// The lock file itself stays on disk: deleting it on release would let a
/// waiter and a newcomer lock two different inodes at the same time.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| AtomicTomlError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        use fs2::FileExt;
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        entries: Vec<u32>,
    }

    fn counter() -> Counter {
        Counter {
            name: "test".to_string(),
            entries: Vec::new(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("doc.toml"));

        file.save(&counter()).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, counter());
        assert!(!temp_dir.path().join(".doc.toml.tmp").exists());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("nonexistent.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_update_requires_existing_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());

        let result = file.update(|doc| {
            doc.entries.push(1);
            Ok(())
        });
        assert!(matches!(result, Err(AtomicTomlError::Missing(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("doc.toml"));
        file.save(&counter()).unwrap();

        let result: Result<(), _> = file.update(|doc| {
            doc.entries.push(99);
            Err(AtomicTomlError::Lock("abort".to_string()))
        });
        assert!(result.is_err());
        assert!(file.load().unwrap().unwrap().entries.is_empty());
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("doc.toml"));

        file.upsert(counter(), |doc| {
            doc.entries.push(10);
            Ok(())
        })
        .unwrap();
        file.upsert(counter(), |doc| {
            doc.entries.push(5);
            Ok(())
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().entries, vec![10, 5]);
    }

    #[test]
    fn test_create_refuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("doc.toml"));
        file.create(&counter()).unwrap();
        assert!(file.create(&counter()).is_err());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("doc.toml"));
        file.save(&counter()).unwrap();

        assert!(file.remove().unwrap());
        assert!(!file.remove().unwrap());
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_concurrent_updates_keep_every_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.toml");
        AtomicTomlFile::<Counter>::new(path.clone())
            .save(&counter())
            .unwrap();
        let path = Arc::new(path);

        let handles: Vec<_> = (0..8u32)
            .map(|n| {
                let path = Arc::clone(&path);
                std::thread::spawn(move || {
                    let file = AtomicTomlFile::<Counter>::new(path.as_ref().clone());
                    for i in 0..5u32 {
                        file.update(|doc| {
                            doc.entries.push(n * 100 + i);
                            Ok(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let loaded = AtomicTomlFile::<Counter>::new(path.as_ref().clone())
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(loaded.entries.len(), 40);
    }
}
