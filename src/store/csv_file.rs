//! Local flat-file backing medium.

use super::RecordStore;
use super::codec;
use crate::errors::{AppError, AppResult};
use crate::models::RecordSet;
use std::fs::{self, File, OpenOptions};
use fs2::FileExt;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the data file with only the header row.
    /// Returns `false` when the file already existed.
    pub fn create_if_missing(&self) -> AppResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.persist(&RecordSet::new())?;
        Ok(true)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }
        Ok(())
    }

    fn unavailable<E: std::fmt::Display>(&self, e: E) -> AppError {
        AppError::StorageUnavailable(format!("{}: {e}", self.path.display()))
    }
}

impl RecordStore for CsvFileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> AppResult<RecordSet> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file not found, starting empty");
                return Ok(RecordSet::new());
            }
            Err(e) => {
                return Err(AppError::ReadFailure(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };

        let set = codec::decode(BufReader::new(file))?;
        debug!(path = %self.path.display(), records = set.len(), "loaded records");
        Ok(set)
    }

    fn persist(&self, set: &RecordSet) -> AppResult<()> {
        self.ensure_parent()?;

        let file = File::create(&self.path).map_err(|e| self.unavailable(e))?;
        codec::encode(BufWriter::new(file), set).map_err(|e| self.unavailable(e))?;

        debug!(path = %self.path.display(), records = set.len(), "persisted records");
        Ok(())
    }

    fn transaction(
        &self,
        apply: &mut dyn FnMut(RecordSet) -> AppResult<RecordSet>,
    ) -> AppResult<RecordSet> {
        self.ensure_parent()?;
        let _lock = FileLock::acquire(self.lock_path())?;

        let current = self.fetch()?;
        let next = apply(current)?;
        self.persist(&next)?;
        Ok(next)
    }
}

/// Exclusive writer lock held on a sibling `<file>.lock` for the whole
/// transaction. The OS releases it if the process dies.
struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    fn acquire(path: PathBuf) -> AppResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| AppError::StorageUnavailable(format!("{}: {e}", path.display())))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(lock = %path.display(), "acquired store lock");
                Ok(Self { file, path })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(AppError::StoreBusy(path.display().to_string()))
            }
            Err(e) => Err(AppError::StorageUnavailable(format!(
                "{}: {e}",
                path.display()
            ))),
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(lock = %self.path.display(), error = %e, "failed to release store lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::env;

    fn temp_data(name: &str) -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("glucolog_store_{name}.csv"));
        fs::remove_file(&path).ok();
        let mut lock = path.clone().into_os_string();
        lock.push(".lock");
        fs::remove_file(PathBuf::from(lock)).ok();
        path
    }

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn load_missing_file_is_empty() {
        let store = CsvFileStore::new(temp_data("missing"));
        let set = store.load();
        assert!(set.is_empty());
        assert_eq!(RecordSet::schema().len(), 4);
    }

    #[test]
    fn load_empty_file_is_empty() {
        let path = temp_data("empty");
        fs::write(&path, "").unwrap();
        assert!(CsvFileStore::new(&path).load().is_empty());
    }

    #[test]
    fn create_if_missing_writes_header_only() {
        let path = temp_data("init");
        let store = CsvFileStore::new(&path);

        assert!(store.create_if_missing().unwrap());
        assert!(!store.create_if_missing().unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Data/Hora,Glicémia (mg/dL),Insulina (U),Notas\n");
    }

    #[test]
    fn persist_then_load_round_trip() {
        let path = temp_data("round_trip");
        let store = CsvFileStore::new(&path);

        let first = Record::new(at(8), 110.0, 2.0, "").unwrap();
        store.persist(&RecordSet::new().append(first.clone())).unwrap();

        let r = Record::new(at(20), 140.0, 3.0, "after dinner").unwrap();
        store.persist(&store.load().append(r.clone())).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.records()[0], first);
        assert_eq!(reloaded.last(), Some(&r));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Data/Hora,"));
        assert!(content.contains("2024-01-01 20:00:00,140,3,after dinner"));
    }

    #[test]
    fn transaction_fails_when_locked_and_leaves_file_untouched() {
        let path = temp_data("locked");
        let store = CsvFileStore::new(&path);
        store.create_if_missing().unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // another writer holds the lock
        let holder = File::create(store.lock_path()).unwrap();
        holder.try_lock_exclusive().unwrap();

        let r = Record::new(at(9), 100.0, 0.0, "").unwrap();
        let res = store.transaction(&mut |set| Ok(set.append(r.clone())));
        assert!(matches!(res, Err(AppError::StoreBusy(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        FileExt::unlock(&holder).unwrap();
        drop(holder);
        store
            .transaction(&mut |set| Ok(set.append(r.clone())))
            .unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn leftover_lock_file_does_not_block_writers() {
        let path = temp_data("stale_lock");
        let store = CsvFileStore::new(&path);

        // left behind by a writer that died mid-transaction
        fs::write(store.lock_path(), "999999\n").unwrap();

        let r = Record::new(at(9), 100.0, 0.0, "").unwrap();
        for _ in 0..3 {
            store
                .transaction(&mut |set| Ok(set.append(r.clone())))
                .unwrap();
        }
        assert_eq!(store.load().len(), 3);
    }

    #[test]
    fn transaction_releases_lock() {
        let path = temp_data("release");
        let store = CsvFileStore::new(&path);

        let r = Record::new(at(9), 100.0, 0.0, "").unwrap();
        store
            .transaction(&mut |set| Ok(set.append(r.clone())))
            .unwrap();
        store
            .transaction(&mut |set| Ok(set.append(r.clone())))
            .unwrap();

        // released: a second handle can take it again
        let other = File::create(store.lock_path()).unwrap();
        other.try_lock_exclusive().unwrap();
        FileExt::unlock(&other).unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn corrupt_file_is_not_overwritten_by_transaction() {
        let path = temp_data("corrupt");
        let garbage = "Data/Hora,Glicémia (mg/dL),Insulina (U),Notas\nnot-a-date,abc,1,\n";
        fs::write(&path, garbage).unwrap();

        let store = CsvFileStore::new(&path);
        assert!(store.load().is_empty());

        let r = Record::new(at(9), 100.0, 0.0, "").unwrap();
        let res = store.transaction(&mut |set| Ok(set.append(r.clone())));
        assert!(matches!(res, Err(AppError::MalformedRecord { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), garbage);
    }

    #[test]
    fn persist_into_unwritable_location_is_storage_unavailable() {
        // a directory cannot be opened as a file
        let dir = env::temp_dir().join("glucolog_store_dir_target");
        fs::create_dir_all(&dir).unwrap();

        let store = CsvFileStore::new(&dir);
        let res = store.persist(&RecordSet::new());
        assert!(matches!(res, Err(AppError::StorageUnavailable(_))));
    }
}
