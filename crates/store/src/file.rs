//! File-based DocumentStore implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::record::{Filter, ID_FIELD, Record, ensure_unique, record_id, record_name};
use crate::traits::{DocumentStore, RecordIter};

/// File-based implementation of DocumentStore.
///
/// # Layout
///
/// ```text
/// {base_dir}/{collection}/{id:020}.json
/// ```
///
/// Each record is a pretty-printed JSON object. Writes go to a temp file and
/// are renamed into place, so readers never see a half-written record. Ids are
/// zero-padded so that directory order is insertion order.
pub struct FileDocumentStore {
    base_dir: PathBuf,
    // Serializes writers so the uniqueness check and the write are atomic.
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Open (creating if needed) a store rooted at `base_dir`.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        tracing::debug!("Opened file store at {}", base_dir.display());
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        if collection.is_empty()
            || collection.starts_with('.')
            || collection.contains(['/', '\\'])
        {
            return Err(StoreError::Unavailable(format!(
                "invalid collection name '{collection}'"
            )));
        }
        Ok(self.base_dir.join(collection))
    }

    fn record_path(dir: &Path, id: u64) -> PathBuf {
        dir.join(format!("{id:020}.json"))
    }

    /// Record files of a collection, sorted by id.
    fn record_files(dir: &Path) -> Result<Vec<(u64, PathBuf)>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id_str) = filename.strip_suffix(".json")
                && let Ok(id) = id_str.parse::<u64>()
            {
                files.push((id, path));
            }
        }

        files.sort_unstable_by_key(|(id, _)| *id);
        Ok(files)
    }

    fn read_record(path: &Path) -> Result<Record> {
        let bytes = fs::read(path)?;
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(record) => Ok(record),
            _ => Err(StoreError::CorruptedData(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }

    fn temp_path(path: &Path) -> PathBuf {
        path.with_extension("json.tmp")
    }

    fn write_temp(temp_path: &Path, record: &Record) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(temp_path, bytes)?;
        Ok(())
    }

    fn write_record(path: &Path, record: &Record) -> Result<()> {
        let temp_path = Self::temp_path(path);
        Self::write_temp(&temp_path, record)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Writes a batch as a unit: every record is staged to a temp file before
    /// any is renamed into place. On failure nothing from the batch remains.
    fn write_batch(batch: &[(PathBuf, Record)]) -> Result<()> {
        let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(batch.len());
        for (path, record) in batch {
            let temp_path = Self::temp_path(path);
            if let Err(err) = Self::write_temp(&temp_path, record) {
                let _ = fs::remove_file(&temp_path);
                Self::discard(&staged, 0);
                return Err(err);
            }
            staged.push((temp_path, path.as_path()));
        }

        for (index, (temp_path, path)) in staged.iter().enumerate() {
            if let Err(err) = fs::rename(temp_path, path) {
                Self::discard(&staged, index);
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Best-effort cleanup of a failed batch: entries before `renamed` were
    /// already moved into place, the rest are still temp files.
    fn discard(staged: &[(PathBuf, &Path)], renamed: usize) {
        for (index, (temp_path, path)) in staged.iter().enumerate() {
            let leftover = if index < renamed { *path } else { temp_path.as_path() };
            if let Err(err) = fs::remove_file(leftover) {
                tracing::warn!("Failed to clean up {}: {}", leftover.display(), err);
            }
        }
    }

    fn load_all(dir: &Path) -> Result<Vec<(u64, PathBuf, Record)>> {
        Self::record_files(dir)?
            .into_iter()
            .map(|(id, path)| {
                let record = Self::read_record(&path)?;
                Ok((id, path, record))
            })
            .collect()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl DocumentStore for FileDocumentStore {
    fn find(&self, collection: &str, filter: &Filter) -> Result<RecordIter> {
        let dir = self.collection_dir(collection)?;
        let files = Self::record_files(&dir)?;
        let filter = filter.clone();

        // Files are read one at a time as the caller advances the iterator.
        let records = files.into_iter().filter_map(move |(_, path)| {
            match Self::read_record(&path) {
                Ok(record) if filter.matches(&record) => Some(Ok(record)),
                Ok(_) => None,
                // Deleted between listing and reading.
                Err(StoreError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => None,
                Err(err) => Some(Err(err)),
            }
        });

        Ok(Box::new(records))
    }

    fn insert_many(&self, collection: &str, records: Vec<Record>) -> Result<usize> {
        let dir = self.collection_dir(collection)?;
        let _guard = self.lock()?;

        let existing = Self::load_all(&dir)?;
        ensure_unique(existing.iter().filter_map(|(_, _, r)| record_name(r)), &records)?;
        if records.is_empty() {
            return Ok(0);
        }
        fs::create_dir_all(&dir)?;

        let mut next_id = existing.last().map_or(0, |(id, _, _)| *id);
        let batch: Vec<(PathBuf, Record)> = records
            .into_iter()
            .map(|mut record| {
                next_id += 1;
                record.insert(ID_FIELD.to_owned(), Value::from(next_id));
                (Self::record_path(&dir, next_id), record)
            })
            .collect();
        Self::write_batch(&batch)?;

        let inserted = batch.len();

        tracing::debug!("Inserted {} record(s) into {}", inserted, dir.display());
        Ok(inserted)
    }

    fn replace_one(&self, collection: &str, filter: &Filter, mut record: Record) -> Result<u64> {
        let dir = self.collection_dir(collection)?;
        let _guard = self.lock()?;

        let existing = Self::load_all(&dir)?;
        let Some(index) = existing.iter().position(|(_, _, r)| filter.matches(r)) else {
            return Ok(0);
        };

        let others = existing
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .filter_map(|(_, (_, _, r))| record_name(r));
        ensure_unique(others, std::slice::from_ref(&record))?;

        let (id, path, current) = &existing[index];
        let id = record_id(current).unwrap_or(*id);
        record.insert(ID_FIELD.to_owned(), Value::from(id));
        Self::write_record(path, &record)?;

        tracing::debug!("Replaced {}", path.display());
        Ok(1)
    }

    fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let dir = self.collection_dir(collection)?;
        let _guard = self.lock()?;

        let mut deleted = 0;
        for (_, path, record) in Self::load_all(&dir)? {
            if filter.matches(&record) {
                fs::remove_file(&path)?;
                deleted += 1;
            }
        }

        tracing::debug!("Deleted {} record(s) from {}", deleted, dir.display());
        Ok(deleted)
    }

    fn collection_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir()
                && let Some(name) = entry.file_name().to_str()
                && !name.starts_with('.')
            {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    fn close(&self) -> Result<()> {
        // Wait for any in-flight writer before reporting closed.
        drop(self.lock()?);
        tracing::debug!("Closed file store at {}", self.base_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileDocumentStore::open(temp_dir.path()).unwrap();
            store
                .insert_many("maps", vec![record(json!({"name": "keep", "zoom": 2}))])
                .unwrap();
            store.close().unwrap();
        }

        let store = FileDocumentStore::open(temp_dir.path()).unwrap();
        let found = store.find_one("maps", &Filter::name("keep")).unwrap().unwrap();
        assert_eq!(found["zoom"], json!(2));
        assert_eq!(store.collection_names().unwrap(), vec!["maps".to_string()]);
    }

    #[test]
    fn ids_continue_after_highest_existing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::open(temp_dir.path()).unwrap();

        store
            .insert_many(
                "maps",
                vec![record(json!({"name": "a"})), record(json!({"name": "b"}))],
            )
            .unwrap();
        store.delete_many("maps", &Filter::name("a")).unwrap();
        store
            .insert_many("maps", vec![record(json!({"name": "c"}))])
            .unwrap();

        let ids: Vec<u64> = store
            .find("maps", &Filter::All)
            .unwrap()
            .map(|r| record_id(&r.unwrap()).unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn corrupted_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::open(temp_dir.path()).unwrap();
        let dir = temp_dir.path().join("maps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(FileDocumentStore::record_path(&dir, 1), b"[1, 2]").unwrap();

        let first = store.find("maps", &Filter::All).unwrap().next().unwrap();
        assert!(matches!(first, Err(StoreError::CorruptedData(_))));
    }

    #[test]
    fn failed_batch_leaves_no_records_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::open(temp_dir.path()).unwrap();
        let dir = temp_dir.path().join("maps");
        // A directory where the second record's temp file should go makes
        // staging fail halfway through the batch.
        let blocker = FileDocumentStore::temp_path(&FileDocumentStore::record_path(&dir, 2));
        fs::create_dir_all(&blocker).unwrap();

        let result = store.insert_many(
            "maps",
            vec![record(json!({"name": "a"})), record(json!({"name": "b"}))],
        );

        assert!(result.is_err());
        assert_eq!(store.find("maps", &Filter::All).unwrap().count(), 0);
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path != &blocker)
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");

        fs::remove_dir(&blocker).unwrap();
        store
            .insert_many("maps", vec![record(json!({"name": "a"}))])
            .unwrap();
        assert_eq!(store.find("maps", &Filter::All).unwrap().count(), 1);
    }

    #[test]
    fn rejected_or_empty_insert_creates_no_collection() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::open(temp_dir.path()).unwrap();

        assert_eq!(store.insert_many("maps", vec![]).unwrap(), 0);
        let repeated = vec![record(json!({"name": "a"})), record(json!({"name": "a"}))];
        assert!(store.insert_many("maps", repeated).is_err());

        assert!(store.collection_names().unwrap().is_empty());
        assert!(!temp_dir.path().join("maps").exists());
    }

    #[test]
    fn rejects_path_like_collection_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::open(temp_dir.path()).unwrap();

        assert!(store.find("../escape", &Filter::All).is_err());
        assert!(store.insert_many("", vec![]).is_err());
    }
}
