use crate::records::{DurationRecord, TimeRecord};
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Maximum number of entries kept per history.
pub const HISTORY_CAPACITY: usize = 10;

pub const TIME_HISTORY_KEY: &str = "timeHistory";
pub const END_HISTORY_KEY: &str = "endTimeHistory";

/// Flat string key-value storage, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Reads `key`, lets `f` compute its replacement and writes that back as
    /// one step. `None` from `f` removes the key.
    fn update<F>(&mut self, key: &str, f: F) -> Result<()>
    where
        Self: Sized,
        F: FnOnce(Option<&str>) -> Result<Option<String>>,
    {
        let current = self.get(key)?;
        match f(current.as_deref())? {
            Some(value) => self.set(key, &value),
            None => self.remove(key),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key-value store backed by a single JSON object on disk.
///
/// Every write re-reads the file under an exclusive lock, applies the change
/// and replaces the file atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    lock_path: PathBuf,
    data_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(lock_path: PathBuf, data_path: PathBuf) -> Self {
        Self {
            lock_path,
            data_path,
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    fn read_all(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path).context("Failed to read history file")?;

        // Handle empty file case
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).context("Failed to parse history JSON")
    }

    fn write_all(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize history")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    fn with_lock<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<R>,
    {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.lock_path)
            .context("Failed to open lock file")?;

        file.lock_exclusive().context("Failed to acquire lock")?;

        let mut entries = Self::read_all(&self.data_path)?;
        let result = f(&mut entries);
        if result.is_ok() {
            Self::write_all(&self.data_path, &entries)?;
        }

        file.unlock().context("Failed to unlock")?;

        result
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(Self::read_all(&self.data_path)?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        tracing::debug!(key, path = %self.data_path.display(), "writing history entry");
        self.with_lock(|entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        tracing::debug!(key, path = %self.data_path.display(), "removing history entry");
        self.with_lock(|entries| {
            entries.remove(key);
            Ok(())
        })
    }

    /// Holds the lock across read, `f` and write so concurrent runs see
    /// each other's changes.
    fn update<F>(&mut self, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(Option<&str>) -> Result<Option<String>>,
    {
        tracing::debug!(key, path = %self.data_path.display(), "updating history entry");
        self.with_lock(|entries| {
            let replacement = f(entries.get(key).map(String::as_str))?;
            match replacement {
                Some(value) => entries.insert(key.to_string(), value),
                None => entries.remove(key),
            };
            Ok(())
        })
    }
}

/// Bounded newest-first list of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History<T> {
    entries: Vec<T>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> History<T> {
    /// Builds a history from stored entries, dropping anything past capacity.
    pub fn from_entries(mut entries: Vec<T>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }

    /// Puts `item` first and evicts the oldest entry when full.
    pub fn push(&mut self, item: T) {
        self.entries.insert(0, item);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn recent(&self, n: usize) -> &[T] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Loads and persists both record histories through a [`KeyValueStore`].
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn parse<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> History<T> {
        let Some(raw) = raw else {
            return History::default();
        };

        match serde_json::from_str::<Vec<T>>(raw) {
            Ok(entries) => History::from_entries(entries),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable history");
                History::default()
            }
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<History<T>> {
        Ok(Self::parse(key, self.store.get(key)?.as_deref()))
    }

    fn save<T: Serialize>(&mut self, key: &str, history: &History<T>) -> Result<()> {
        let raw = serde_json::to_string(history).context("Failed to serialize history")?;
        self.store.set(key, &raw)
    }

    /// Re-reads the stored history, pushes `item` onto it and writes it back
    /// in one store update. Returns the history as written.
    fn push<T>(&mut self, key: &str, item: T) -> Result<History<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut written = History::default();
        self.store.update(key, |raw| {
            let mut history = Self::parse(key, raw);
            history.push(item);
            let raw = serde_json::to_string(&history).context("Failed to serialize history")?;
            written = history;
            Ok(Some(raw))
        })?;
        Ok(written)
    }

    pub fn push_time_record(&mut self, record: TimeRecord) -> Result<History<TimeRecord>> {
        self.push(TIME_HISTORY_KEY, record)
    }

    pub fn push_end_record(&mut self, record: DurationRecord) -> Result<History<DurationRecord>> {
        self.push(END_HISTORY_KEY, record)
    }

    pub fn load_time_history(&self) -> Result<History<TimeRecord>> {
        self.load(TIME_HISTORY_KEY)
    }

    pub fn load_end_history(&self) -> Result<History<DurationRecord>> {
        self.load(END_HISTORY_KEY)
    }

    pub fn save_time_history(&mut self, history: &History<TimeRecord>) -> Result<()> {
        self.save(TIME_HISTORY_KEY, history)
    }

    pub fn save_end_history(&mut self, history: &History<DurationRecord>) -> Result<()> {
        self.save(END_HISTORY_KEY, history)
    }

    pub fn clear_time_history(&mut self) -> Result<()> {
        self.store.remove(TIME_HISTORY_KEY)
    }

    pub fn clear_end_history(&mut self) -> Result<()> {
        self.store.remove(END_HISTORY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::time::ClockTime;
    use chrono::{Local, TimeZone};

    fn record(room: &str) -> TimeRecord {
        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        TimeRecord::new(room, ClockTime::new(22, 36).unwrap(), now).unwrap()
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = History::default();
        for i in 0..12 {
            history.push(i);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.get(0), Some(&11));
        assert_eq!(history.get(9), Some(&2));
        assert_eq!(history.recent(3), &[11, 10, 9]);
        assert_eq!(History::<u8>::default().recent(5), &[] as &[u8]);
    }

    #[test]
    fn test_history_store_round_trip() {
        let mut store = HistoryStore::new(MemoryStore::new());
        let mut history = History::default();
        history.push(record("101"));
        history.push(record("102"));

        store.save_time_history(&history).unwrap();
        let loaded = store.load_time_history().unwrap();
        assert_eq!(loaded, history);
        assert_eq!(loaded.get(0).unwrap().room_number, "102");
        assert!(store.load_end_history().unwrap().is_empty());

        store.clear_time_history().unwrap();
        assert!(store.load_time_history().unwrap().is_empty());
    }

    #[test]
    fn test_push_merges_with_stored_history() {
        let mut store = HistoryStore::new(MemoryStore::new());
        let stale = store.load_time_history().unwrap();
        assert!(stale.is_empty());

        store.push_time_record(record("A")).unwrap();
        let written = store.push_time_record(record("B")).unwrap();

        let rooms: Vec<_> = written.iter().map(|r| r.room_number.as_str()).collect();
        assert_eq!(rooms, ["B", "A"]);
        assert_eq!(store.load_time_history().unwrap(), written);
    }

    #[test]
    fn test_unreadable_history_loads_empty() {
        let mut kv = MemoryStore::new();
        kv.set(TIME_HISTORY_KEY, "{not json").unwrap();
        let store = HistoryStore::new(kv);
        assert!(store.load_time_history().unwrap().is_empty());
    }

    #[test]
    fn test_oversized_history_is_truncated() {
        let mut kv = MemoryStore::new();
        let entries: Vec<TimeRecord> = (0..15).map(|i| record(&i.to_string())).collect();
        kv.set(TIME_HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();
        let store = HistoryStore::new(kv);
        assert_eq!(store.load_time_history().unwrap().len(), HISTORY_CAPACITY);
    }
}
