//! Key-value store collaborators.
//!
//! The portal hands every page and the orchestrator the same process-wide
//! string map. It must survive full page navigations, which is why the CLI
//! harness backs it with redb while tests use the in-memory fake.
//!
//! # Table design
//!
//! `RedbStore` keeps a single `KV` table of `&str → &str`. Each write is its
//! own committed transaction, so readers never observe a torn value.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use redb::{Database, TableDefinition};

use crate::error::{Result, TourError};

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

/// Durable, synchronous string map shared by the orchestrator and every page.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
    /// All keys starting with `prefix`, in lexical order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the full map, for assertions.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// RedbStore
// ---------------------------------------------------------------------------

const KV: TableDefinition<&str, &str> = TableDefinition::new("kv");

fn store_err(e: impl std::fmt::Display) -> TourError {
    TourError::Store(e.to_string())
}

/// File-backed store that outlives the process, standing in for browser
/// storage across full page loads.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(store_err)?;
        // Ensure the table exists before any reads
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(KV).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(KV).map_err(store_err)?;
        let value = table.get(key).map_err(store_err)?;
        Ok(value.map(|v| v.value().to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(KV).map_err(store_err)?;
            table.insert(key, value).map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(KV).map_err(store_err)?;
            table.remove(key).map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(KV).map_err(store_err)?;

        let mut result = Vec::new();
        for entry in table.range(prefix..).map_err(store_err)? {
            let (k, _) = entry.map_err(store_err)?;
            let key = k.value();
            if !key.starts_with(prefix) {
                break;
            }
            result.push(key.to_string());
        }
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, RedbStore) {
        let dir = TempDir::new().unwrap();
        let store = RedbStore::open(&dir.path().join(".tour/store.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("tour:mode").unwrap(), None);
        store.set("tour:mode", "full").unwrap();
        assert_eq!(store.get("tour:mode").unwrap().as_deref(), Some("full"));
        store.remove("tour:mode").unwrap();
        store.remove("tour:mode").unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn redb_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("tour:queue", r#"["/student/grades"]"#).unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get("tour:queue").unwrap().as_deref(),
            Some(r#"["/student/grades"]"#)
        );
    }

    #[test]
    fn redb_store_remove_missing_is_ok() {
        let (_dir, store) = open_tmp();
        store.remove("tour:launch").unwrap();
        assert_eq!(store.get("tour:launch").unwrap(), None);
    }

    #[test]
    fn prefix_scan_stops_at_prefix_boundary() {
        let (_dir, store) = open_tmp();
        store.set("theme", "dark").unwrap();
        store.set("tour:mode", "full").unwrap();
        store.set("tour:launch", "admin:full").unwrap();
        store.set("tourist", "x").unwrap();

        let keys = store.keys_with_prefix("tour:").unwrap();
        assert_eq!(keys, vec!["tour:launch", "tour:mode"]);
    }
}
