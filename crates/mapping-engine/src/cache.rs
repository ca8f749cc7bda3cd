//! Shared cache of loaded mapping tables
//!
//! Entries are keyed by table file path and dropped when the file's
//! modification time changes. Two callers missing at the same time both load;
//! the later insert wins, which is harmless because loading has no side
//! effects.

use crate::error::MappingError;
use crate::table::{MappingTable, TableLoader};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;
use tracing::debug;

#[derive(Debug)]
struct CachedTable {
    modified: SystemTime,
    table: Arc<MappingTable>,
}

#[derive(Debug, Default)]
pub struct TableCache {
    entries: RwLock<HashMap<PathBuf, CachedTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table for `dictionary`, loading it when missing or stale
    pub fn get_or_load(
        &self,
        loader: &TableLoader,
        dictionary: &str,
    ) -> Result<Arc<MappingTable>, MappingError> {
        let path = loader.resolve_path(dictionary)?;
        let modified = modified_time(&path);

        if let Some(modified) = modified {
            if let Some(cached) = self.read().get(&path) {
                if cached.modified == modified {
                    debug!(dictionary = %dictionary, "Mapping table cache hit");
                    return Ok(Arc::clone(&cached.table));
                }
            }
        }

        let table = Arc::new(loader.load_path(dictionary, &path)?);
        match modified {
            Some(modified) => {
                self.write().insert(
                    path,
                    CachedTable {
                        modified,
                        table: Arc::clone(&table),
                    },
                );
            }
            // no usable mtime: never trust a cached copy
            None => {
                self.write().remove(&path);
            }
        }
        Ok(table)
    }

    /// Forget the cached copy of one table file
    pub fn invalidate(&self, path: &Path) {
        self.write().remove(path);
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, CachedTable>> {
        // tables are immutable once inserted, a poisoned map is still consistent
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, CachedTable>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
