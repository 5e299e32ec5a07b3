//! Process-wide medal table cache.
//!
//! A file is parsed at most once per process, keyed by its canonical path.
//! Entries stay until [`invalidate`] or [`clear`] drops them.

use super::loader::load_table;
use crate::error::DataLoadError;
use crate::models::MedalTable;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

lazy_static! {
    static ref TABLE_CACHE: Mutex<HashMap<PathBuf, Arc<MedalTable>>> = Mutex::new(HashMap::new());
}

fn cache() -> MutexGuard<'static, HashMap<PathBuf, Arc<MedalTable>>> {
    // The map is only ever inserted into or removed from, so a poisoned
    // lock still holds consistent data.
    TABLE_CACHE.lock().unwrap_or_else(|e| e.into_inner())
}

fn cache_key(path: &Path) -> Result<PathBuf, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }
    std::fs::canonicalize(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Return the cached table for `path`, loading it on first access.
pub fn load_cached(path: &Path) -> Result<Arc<MedalTable>, DataLoadError> {
    let key = cache_key(path)?;
    let mut tables = cache();

    if let Some(table) = tables.get(&key) {
        debug!("Medal table cache hit: {}", key.display());
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(load_table(&key)?);
    tables.insert(key, Arc::clone(&table));
    Ok(table)
}

/// Drop the cached table for `path`. Returns whether an entry existed.
#[allow(dead_code)] // Invalidation hook for long-lived callers
pub fn invalidate(path: &Path) -> bool {
    let Ok(key) = std::fs::canonicalize(path) else {
        return false;
    };
    let removed = cache().remove(&key).is_some();
    if removed {
        debug!("Invalidated medal table cache: {}", key.display());
    }
    removed
}

/// Drop every cached table.
#[allow(dead_code)] // Reload hook for long-lived callers
pub fn clear() {
    cache().clear();
}

/// Whether a table for `path` is currently cached.
#[allow(dead_code)] // Cache inspection for long-lived callers and tests
pub fn is_cached(path: &Path) -> bool {
    std::fs::canonicalize(path)
        .map(|key| cache().contains_key(&key))
        .unwrap_or(false)
}
