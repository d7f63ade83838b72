// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file backed store.
//!
//! The whole map is rewritten on every change through a temp file and an
//! atomic rename, so a crash never leaves a half-written session behind.

use super::KeyValueStore;
use crate::error::AppError;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is also treated as
    /// empty and will be overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Session file is corrupt, ignoring");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Storage(format!("Failed to serialize session: {}", e)))?;
        write_atomic(&self.path, json.as_bytes())
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), AppError> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        self.persist(&map)
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before && !self.path.exists() {
            return Ok(());
        }
        match self.persist(&map) {
            Ok(()) => Ok(()),
            // Removed keys must not come back on the next start.
            Err(e) => match fs::remove_file(&self.path) {
                Ok(()) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Rewrite failed, removed session file"
                    );
                    Ok(())
                }
                Err(remove_err) if remove_err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(_) => Err(e),
            },
        }
    }
}
