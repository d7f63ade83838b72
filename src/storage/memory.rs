//! In-memory store for tests and ephemeral sessions.

use super::KeyValueStore;
use crate::error::AppError;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), AppError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), AppError> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("accessToken", "abc".to_string()).unwrap();
        store
            .set_all(&[("username", "ash".to_string()), ("email", "a@b.c".to_string())])
            .unwrap();
        assert_eq!(store.get("accessToken").as_deref(), Some("abc"));
        assert_eq!(store.len(), 3);

        store.remove_all(&["accessToken", "username", "missing"]).unwrap();
        assert_eq!(store.get("accessToken"), None);
        assert_eq!(store.len(), 1);
    }
}
