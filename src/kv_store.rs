//! String key-value primitive underneath the document store.
//!
//! Two backends implement [`KeyValueStore`]: the durable LMDB-backed
//! [`crate::local_db_state::AppDbState`] and the in-process [`MemoryStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use crate::app_response::AppResponse;

/// Synchronous get/set over string keys and values.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse>;

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse>;

    /// Read-modify-write of a single key.
    ///
    /// `apply` receives the current value and returns the value to store. If
    /// `apply` fails nothing is written. The default implementation is a plain
    /// get followed by a set; backends with transactions override it so that
    /// both steps happen under one write lock.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Result<String, AppResponse>,
    ) -> Result<(), AppResponse> {
        let current = self.get(key)?;
        let next = apply(current.as_deref())?;
        self.set(key, &next)
    }
}

/// Volatile backend: a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AppResponse> {
        self.entries
            .lock()
            .map_err(|e| AppResponse::DatabaseError(format!("Memory store lock poisoned: {e}")))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Result<String, AppResponse>,
    ) -> Result<(), AppResponse> {
        let mut entries = self.lock()?;
        let next = apply(entries.get(key).map(String::as_str))?;
        entries.insert(key.to_string(), next);
        Ok(())
    }
}
