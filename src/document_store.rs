//! Whole-document persistence on top of a [`KeyValueStore`].
//!
//! Reads never fail: a missing or unreadable document degrades to an empty
//! one. Write failures are logged and dropped. Callers never see storage
//! errors from this layer.

use chrono::Utc;
use log::{debug, warn};

use crate::app_response::AppResponse;
use crate::kv_store::KeyValueStore;
use crate::workout_model::StoreDocument;

pub struct DocumentStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> DocumentStore<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn read_document(&self) -> StoreDocument {
        match self.backend.get(&self.key) {
            Ok(raw) => parse_or_default(raw.as_deref()),
            Err(e) => {
                warn!("Error reading document '{}': {e}", self.key);
                StoreDocument::default_at(Utc::now())
            }
        }
    }

    /// Stores `doc` as given; the revision is not touched.
    pub fn write_document(&self, doc: &StoreDocument) {
        let json = match serde_json::to_string(doc) {
            Ok(json) => json,
            Err(e) => {
                warn!("Error serializing document '{}': {e}", self.key);
                return;
            }
        };

        if let Err(e) = self.backend.set(&self.key, &json) {
            warn!("Error writing document '{}': {e}", self.key);
        }
    }

    /// Read-modify-write under a single backend update.
    ///
    /// Bumps the revision. Returns `None`, after logging, when the write did
    /// not happen.
    pub fn modify<R>(&self, mut change: impl FnMut(&mut StoreDocument) -> R) -> Option<R> {
        let mut outcome = None;

        let result = self.backend.update(&self.key, &mut |raw: Option<&str>| {
            let mut doc = parse_or_default(raw);
            let value = change(&mut doc);
            doc.revision += 1;
            let json = serde_json::to_string(&doc).map_err(AppResponse::from)?;
            outcome = Some(value);
            Ok(json)
        });

        match result {
            Ok(()) => {
                debug!("Document '{}' updated", self.key);
                outcome
            }
            Err(e) => {
                warn!("Error writing document '{}': {e}", self.key);
                None
            }
        }
    }
}

fn parse_or_default(raw: Option<&str>) -> StoreDocument {
    let Some(raw) = raw else {
        return StoreDocument::default_at(Utc::now());
    };

    match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Stored document is unreadable, starting from an empty one: {e}");
            StoreDocument::default_at(Utc::now())
        }
    }
}
