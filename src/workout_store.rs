//! Typed accessors over the workout document.
//!
//! Each call reads the whole document, works on an in-memory copy and, for
//! mutations, writes the whole document back. Lookups that miss return
//! `None`; storage failures are logged by [`DocumentStore`] and otherwise
//! invisible here.

use log::{debug, info};

use crate::document_store::DocumentStore;
use crate::kv_store::KeyValueStore;
use crate::workout_model::{StoreDocument, User, Workout};

pub struct WorkoutStore<S> {
    documents: DocumentStore<S>,
}

impl<S: KeyValueStore> WorkoutStore<S> {
    pub fn new(backend: S, storage_key: impl Into<String>) -> Self {
        Self { documents: DocumentStore::new(backend, storage_key) }
    }

    pub fn documents(&self) -> &DocumentStore<S> {
        &self.documents
    }

    pub fn into_backend(self) -> S {
        self.documents.into_backend()
    }

    /// Snapshot of everything stored.
    pub fn document(&self) -> StoreDocument {
        self.documents.read_document()
    }

    // ===============================
    // USERS
    // ===============================

    /// Appends `user`. Username uniqueness is the caller's job.
    pub fn save_user(&self, user: &User) {
        self.documents.modify(|doc| doc.users.push(user.clone()));
        info!("Saved user {}", user.id);
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.documents
            .read_document()
            .users
            .into_iter()
            .find(|user| user.username == username)
    }

    // ===============================
    // SESSION
    // ===============================

    pub fn set_active_session(&self, user_id: &str) {
        self.documents.modify(|doc| doc.current_user_id = Some(user_id.to_string()));
    }

    /// The logged-in user, or `None` if nobody is logged in or the pointer
    /// no longer matches a stored user.
    pub fn active_session(&self) -> Option<User> {
        let doc = self.documents.read_document();
        let current = doc.current_user_id?;
        let user = doc.users.into_iter().find(|user| user.id == current);
        if user.is_none() {
            debug!("Session points at unknown user {current}");
        }
        user
    }

    pub fn clear_session(&self) {
        self.documents.modify(|doc| doc.current_user_id = None);
    }

    // ===============================
    // WORKOUTS
    // ===============================

    /// Replaces the workout with the same id in place, or appends it.
    pub fn save_workout(&self, workout: &Workout) {
        self.documents.modify(|doc| {
            match doc.workouts.iter_mut().find(|existing| existing.id == workout.id) {
                Some(existing) => *existing = workout.clone(),
                None => doc.workouts.push(workout.clone()),
            }
        });
        debug!("Saved workout {}", workout.id);
    }

    /// Workouts owned by `user_id`, most recent date first.
    pub fn workouts_for_user(&self, user_id: &str) -> Vec<Workout> {
        let mut workouts: Vec<Workout> = self
            .documents
            .read_document()
            .workouts
            .into_iter()
            .filter(|workout| workout.user_id == user_id)
            .collect();
        workouts.sort_by(|a, b| b.date.cmp(&a.date));
        workouts
    }

    pub fn find_workout(&self, workout_id: &str) -> Option<Workout> {
        self.documents
            .read_document()
            .workouts
            .into_iter()
            .find(|workout| workout.id == workout_id)
    }

    /// Drops every workout with this id. Returns whether any was removed.
    pub fn delete_workout(&self, workout_id: &str) -> bool {
        let removed = self
            .documents
            .modify(|doc| {
                let before = doc.workouts.len();
                doc.workouts.retain(|workout| workout.id != workout_id);
                before - doc.workouts.len()
            })
            .unwrap_or(0);

        if removed > 0 {
            info!("Deleted workout {workout_id}");
        }
        removed > 0
    }
}
