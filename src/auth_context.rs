//! Current-user state and the register/login/logout transitions.
//!
//! An [`AuthContext`] is built once at start-up with [`AuthContext::init`] and
//! handed to whatever needs identity. It owns the [`WorkoutStore`] so the
//! session pointer in the document and the in-memory user never drift apart.

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::app_response::AppResponse;
use crate::credentials::{hash_password, verify_password};
use crate::kv_store::KeyValueStore;
use crate::workout_model::User;
use crate::workout_store::WorkoutStore;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USERNAME_TAKEN: &str = "Username already exists";

pub struct AuthContext<S> {
    store: WorkoutStore<S>,
    current: Option<User>,
}

impl<S: KeyValueStore> AuthContext<S> {
    /// Restores whoever was logged in when the store was last used.
    pub fn init(store: WorkoutStore<S>) -> Self {
        let current = store.active_session();
        if let Some(user) = &current {
            info!("Restored session for {}", user.username);
        }
        Self { store, current }
    }

    pub fn store(&self) -> &WorkoutStore<S> {
        &self.store
    }

    pub fn into_store(self) -> WorkoutStore<S> {
        self.store
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The current user, or `Unauthorized` when nobody is logged in.
    pub fn require_user(&self) -> Result<&User, AppResponse> {
        self.current
            .as_ref()
            .ok_or_else(|| AppResponse::Unauthorized("No user is logged in".to_string()))
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<User, AppResponse> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppResponse::ValidationError("Username cannot be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AppResponse::ValidationError("Password cannot be empty".to_string()));
        }

        if self.store.find_user_by_username(username).is_some() {
            info!("Registration refused, username taken: {username}");
            return Err(AppResponse::Conflict(USERNAME_TAKEN.to_string()));
        }

        let user = User {
            id: format!("user-{}", Uuid::new_v4()),
            username: username.to_string(),
            password_digest: hash_password(password)?,
            created_at: Utc::now(),
        };

        self.store.save_user(&user);
        self.store.set_active_session(&user.id);
        self.current = Some(user.clone());

        info!("Registered {}", user.username);
        Ok(user)
    }

    /// Unknown user and wrong password fail identically.
    pub fn login(&mut self, username: &str, password: &str) -> Result<User, AppResponse> {
        let user = self
            .store
            .find_user_by_username(username.trim())
            .filter(|user| verify_password(password, &user.password_digest))
            .ok_or_else(|| AppResponse::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        self.store.set_active_session(&user.id);
        self.current = Some(user.clone());

        info!("Logged in {}", user.username);
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.store.clear_session();
        if let Some(user) = self.current.take() {
            info!("Logged out {}", user.username);
        }
    }
}
