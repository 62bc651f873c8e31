//! Configuration for opening the local store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

/// Key under which the whole document is stored.
pub const DEFAULT_STORAGE_KEY: &str = "workout_tracker_data";

/// Default LMDB map size (10 MiB). Plenty for a personal training log.
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;

/// Settings used by [`crate::local_db_state::AppDbState::init`].
///
/// `path` is the base name of the environment; the data lives in the
/// `<path>.lmdb` directory next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_map_size")]
    pub map_size: usize,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            storage_key: default_storage_key(),
            map_size: default_map_size(),
        }
    }

    /// Parses either a JSON config object or a bare path.
    ///
    /// Anything that does not start with `{` is treated as a path, which keeps
    /// the simple `create_app("my_db")` call working.
    pub fn from_json_or_path(raw: &str) -> Result<Self, AppResponse> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            let config: StoreConfig = serde_json::from_str(trimmed)?;
            config.validate()?;
            return Ok(config);
        }

        let config = StoreConfig::new(trimmed);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppResponse> {
        if self.path.as_os_str().is_empty() {
            return Err(AppResponse::ValidationError("Store path cannot be empty".to_string()));
        }
        if self.storage_key.is_empty() {
            return Err(AppResponse::ValidationError("Storage key cannot be empty".to_string()));
        }
        if self.map_size == 0 {
            return Err(AppResponse::ValidationError("Map size must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Directory holding the LMDB data and lock files.
    pub fn env_dir(&self) -> PathBuf {
        let mut dir = self.path.clone().into_os_string();
        dir.push(".lmdb");
        PathBuf::from(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_uses_defaults() {
        let config = StoreConfig::from_json_or_path("gym_log").unwrap();
        assert_eq!(config.path, PathBuf::from("gym_log"));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.map_size, DEFAULT_MAP_SIZE);
        assert_eq!(config.env_dir(), PathBuf::from("gym_log.lmdb"));
    }

    #[test]
    fn json_overrides_fields() {
        let config = StoreConfig::from_json_or_path(
            r#"{"path":"/tmp/log","storage_key":"alt","map_size":4096}"#,
        )
        .unwrap();
        assert_eq!(config.storage_key, "alt");
        assert_eq!(config.map_size, 4096);
    }

    #[test]
    fn rejects_empty_values() {
        assert!(matches!(
            StoreConfig::from_json_or_path("   "),
            Err(AppResponse::ValidationError(_))
        ));
        assert!(matches!(
            StoreConfig::from_json_or_path(r#"{"path":"x","map_size":0}"#),
            Err(AppResponse::ValidationError(_))
        ));
        assert!(matches!(
            StoreConfig::from_json_or_path(r#"{"path": }"#),
            Err(AppResponse::SerializationError(_))
        ));
    }
}
