//! LMDB-backed key-value backend.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::kv_store::KeyValueStore;
use crate::store_config::StoreConfig;

/// Name of the single LMDB sub-database holding documents.
const DOCUMENTS_DB: &str = "documents";

/// An open LMDB environment with its `documents` database.
///
/// Every write goes through its own write transaction; LMDB serializes write
/// transactions across threads and processes sharing the environment.
pub struct AppDbState {
    env: Environment,
    db: Database,
    env_dir: PathBuf,
}

impl AppDbState {
    pub fn init(config: &StoreConfig) -> Result<Self, AppResponse> {
        config.validate()?;

        let env_dir = config.env_dir();
        fs::create_dir_all(&env_dir).map_err(|e| {
            AppResponse::DatabaseError(format!(
                "Could not create environment directory {}: {e}",
                env_dir.display()
            ))
        })?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(&env_dir)?;
        let db = env.create_db(Some(DOCUMENTS_DB), DatabaseFlags::empty())?;

        info!("Opened LMDB environment at {}", env_dir.display());
        Ok(Self { env, db, env_dir })
    }

    pub fn env_dir(&self) -> &Path {
        &self.env_dir
    }

    /// Flushes pending writes to disk and drops the environment.
    pub fn close_database(self) -> Result<(), AppResponse> {
        if let Err(e) = self.env.sync(true) {
            warn!("Failed to sync LMDB environment before close: {e}");
            return Err(e.into());
        }
        info!("Closed LMDB environment at {}", self.env_dir.display());
        Ok(())
    }
}

impl KeyValueStore for AppDbState {
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Wrote {} bytes under key {key}", value.len());
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Result<String, AppResponse>,
    ) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        let current = match txn.get(self.db, &key) {
            Ok(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        // Dropping the transaction on error aborts it.
        let next = apply(current.as_deref())?;
        txn.put(self.db, &key, &next, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Updated key {key} ({} bytes)", next.len());
        Ok(())
    }
}
