//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use nftstake_store::{MetaStore, StoreError};

use crate::meta::LmdbMetaStore;
use crate::pool::LmdbPoolStore;
use crate::stake::LmdbStakeStore;
use crate::write_batch::WriteBatch;
use crate::LmdbError;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

pub(crate) const POOLS_DB: &str = "pools";
pub(crate) const STAKES_DB: &str = "stakes";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) pools_db: Database<Bytes, Bytes>,
    pub(crate) stakes_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if missing. A fresh database is stamped with
    /// [`SCHEMA_VERSION`]; a database written by a newer build is refused.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // the memory map is never modified outside of heed transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let pools_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(POOLS_DB))?;
        let stakes_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(STAKES_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        let this = Self {
            env: Arc::new(env),
            pools_db,
            stakes_db,
            meta_db,
        };
        this.check_schema()?;
        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(this)
    }

    fn check_schema(&self) -> Result<(), LmdbError> {
        let meta = self.meta_store();
        let found = meta.get_schema_version().map_err(|e| LmdbError::Heed(e.to_string()))?;
        match found {
            0 => meta
                .set_schema_version(SCHEMA_VERSION)
                .map_err(|e| LmdbError::Heed(e.to_string())),
            v if v > SCHEMA_VERSION => Err(LmdbError::SchemaMismatch {
                found: v,
                supported: SCHEMA_VERSION,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }

    pub fn pool_store(&self) -> LmdbPoolStore {
        LmdbPoolStore {
            env: Arc::clone(&self.env),
            pools_db: self.pools_db,
            meta_db: self.meta_db,
        }
    }

    pub fn stake_store(&self) -> LmdbStakeStore {
        LmdbStakeStore {
            env: Arc::clone(&self.env),
            stakes_db: self.stakes_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }

    /// Begin a write batch. Nothing is visible to readers until
    /// [`WriteBatch::commit`].
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, StoreError> {
        WriteBatch::new(self)
    }

    /// Flush the memory map to disk.
    pub fn sync(&self) -> Result<(), StoreError> {
        self.env.force_sync().map_err(LmdbError::from)?;
        Ok(())
    }
}
