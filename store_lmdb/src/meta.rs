//! LMDB implementation of MetaStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use nftstake_store::MetaStore;
use nftstake_store::StoreError;
use nftstake_types::PoolId;

use crate::LmdbError;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
pub(crate) const NEXT_POOL_ID_KEY: &[u8] = b"next_pool_id";

pub struct LmdbMetaStore {
    pub(crate) env: Arc<Env>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl MetaStore for LmdbMetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("meta key '{}'", key)))?;
        Ok(val.to_vec())
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .delete(&mut wtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, SCHEMA_VERSION_KEY)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        let bytes = version.to_le_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, SCHEMA_VERSION_KEY, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

/// Read the pool id counter inside an open transaction (0 when unset).
pub(crate) fn read_next_pool_id(
    meta_db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
) -> Result<PoolId, LmdbError> {
    match meta_db.get(txn, NEXT_POOL_ID_KEY)? {
        Some(bytes) => {
            let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                LmdbError::Serialization("next_pool_id has unexpected byte length".into())
            })?;
            Ok(PoolId::from_be_bytes(arr))
        }
        None => Ok(PoolId::FIRST),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_env() -> (tempfile::TempDir, crate::LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = crate::LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        (dir, env)
    }

    #[test]
    fn put_get_delete_meta() {
        let (_dir, env) = open_test_env();
        let store = env.meta_store();

        store.put_meta("operator", b"engine").unwrap();
        assert_eq!(store.get_meta("operator").unwrap(), b"engine".to_vec());

        store.delete_meta("operator").unwrap();
        assert!(matches!(store.get_meta("operator"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn schema_version_round_trips() {
        let (_dir, env) = open_test_env();
        let store = env.meta_store();
        store.set_schema_version(7).unwrap();
        assert_eq!(store.get_schema_version().unwrap(), 7);
    }
}
