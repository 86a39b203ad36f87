//! LMDB implementation of PoolStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use nftstake_store::{Pool, PoolStore, StoreError};
use nftstake_types::PoolId;

use crate::meta::read_next_pool_id;
use crate::{decode, LmdbError};

/// Pools are keyed by the big-endian pool id, so iteration is in id order.
pub struct LmdbPoolStore {
    pub(crate) env: Arc<Env>,
    pub(crate) pools_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl PoolStore for LmdbPoolStore {
    fn get_pool(&self, id: PoolId) -> Result<Option<Pool>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .pools_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn iter_pools(&self) -> Result<Vec<Pool>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.pools_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_, val) = entry.map_err(LmdbError::from)?;
            results.push(decode(val)?);
        }
        Ok(results)
    }

    fn next_pool_id(&self) -> Result<PoolId, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(read_next_pool_id(&self.meta_db, &rtxn)?)
    }

    fn pool_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.pools_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
