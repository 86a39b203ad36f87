//! Write batching: groups pool, stake and counter updates into a single LMDB
//! write transaction.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = env.write_batch()?;
//! batch.put_pool(&pool)?;
//! batch.put_stake(&stake)?;
//! batch.set_next_pool_id(next)?;
//! batch.commit()?;
//! ```
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).

use heed::RwTxn;

use nftstake_store::{Pool, Stake, StoreBatch, StoreError};
use nftstake_types::PoolId;

use crate::environment::LmdbEnvironment;
use crate::meta::NEXT_POOL_ID_KEY;
use crate::stake::stake_key;
use crate::{encode, LmdbError};

pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }

    pub fn put_pool(&mut self, pool: &Pool) -> Result<(), StoreError> {
        let bytes = encode(pool)?;
        self.env
            .pools_db
            .put(&mut self.txn, &pool.id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn put_stake(&mut self, stake: &Stake) -> Result<(), StoreError> {
        let bytes = encode(stake)?;
        self.env
            .stakes_db
            .put(&mut self.txn, &stake_key(stake.pool_id, stake.token_id), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn set_next_pool_id(&mut self, id: PoolId) -> Result<(), StoreError> {
        self.env
            .meta_db
            .put(&mut self.txn, NEXT_POOL_ID_KEY, &id.to_be_bytes())
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Stage every write of a backend-neutral [`StoreBatch`].
    pub fn extend(&mut self, batch: &StoreBatch) -> Result<(), StoreError> {
        for pool in batch.pools() {
            self.put_pool(pool)?;
        }
        for stake in batch.stakes() {
            self.put_stake(stake)?;
        }
        if let Some(id) = batch.next_pool_id() {
            self.set_next_pool_id(id)?;
        }
        Ok(())
    }

    /// Commit all staged writes in one transaction.
    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nftstake_store::{PoolStore, StakeStore};
    use nftstake_types::{Address, Timestamp, TokenId};

    use super::*;

    fn open_test_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        (dir, env)
    }

    fn stake() -> Stake {
        Stake::new(
            PoolId::new(0),
            TokenId::new(1),
            Address::new("owner"),
            Timestamp::new(0),
        )
    }

    #[test]
    fn dropped_batch_is_rolled_back() {
        let (_dir, env) = open_test_env();
        {
            let mut batch = env.write_batch().unwrap();
            batch.put_stake(&stake()).unwrap();
            batch.set_next_pool_id(PoolId::new(4)).unwrap();
        }
        assert_eq!(env.stake_store().get_stake(PoolId::new(0), TokenId::new(1)).unwrap(), None);
        assert_eq!(env.pool_store().next_pool_id().unwrap(), PoolId::FIRST);
    }

    #[test]
    fn extend_stages_every_write() {
        let (_dir, env) = open_test_env();
        let mut changes = StoreBatch::new();
        changes.put_stake(stake());
        changes.set_next_pool_id(PoolId::new(1));

        let mut batch = env.write_batch().unwrap();
        batch.extend(&changes).unwrap();
        batch.commit().unwrap();

        assert!(env.stake_store().get_stake(PoolId::new(0), TokenId::new(1)).unwrap().is_some());
        assert_eq!(env.pool_store().next_pool_id().unwrap(), PoolId::new(1));
    }
}
