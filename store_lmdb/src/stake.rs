//! LMDB implementation of StakeStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use nftstake_store::{Stake, StakeStore, StoreError};
use nftstake_types::{PoolId, TokenId};

use crate::{decode, LmdbError};

/// `pool id (8 BE) ‖ token id (8 BE)`; a pool's stakes share an 8-byte prefix.
pub(crate) fn stake_key(pool: PoolId, token: TokenId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&pool.to_be_bytes());
    key[8..].copy_from_slice(&token.to_be_bytes());
    key
}

pub struct LmdbStakeStore {
    pub(crate) env: Arc<Env>,
    pub(crate) stakes_db: Database<Bytes, Bytes>,
}

impl StakeStore for LmdbStakeStore {
    fn get_stake(&self, pool: PoolId, token: TokenId) -> Result<Option<Stake>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .stakes_db
            .get(&rtxn, &stake_key(pool, token))
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn iter_pool_stakes(&self, pool: PoolId) -> Result<Vec<Stake>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = pool.to_be_bytes();
        let iter = self
            .stakes_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_, val) = entry.map_err(LmdbError::from)?;
            results.push(decode(val)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nftstake_types::{Address, Timestamp};

    fn open_test_env() -> (tempfile::TempDir, crate::LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = crate::LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        (dir, env)
    }

    fn stake(pool: u64, token: u64) -> Stake {
        Stake::new(
            PoolId::new(pool),
            TokenId::new(token),
            Address::new("owner"),
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn stake_key_layout() {
        let key = stake_key(PoolId::new(1), TokenId::new(2));
        assert_eq!(&key[..8], &1u64.to_be_bytes());
        assert_eq!(&key[8..], &2u64.to_be_bytes());
    }

    #[test]
    fn put_and_get_stake() {
        let (_dir, env) = open_test_env();
        let store = env.stake_store();
        assert_eq!(store.get_stake(PoolId::new(0), TokenId::new(5)).unwrap(), None);

        let mut batch = env.write_batch().unwrap();
        batch.put_stake(&stake(0, 5)).unwrap();
        batch.commit().unwrap();

        assert_eq!(
            store.get_stake(PoolId::new(0), TokenId::new(5)).unwrap(),
            Some(stake(0, 5))
        );
    }

    #[test]
    fn prefix_scan_is_scoped_to_one_pool() {
        let (_dir, env) = open_test_env();
        let mut batch = env.write_batch().unwrap();
        for (pool, token) in [(0, 1), (0, 3), (1, 2), (2, 0)] {
            batch.put_stake(&stake(pool, token)).unwrap();
        }
        batch.commit().unwrap();

        let tokens: Vec<u64> = env
            .stake_store()
            .iter_pool_stakes(PoolId::new(0))
            .unwrap()
            .iter()
            .map(|s| s.token_id.value())
            .collect();
        assert_eq!(tokens, vec![1, 3]);
        assert!(env.stake_store().iter_pool_stakes(PoolId::new(9)).unwrap().is_empty());
    }
}
