//! The environment as a whole is the engine's [`StakingStore`].

use nftstake_store::{Pool, PoolStore, Stake, StakeStore, StakingStore, StoreBatch, StoreError};
use nftstake_types::{PoolId, TokenId};

use crate::LmdbEnvironment;

impl PoolStore for LmdbEnvironment {
    fn get_pool(&self, id: PoolId) -> Result<Option<Pool>, StoreError> {
        self.pool_store().get_pool(id)
    }

    fn iter_pools(&self) -> Result<Vec<Pool>, StoreError> {
        self.pool_store().iter_pools()
    }

    fn next_pool_id(&self) -> Result<PoolId, StoreError> {
        self.pool_store().next_pool_id()
    }

    fn pool_count(&self) -> Result<u64, StoreError> {
        self.pool_store().pool_count()
    }
}

impl StakeStore for LmdbEnvironment {
    fn get_stake(&self, pool: PoolId, token: TokenId) -> Result<Option<Stake>, StoreError> {
        self.stake_store().get_stake(pool, token)
    }

    fn iter_pool_stakes(&self, pool: PoolId) -> Result<Vec<Stake>, StoreError> {
        self.stake_store().iter_pool_stakes(pool)
    }
}

impl StakingStore for LmdbEnvironment {
    fn commit(&self, batch: StoreBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut wb = self.write_batch()?;
        wb.extend(&batch)?;
        wb.commit()?;
        tracing::trace!(
            pools = batch.pools().len(),
            stakes = batch.stakes().len(),
            "committed store batch"
        );
        Ok(())
    }
}
