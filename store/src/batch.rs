//! Atomic change sets.

use crate::{Pool, PoolStore, Stake, StakeStore, StoreError};
use nftstake_types::PoolId;

/// A set of record writes applied all-or-nothing by [`StakingStore::commit`].
///
/// Building a batch touches nothing; dropping it without committing leaves
/// the store unchanged.
#[derive(Clone, Debug, Default)]
pub struct StoreBatch {
    pools: Vec<Pool>,
    stakes: Vec<Stake>,
    next_pool_id: Option<PoolId>,
}

impl StoreBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_pool(&mut self, pool: Pool) {
        self.pools.push(pool);
    }

    pub fn put_stake(&mut self, stake: Stake) {
        self.stakes.push(stake);
    }

    pub fn set_next_pool_id(&mut self, id: PoolId) {
        self.next_pool_id = Some(id);
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn stakes(&self) -> &[Stake] {
        &self.stakes
    }

    pub fn next_pool_id(&self) -> Option<PoolId> {
        self.next_pool_id
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty() && self.stakes.is_empty() && self.next_pool_id.is_none()
    }
}

/// The full store the staking engine is injected with.
pub trait StakingStore: PoolStore + StakeStore + Send + Sync {
    /// Apply every write in `batch` atomically, in insertion order.
    fn commit(&self, batch: StoreBatch) -> Result<(), StoreError>;
}
