//! Pool configuration and validation.

use crate::error::StakingError;
use nftstake_store::{Pool, PoolStore};
use nftstake_types::{Address, PoolId, Timestamp};
use serde::{Deserialize, Serialize};

/// Parameters supplied by a pool creator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub nft_collection: Address,
    pub reward_asset: Address,
    pub reward_supply: u128,
    /// Seconds per reward cycle.
    pub cycle_length: u64,
    pub reward_per_cycle: u128,
    /// Lifetime cycle cap per stake; 0 means unbounded.
    #[serde(default)]
    pub max_cycles: u64,
    pub ending_date: Timestamp,
    /// Whether the pool accepts stakes right away.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl PoolConfig {
    /// Reject configurations that could never pay out or would divide by zero.
    pub fn validate(&self, now: Timestamp) -> Result<(), StakingError> {
        if self.cycle_length == 0 {
            return Err(StakingError::InvalidPoolConfig(
                "cycle length must be positive".into(),
            ));
        }
        if self.reward_per_cycle == 0 {
            return Err(StakingError::InvalidPoolConfig(
                "reward per cycle must be positive".into(),
            ));
        }
        if self.reward_supply == 0 {
            return Err(StakingError::InvalidPoolConfig(
                "reward supply must be positive".into(),
            ));
        }
        if self.ending_date <= now {
            return Err(StakingError::InvalidPoolConfig(format!(
                "ending date {} is not after {}",
                self.ending_date, now
            )));
        }
        Ok(())
    }

    /// Materialise the pool record. Call [`PoolConfig::validate`] first.
    pub fn into_pool(self, id: PoolId, creator: Address, now: Timestamp) -> Pool {
        Pool {
            id,
            creator,
            nft_collection: self.nft_collection,
            reward_asset: self.reward_asset,
            reward_supply: self.reward_supply,
            cycle_length: self.cycle_length,
            reward_per_cycle: self.reward_per_cycle,
            max_cycles: self.max_cycles,
            ending_date: self.ending_date,
            is_active: self.is_active,
            claimed_rewards: 0,
            created_at: now,
        }
    }
}

/// Fetch a pool or fail with [`StakingError::PoolNotFound`].
pub(crate) fn load_pool<S: PoolStore + ?Sized>(store: &S, id: PoolId) -> Result<Pool, StakingError> {
    store.get_pool(id)?.ok_or(StakingError::PoolNotFound(id))
}
