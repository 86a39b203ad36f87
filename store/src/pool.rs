//! Pool record and pool storage trait.

use crate::StoreError;
use nftstake_types::{Address, PoolId, Timestamp};
use serde::{Deserialize, Serialize};

/// A configured reward program.
///
/// Created once, never deleted. `claimed_rewards` only grows and never
/// exceeds `reward_supply`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    /// Account that funded the pool; the only one allowed to deactivate it.
    pub creator: Address,
    /// Collection whose tokens may be staked here.
    pub nft_collection: Address,
    /// Fungible asset paid out as reward.
    pub reward_asset: Address,
    /// Total amount deposited at creation; ceiling on lifetime payout.
    pub reward_supply: u128,
    /// Length of one reward cycle in seconds. Never zero.
    pub cycle_length: u64,
    /// Reward per staked token per completed cycle.
    pub reward_per_cycle: u128,
    /// Lifetime cycle cap per stake; 0 means unbounded.
    pub max_cycles: u64,
    /// No accrual happens after this instant.
    pub ending_date: Timestamp,
    /// Inactive pools reject new stakes but still settle existing ones.
    pub is_active: bool,
    /// Running total paid out from this pool.
    pub claimed_rewards: u128,
    pub created_at: Timestamp,
}

impl Pool {
    /// Reward still available for payout.
    pub fn remaining_supply(&self) -> u128 {
        self.reward_supply.saturating_sub(self.claimed_rewards)
    }

    /// Whether `max_cycles` limits stakes in this pool.
    pub fn is_cycle_capped(&self) -> bool {
        self.max_cycles > 0
    }

    /// Whether the pool accepts new stakes at `now`.
    pub fn accepts_stakes(&self, now: Timestamp) -> bool {
        self.is_active && now < self.ending_date
    }
}

/// Read access to pool records.
pub trait PoolStore {
    fn get_pool(&self, id: PoolId) -> Result<Option<Pool>, StoreError>;

    /// All pools in ascending id order.
    fn iter_pools(&self) -> Result<Vec<Pool>, StoreError>;

    /// The id the next created pool will receive.
    fn next_pool_id(&self) -> Result<PoolId, StoreError>;

    fn pool_count(&self) -> Result<u64, StoreError> {
        self.iter_pools().map(|v| v.len() as u64)
    }
}
