//! Stake record and stake storage trait.

use crate::StoreError;
use nftstake_types::{Address, PoolId, Timestamp, TokenId};
use serde::{Deserialize, Serialize};

/// One token's stake in one pool, keyed by `(pool_id, token_id)`.
///
/// At most one active record exists per key. Re-staking after an exit
/// overwrites the inactive record with a fresh one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub pool_id: PoolId,
    pub token_id: TokenId,
    /// Account that deposited the token; the only one allowed to claim or exit.
    pub owner: Address,
    pub staked_at: Timestamp,
    /// Start of the not-yet-settled accrual window.
    ///
    /// Advanced by whole cycles only, so `last_claim_at - staked_at` is always
    /// a multiple of the pool's cycle length.
    pub last_claim_at: Timestamp,
    pub active: bool,
}

impl Stake {
    pub fn new(pool_id: PoolId, token_id: TokenId, owner: Address, now: Timestamp) -> Self {
        Self {
            pool_id,
            token_id,
            owner,
            staked_at: now,
            last_claim_at: now,
            active: true,
        }
    }
}

/// Read access to stake records.
pub trait StakeStore {
    fn get_stake(&self, pool: PoolId, token: TokenId) -> Result<Option<Stake>, StoreError>;

    /// Every stake record (active or not) of a pool, in ascending token order.
    fn iter_pool_stakes(&self, pool: PoolId) -> Result<Vec<Stake>, StoreError>;
}
