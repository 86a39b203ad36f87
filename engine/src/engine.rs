//! The staking engine: pools, custody, and reward settlement.

use crate::calculator::{self, Accrual};
use crate::error::StakingError;
use crate::ledger;
use crate::pool::{load_pool, PoolConfig};
use crate::receipt::{ClaimReceipt, Settlement, TokenPayout};
use nftstake_assets::{NftRegistry, RewardLedger};
use nftstake_store::{Pool, Stake, StakingStore, StoreBatch};
use nftstake_types::{Address, Clock, PoolId, Timestamp, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

/// Engine identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Account that holds staked tokens and deposited rewards in custody.
    pub custody: Address,
}

/// Pool and stake state after a settlement, plus what it pays.
struct Settled {
    pool: Pool,
    stakes: Vec<Stake>,
    receipt: ClaimReceipt,
}

/// The staking engine.
///
/// All state lives in the injected [`StakingStore`]; the engine itself only
/// holds locks. Mutations of a pool run under that pool's write lock for the
/// whole operation, external transfers included, so no reader or writer ever
/// sees a half-applied claim, entry, or exit. Queries take the read lock.
pub struct StakingEngine {
    custody: Address,
    store: Arc<dyn StakingStore>,
    nfts: Arc<dyn NftRegistry>,
    rewards: Arc<dyn RewardLedger>,
    clock: Arc<dyn Clock>,
    pool_locks: Mutex<HashMap<PoolId, Arc<RwLock<()>>>>,
    /// Serializes pool id allocation.
    creation: Mutex<()>,
}

impl StakingEngine {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn StakingStore>,
        nfts: Arc<dyn NftRegistry>,
        rewards: Arc<dyn RewardLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            custody = %config.custody,
            nft_registry = nfts.name(),
            reward_ledger = rewards.name(),
            "staking engine ready"
        );
        Self {
            custody: config.custody,
            store,
            nfts,
            rewards,
            clock,
            pool_locks: Mutex::new(HashMap::new()),
            creation: Mutex::new(()),
        }
    }

    /// The custody account users approve as operator and creators fund.
    pub fn custody(&self) -> &Address {
        &self.custody
    }

    fn locks(&self) -> MutexGuard<'_, HashMap<PoolId, Arc<RwLock<()>>>> {
        self.pool_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock of an existing pool. Pools created before a reopen get theirs
    /// once the store confirms they exist; unknown ids never get an entry.
    fn pool_lock(&self, id: PoolId) -> Result<Arc<RwLock<()>>, StakingError> {
        if let Some(lock) = self.locks().get(&id) {
            return Ok(Arc::clone(lock));
        }
        if self.store.get_pool(id)?.is_none() {
            return Err(StakingError::PoolNotFound(id));
        }
        Ok(Arc::clone(self.locks().entry(id).or_default()))
    }

    // ── Pool store ──────────────────────────────────────────────────────

    /// Create and fund a pool.
    ///
    /// Pulls `reward_supply` of the reward asset from `creator` into custody
    /// (the creator must have granted the custody account an allowance). The
    /// pool id is only consumed once funding succeeds.
    pub fn create_pool(
        &self,
        creator: &Address,
        config: PoolConfig,
    ) -> Result<PoolId, StakingError> {
        let now = self.clock.now();
        config.validate(now)?;

        let _creation = self.creation.lock().unwrap_or_else(PoisonError::into_inner);
        let id = self.store.next_pool_id()?;
        let next = id.next().ok_or(StakingError::Overflow)?;

        self.rewards
            .transfer_from(
                &config.reward_asset,
                &self.custody,
                creator,
                &self.custody,
                config.reward_supply,
            )
            .map_err(|e| StakingError::InsufficientFunding(e.to_string()))?;

        let pool = config.into_pool(id, creator.clone(), now);
        let mut batch = StoreBatch::new();
        batch.put_pool(pool.clone());
        batch.set_next_pool_id(next);
        if let Err(e) = self.store.commit(batch) {
            self.refund_supply(&pool);
            return Err(e.into());
        }
        self.locks().insert(id, Arc::default());

        info!(
            pool = %id,
            creator = %creator,
            collection = %pool.nft_collection,
            reward_supply = pool.reward_supply,
            cycle_length = pool.cycle_length,
            reward_per_cycle = pool.reward_per_cycle,
            max_cycles = pool.max_cycles,
            ending_date = %pool.ending_date,
            "pool created"
        );
        Ok(id)
    }

    /// Stop a pool from accepting new stakes. Existing stakes keep accruing
    /// until `ending_date` and may still be claimed or exited.
    ///
    /// Idempotent; only the creator may call it.
    pub fn deactivate_pool(&self, caller: &Address, id: PoolId) -> Result<(), StakingError> {
        let lock = self.pool_lock(id)?;
        let _guard = lock.write().unwrap_or_else(PoisonError::into_inner);

        let mut pool = load_pool(self.store.as_ref(), id)?;
        if pool.creator != *caller {
            return Err(StakingError::NotPoolCreator { pool: id });
        }
        if !pool.is_active {
            return Ok(());
        }
        pool.is_active = false;
        let mut batch = StoreBatch::new();
        batch.put_pool(pool);
        self.store.commit(batch)?;
        info!(pool = %id, "pool deactivated");
        Ok(())
    }

    pub fn get_pool(&self, id: PoolId) -> Result<Pool, StakingError> {
        let lock = self.pool_lock(id)?;
        let _guard = lock.read().unwrap_or_else(PoisonError::into_inner);
        load_pool(self.store.as_ref(), id)
    }

    /// Total reward paid out of a pool so far.
    pub fn claimed_pool_rewards(&self, id: PoolId) -> Result<u128, StakingError> {
        Ok(self.get_pool(id)?.claimed_rewards)
    }

    /// Every pool in ascending id order, each read under its own lock.
    pub fn list_pools(&self) -> Result<Vec<Pool>, StakingError> {
        self.store
            .iter_pools()?
            .into_iter()
            .map(|pool| self.get_pool(pool.id))
            .collect()
    }

    // ── Stake ledger ────────────────────────────────────────────────────

    /// Move `tokens` from `owner` into custody and start accruing for each.
    ///
    /// All-or-nothing: if any token fails a check or a transfer, tokens
    /// already moved are handed back and no stake is recorded.
    pub fn enter_staking(
        &self,
        owner: &Address,
        pool_id: PoolId,
        tokens: &[TokenId],
    ) -> Result<Vec<Stake>, StakingError> {
        ledger::ensure_unique(tokens)?;
        let lock = self.pool_lock(pool_id)?;
        let _guard = lock.write().unwrap_or_else(PoisonError::into_inner);

        let now = self.clock.now();
        let pool = load_pool(self.store.as_ref(), pool_id)?;
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        if !pool.accepts_stakes(now) {
            return Err(StakingError::PoolInactive(pool_id));
        }

        for &token in tokens {
            if let Some(existing) = self.store.get_stake(pool_id, token)? {
                if existing.active {
                    return Err(StakingError::TokenAlreadyStaked { token });
                }
            }
            if self.nfts.owner_of(&pool.nft_collection, token)? != *owner {
                return Err(StakingError::NotTokenOwner { token });
            }
        }
        self.ensure_operator(&pool, owner)?;

        let mut moved = Vec::with_capacity(tokens.len());
        for &token in tokens {
            if let Err(e) = self.nfts.transfer(
                &pool.nft_collection,
                &self.custody,
                owner,
                &self.custody,
                token,
            ) {
                warn!(pool = %pool_id, token = %token, error = %e, "custody transfer failed");
                self.release_tokens(&pool, owner, &moved);
                return Err(e.into());
            }
            moved.push(token);
        }

        let stakes: Vec<Stake> = tokens
            .iter()
            .map(|&token| Stake::new(pool_id, token, owner.clone(), now))
            .collect();
        let mut batch = StoreBatch::new();
        for stake in &stakes {
            batch.put_stake(stake.clone());
        }
        if let Err(e) = self.store.commit(batch) {
            self.release_tokens(&pool, owner, &moved);
            return Err(e.into());
        }

        info!(pool = %pool_id, owner = %owner, tokens = tokens.len(), at = %now, "tokens staked");
        Ok(stakes)
    }

    /// Settle and pay everything `tokens` have accrued, then return them to
    /// `owner` and close their stakes.
    pub fn exit_staking(
        &self,
        owner: &Address,
        pool_id: PoolId,
        tokens: &[TokenId],
    ) -> Result<ClaimReceipt, StakingError> {
        ledger::ensure_unique(tokens)?;
        let lock = self.pool_lock(pool_id)?;
        let _guard = lock.write().unwrap_or_else(PoisonError::into_inner);

        let now = self.clock.now();
        let pool = load_pool(self.store.as_ref(), pool_id)?;
        if tokens.is_empty() {
            return Ok(ClaimReceipt::empty(pool_id, owner.clone()));
        }
        let stakes = ledger::load_owned_stakes(self.store.as_ref(), pool_id, owner, tokens)?;
        // Compensation moves tokens back into custody on the owner's behalf.
        self.ensure_operator(&pool, owner)?;

        let settled = settle(&pool, &stakes, owner, now, true)?;
        self.store.commit(changes(&pool, &stakes, &settled))?;

        let mut released = Vec::with_capacity(tokens.len());
        for &token in tokens {
            if let Err(e) = self.nfts.transfer(
                &pool.nft_collection,
                &self.custody,
                &self.custody,
                owner,
                token,
            ) {
                warn!(pool = %pool_id, token = %token, error = %e, "release transfer failed");
                self.reclaim_tokens(&pool, owner, &released);
                self.restore(&pool, &stakes);
                return Err(e.into());
            }
            released.push(token);
        }

        let total = settled.receipt.total();
        if let Err(e) = self.pay(&pool, owner, total) {
            self.reclaim_tokens(&pool, owner, &released);
            self.restore(&pool, &stakes);
            return Err(e);
        }

        info!(
            pool = %pool_id,
            owner = %owner,
            tokens = tokens.len(),
            paid = total,
            at = %now,
            "tokens unstaked"
        );
        Ok(settled.receipt)
    }

    /// Current stake records for `tokens`, including exited ones.
    pub fn get_stakes(
        &self,
        pool_id: PoolId,
        tokens: &[TokenId],
    ) -> Result<Vec<Stake>, StakingError> {
        let lock = self.pool_lock(pool_id)?;
        let _guard = lock.read().unwrap_or_else(PoisonError::into_inner);
        load_pool(self.store.as_ref(), pool_id)?;
        ledger::load_stakes(self.store.as_ref(), pool_id, tokens)
    }

    /// Tokens `owner` currently has staked in a pool.
    pub fn staked_tokens(
        &self,
        pool_id: PoolId,
        owner: &Address,
    ) -> Result<Vec<TokenId>, StakingError> {
        let lock = self.pool_lock(pool_id)?;
        let _guard = lock.read().unwrap_or_else(PoisonError::into_inner);
        load_pool(self.store.as_ref(), pool_id)?;
        ledger::staked_tokens(self.store.as_ref(), pool_id, owner)
    }

    // ── Rewards ─────────────────────────────────────────────────────────

    /// What [`StakingEngine::claim_reward`] would pay for `tokens` right now,
    /// per token in batch order. Exited stakes report zero.
    pub fn calculate_rewards(
        &self,
        pool_id: PoolId,
        tokens: &[TokenId],
    ) -> Result<Vec<u128>, StakingError> {
        ledger::ensure_unique(tokens)?;
        let lock = self.pool_lock(pool_id)?;
        let _guard = lock.read().unwrap_or_else(PoisonError::into_inner);

        let now = self.clock.now();
        let pool = load_pool(self.store.as_ref(), pool_id)?;
        let stakes = ledger::load_stakes(self.store.as_ref(), pool_id, tokens)?;
        Ok(calculator::accrue_batch(&pool, &stakes, now)
            .iter()
            .map(|a| a.amount)
            .collect())
    }

    /// Pay out what `tokens` have accrued in one aggregated transfer.
    ///
    /// Tokens with nothing due are reported as [`Settlement::NothingToClaim`]
    /// and keep their accrual window untouched.
    pub fn claim_reward(
        &self,
        owner: &Address,
        pool_id: PoolId,
        tokens: &[TokenId],
    ) -> Result<ClaimReceipt, StakingError> {
        ledger::ensure_unique(tokens)?;
        let lock = self.pool_lock(pool_id)?;
        let _guard = lock.write().unwrap_or_else(PoisonError::into_inner);

        let now = self.clock.now();
        let pool = load_pool(self.store.as_ref(), pool_id)?;
        if tokens.is_empty() {
            return Ok(ClaimReceipt::empty(pool_id, owner.clone()));
        }
        let stakes = ledger::load_owned_stakes(self.store.as_ref(), pool_id, owner, tokens)?;

        let settled = settle(&pool, &stakes, owner, now, false)?;
        let batch = changes(&pool, &stakes, &settled);
        if batch.is_empty() {
            debug!(pool = %pool_id, owner = %owner, "nothing to claim");
            return Ok(settled.receipt);
        }
        self.store.commit(batch)?;

        let total = settled.receipt.total();
        if let Err(e) = self.pay(&pool, owner, total) {
            self.restore(&pool, &stakes);
            return Err(e);
        }

        info!(
            pool = %pool_id,
            owner = %owner,
            tokens = tokens.len(),
            paid = total,
            claimed_total = settled.pool.claimed_rewards,
            at = %now,
            "rewards claimed"
        );
        Ok(settled.receipt)
    }

    // ── Transfers and compensation ──────────────────────────────────────

    fn ensure_operator(&self, pool: &Pool, owner: &Address) -> Result<(), StakingError> {
        if self
            .nfts
            .is_approved_for_all(&pool.nft_collection, owner, &self.custody)?
        {
            Ok(())
        } else {
            Err(StakingError::OperatorNotApproved {
                owner: owner.clone(),
                collection: pool.nft_collection.clone(),
            })
        }
    }

    fn pay(&self, pool: &Pool, to: &Address, amount: u128) -> Result<(), StakingError> {
        if amount == 0 {
            return Ok(());
        }
        self.rewards
            .transfer(&pool.reward_asset, &self.custody, to, amount)
            .map_err(|e| {
                warn!(pool = %pool.id, to = %to, amount, error = %e, "reward transfer failed");
                StakingError::InsufficientFunding(e.to_string())
            })
    }

    /// Hand custody tokens back to `owner`.
    fn release_tokens(&self, pool: &Pool, owner: &Address, tokens: &[TokenId]) {
        for &token in tokens {
            if let Err(e) =
                self.nfts
                    .transfer(&pool.nft_collection, &self.custody, &self.custody, owner, token)
            {
                error!(pool = %pool.id, token = %token, error = %e, "could not return token to owner");
            }
        }
    }

    /// Pull tokens just released to `owner` back into custody.
    fn reclaim_tokens(&self, pool: &Pool, owner: &Address, tokens: &[TokenId]) {
        for &token in tokens {
            if let Err(e) =
                self.nfts
                    .transfer(&pool.nft_collection, &self.custody, owner, &self.custody, token)
            {
                error!(pool = %pool.id, token = %token, error = %e, "could not reclaim token");
            }
        }
    }

    fn refund_supply(&self, pool: &Pool) {
        if let Err(e) = self.rewards.transfer(
            &pool.reward_asset,
            &self.custody,
            &pool.creator,
            pool.reward_supply,
        ) {
            error!(pool = %pool.id, error = %e, "could not refund pool deposit");
        }
    }

    /// Write back the records a failed operation had already committed.
    fn restore(&self, pool: &Pool, stakes: &[Stake]) {
        let mut batch = StoreBatch::new();
        batch.put_pool(pool.clone());
        for stake in stakes {
            batch.put_stake(stake.clone());
        }
        if let Err(e) = self.store.commit(batch) {
            error!(pool = %pool.id, error = %e, "could not restore state after failed transfer");
        }
    }
}

/// Apply accruals to a batch of stakes; `exit` also closes them.
fn settle(
    pool: &Pool,
    stakes: &[Stake],
    recipient: &Address,
    now: Timestamp,
    exit: bool,
) -> Result<Settled, StakingError> {
    let accruals = calculator::accrue_batch(pool, stakes, now);
    let mut next_pool = pool.clone();
    let mut next_stakes = Vec::with_capacity(stakes.len());
    let mut payouts = Vec::with_capacity(stakes.len());

    for (stake, accrual) in stakes.iter().zip(&accruals) {
        let mut next = stake.clone();
        calculator::advance(pool, &mut next, accrual);
        if exit {
            next.active = false;
        }
        next_pool.claimed_rewards = next_pool
            .claimed_rewards
            .checked_add(accrual.amount)
            .ok_or(StakingError::Overflow)?;
        debug!(
            pool = %pool.id,
            token = %accrual.token_id,
            cycles = accrual.cycles,
            amount = accrual.amount,
            "accrued"
        );
        payouts.push(payout(accrual));
        next_stakes.push(next);
    }

    Ok(Settled {
        pool: next_pool,
        stakes: next_stakes,
        receipt: ClaimReceipt {
            pool_id: pool.id,
            recipient: recipient.clone(),
            payouts,
        },
    })
}

fn payout(accrual: &Accrual) -> TokenPayout {
    TokenPayout {
        token_id: accrual.token_id,
        cycles: accrual.cycles,
        settlement: if accrual.amount > 0 {
            Settlement::Paid(accrual.amount)
        } else {
            Settlement::NothingToClaim
        },
    }
}

/// Only the records a settlement actually changed.
fn changes(pool: &Pool, stakes: &[Stake], settled: &Settled) -> StoreBatch {
    let mut batch = StoreBatch::new();
    if settled.pool != *pool {
        batch.put_pool(settled.pool.clone());
    }
    for (before, after) in stakes.iter().zip(&settled.stakes) {
        if before != after {
            batch.put_stake(after.clone());
        }
    }
    batch
}
