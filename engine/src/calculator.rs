//! Cycle-based reward accrual.
//!
//! Rewards accrue in whole cycles of `cycle_length` seconds measured from a
//! stake's `last_claim_at`. Three limits apply, in order:
//!
//! 1. the accrual window closes at the pool's `ending_date`;
//! 2. a stake never earns more than `max_cycles` cycles over its lifetime
//!    (when the pool sets a cap);
//! 3. a pool never pays out more than its `reward_supply`.
//!
//! A partial cycle carries over: settling advances `last_claim_at` by whole
//! cycles only, so leftover seconds count toward the next cycle.
//!
//! Everything here is pure. The same functions produce both the
//! `calculate_rewards` preview and the amounts `claim_reward` pays, so the
//! two cannot disagree.

use nftstake_store::{Pool, Stake};
use nftstake_types::{Timestamp, TokenId};
use serde::Serialize;

/// Reward due to one stake at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Accrual {
    pub token_id: TokenId,
    /// Whole cycles consumed by settling this accrual.
    pub cycles: u64,
    /// Amount owed after the supply cap.
    pub amount: u128,
}

/// Cycles a stake has already been credited for.
pub fn cycles_credited(pool: &Pool, stake: &Stake) -> u64 {
    if pool.cycle_length == 0 {
        return 0;
    }
    stake.staked_at.elapsed_since(stake.last_claim_at) / pool.cycle_length
}

/// Whole cycles a stake may settle at `now`, before the supply cap.
pub fn cycles_due(pool: &Pool, stake: &Stake, now: Timestamp) -> u64 {
    if !stake.active || pool.cycle_length == 0 {
        return 0;
    }
    let horizon = now.min(pool.ending_date);
    let cycles = stake.last_claim_at.elapsed_since(horizon) / pool.cycle_length;
    if pool.is_cycle_capped() {
        let headroom = pool.max_cycles.saturating_sub(cycles_credited(pool, stake));
        cycles.min(headroom)
    } else {
        cycles
    }
}

/// Accrual for a single stake, paying out of `remaining_supply`.
///
/// The nominal amount saturates before the supply cap is applied; any
/// product beyond `u128::MAX` exceeds every possible supply anyway.
pub fn accrue(pool: &Pool, stake: &Stake, now: Timestamp, remaining_supply: u128) -> Accrual {
    let cycles = cycles_due(pool, stake, now);
    let nominal = u128::from(cycles).saturating_mul(pool.reward_per_cycle);
    Accrual {
        token_id: stake.token_id,
        cycles,
        amount: nominal.min(remaining_supply),
    }
}

/// Accruals for a batch of stakes of one pool.
///
/// The remaining supply is drawn down in batch order: once it runs out,
/// later stakes get whatever is left, then zero.
pub fn accrue_batch(pool: &Pool, stakes: &[Stake], now: Timestamp) -> Vec<Accrual> {
    let mut remaining = pool.remaining_supply();
    stakes
        .iter()
        .map(|stake| {
            let accrual = accrue(pool, stake, now, remaining);
            remaining -= accrual.amount;
            accrual
        })
        .collect()
}

/// Advance a stake past the cycles an accrual consumed.
///
/// Leftover seconds of a partial cycle stay unconsumed.
pub fn advance(pool: &Pool, stake: &mut Stake, accrual: &Accrual) {
    // cycles * cycle_length never exceeds the elapsed window, so this fits.
    let consumed = accrual.cycles.saturating_mul(pool.cycle_length);
    if let Some(next) = stake.last_claim_at.checked_add_secs(consumed) {
        stake.last_claim_at = next;
    }
}
