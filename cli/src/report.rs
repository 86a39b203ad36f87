//! Read-only queries over a ledger and their human-readable rendering.

use anyhow::{anyhow, Result};
use nftstake_engine::{calculator, ledger, Accrual};
use nftstake_store::{Pool, PoolStore, Stake, StakeStore};
use nftstake_types::{Address, PoolId, Timestamp, TokenId};
use nftstake_utils::format_duration;
use serde::Serialize;
use std::fmt::Write;

/// What a claim for `tokens` would pay at `at`.
#[derive(Debug, Serialize)]
pub struct RewardProjection {
    pub pool_id: PoolId,
    pub at: Timestamp,
    pub accruals: Vec<Accrual>,
    pub total: u128,
}

pub fn pool<S: PoolStore + ?Sized>(store: &S, id: PoolId) -> Result<Pool> {
    store.get_pool(id)?.ok_or_else(|| anyhow!("{id} not found"))
}

pub fn stakes<S: PoolStore + StakeStore + ?Sized>(
    store: &S,
    id: PoolId,
    tokens: &[TokenId],
) -> Result<Vec<Stake>> {
    pool(store, id)?;
    Ok(ledger::load_stakes(store, id, tokens)?)
}

pub fn staked<S: PoolStore + StakeStore + ?Sized>(
    store: &S,
    id: PoolId,
    owner: &Address,
) -> Result<Vec<TokenId>> {
    pool(store, id)?;
    Ok(ledger::staked_tokens(store, id, owner)?)
}

pub fn rewards<S: PoolStore + StakeStore + ?Sized>(
    store: &S,
    id: PoolId,
    tokens: &[TokenId],
    at: Timestamp,
) -> Result<RewardProjection> {
    ledger::ensure_unique(tokens)?;
    let pool = pool(store, id)?;
    let stakes = ledger::load_stakes(store, id, tokens)?;
    let accruals = calculator::accrue_batch(&pool, &stakes, at);
    let total = accruals.iter().map(|a| a.amount).sum();
    Ok(RewardProjection {
        pool_id: id,
        at,
        accruals,
        total,
    })
}

pub fn render_pool(pool: &Pool) -> String {
    let mut out = String::new();
    let status = if pool.is_active { "active" } else { "inactive" };
    let _ = writeln!(out, "{} ({status})", pool.id);
    let _ = writeln!(out, "  creator:          {}", pool.creator);
    let _ = writeln!(out, "  collection:       {}", pool.nft_collection);
    let _ = writeln!(out, "  reward asset:     {}", pool.reward_asset);
    let _ = writeln!(
        out,
        "  cycle:            {} ({} per cycle)",
        format_duration(pool.cycle_length),
        pool.reward_per_cycle
    );
    let cap = if pool.is_cycle_capped() {
        pool.max_cycles.to_string()
    } else {
        "unbounded".to_string()
    };
    let _ = writeln!(out, "  max cycles:       {cap}");
    let _ = writeln!(out, "  ends:             {}", pool.ending_date);
    let _ = writeln!(
        out,
        "  claimed:          {} of {} ({} left)",
        pool.claimed_rewards,
        pool.reward_supply,
        pool.remaining_supply()
    );
    out
}

pub fn render_pools(pools: &[Pool]) -> String {
    if pools.is_empty() {
        return "no pools\n".to_string();
    }
    let mut out = String::new();
    for pool in pools {
        let status = if pool.is_active { "active" } else { "inactive" };
        let _ = writeln!(
            out,
            "{:<10} {:<8} {} claimed {}/{}",
            pool.id.to_string(),
            status,
            pool.nft_collection,
            pool.claimed_rewards,
            pool.reward_supply
        );
    }
    out
}

pub fn render_stakes(stakes: &[Stake]) -> String {
    let mut out = String::new();
    for stake in stakes {
        let state = if stake.active { "staked" } else { "exited" };
        let _ = writeln!(
            out,
            "{:<8} {:<7} owner {} since {} last claim {}",
            stake.token_id.to_string(),
            state,
            stake.owner,
            stake.staked_at,
            stake.last_claim_at
        );
    }
    out
}

pub fn render_tokens(tokens: &[TokenId]) -> String {
    if tokens.is_empty() {
        return "nothing staked\n".to_string();
    }
    let list: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    format!("{}\n", list.join(" "))
}

pub fn render_projection(projection: &RewardProjection) -> String {
    let mut out = String::new();
    for accrual in &projection.accruals {
        let _ = writeln!(
            out,
            "{:<8} {:>4} cycles  {}",
            accrual.token_id.to_string(),
            accrual.cycles,
            accrual.amount
        );
    }
    let _ = writeln!(out, "total {} at {}", projection.total, projection.at);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nftstake_store::{StakingStore, StoreBatch};
    use nftstake_store_lmdb::LmdbEnvironment;

    fn seeded() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 8, 16 * 1024 * 1024).unwrap();
        let pool = Pool {
            id: PoolId::FIRST,
            creator: Address::new("creator"),
            nft_collection: Address::new("nft"),
            reward_asset: Address::new("erc20"),
            reward_supply: 100,
            cycle_length: 1_000,
            reward_per_cycle: 7,
            max_cycles: 0,
            ending_date: Timestamp::new(1_000_000),
            is_active: true,
            claimed_rewards: 0,
            created_at: Timestamp::EPOCH,
        };
        let mut batch = StoreBatch::new();
        batch.put_pool(pool);
        batch.put_stake(Stake::new(PoolId::FIRST, TokenId::new(1), Address::new("alice"), Timestamp::EPOCH));
        batch.put_stake(Stake::new(PoolId::FIRST, TokenId::new(2), Address::new("alice"), Timestamp::EPOCH));
        batch.set_next_pool_id(PoolId::new(1));
        env.commit(batch).unwrap();
        (dir, env)
    }

    #[test]
    fn projection_caps_at_supply() {
        let (_dir, env) = seeded();
        let tokens = [TokenId::new(1), TokenId::new(2)];
        let projection = rewards(&env, PoolId::FIRST, &tokens, Timestamp::new(10_000)).unwrap();
        let amounts: Vec<u128> = projection.accruals.iter().map(|a| a.amount).collect();
        assert_eq!(amounts, vec![70, 30]);
        assert_eq!(projection.total, 100);
        assert!(render_projection(&projection).contains("total 100"));
    }

    #[test]
    fn unknown_pool_is_an_error() {
        let (_dir, env) = seeded();
        assert!(pool(&env, PoolId::new(5)).is_err());
        assert!(stakes(&env, PoolId::new(5), &[TokenId::new(1)]).is_err());
    }

    #[test]
    fn staked_lists_owner_tokens() {
        let (_dir, env) = seeded();
        let tokens = staked(&env, PoolId::FIRST, &Address::new("alice")).unwrap();
        assert_eq!(render_tokens(&tokens), "#1 #2\n");
        assert_eq!(render_tokens(&[]), "nothing staked\n");
    }

    #[test]
    fn pool_rendering_mentions_supply() {
        let (_dir, env) = seeded();
        let text = render_pool(&pool(&env, PoolId::FIRST).unwrap());
        assert!(text.contains("claimed:          0 of 100 (100 left)"));
        assert!(text.contains("unbounded"));
    }
}
