//! Shared wiring for engine integration tests.

#![allow(dead_code)]

use nftstake_assets::NftRegistry;
use nftstake_engine::{EngineConfig, PoolConfig, StakingEngine};
use nftstake_nullables::{NullClock, NullNftRegistry, NullRewardLedger, NullStore};
use nftstake_store::StakingStore;
use nftstake_types::{Address, Timestamp, TokenId};
use std::sync::Arc;

pub const START: u64 = 1_700_000_000;

pub struct World {
    pub engine: StakingEngine,
    pub clock: Arc<NullClock>,
    pub nfts: Arc<NullNftRegistry>,
    pub rewards: Arc<NullRewardLedger>,
}

pub fn addr(s: &str) -> Address {
    Address::new(s)
}

pub fn ids(raw: &[u64]) -> Vec<TokenId> {
    raw.iter().copied().map(TokenId::new).collect()
}

pub fn nft() -> Address {
    addr("nft")
}

pub fn erc20() -> Address {
    addr("erc20")
}

/// Engine over in-memory storage with a funded deployer and `tokens`
/// minted to, and approved by, `alice`.
pub fn world(tokens: u64) -> World {
    world_with_store(Arc::new(NullStore::new()), tokens)
}

pub fn world_with_store(store: Arc<dyn StakingStore>, tokens: u64) -> World {
    let clock = Arc::new(NullClock::new(START));
    let nfts = Arc::new(NullNftRegistry::new());
    let rewards = Arc::new(NullRewardLedger::new());
    let engine = StakingEngine::new(
        EngineConfig { custody: addr("engine") },
        store,
        nfts.clone(),
        rewards.clone(),
        clock.clone(),
    );

    rewards.mint(&erc20(), &addr("deployer"), 1_000_000_000_000_000_000);
    rewards.approve(&erc20(), &addr("deployer"), &addr("engine"), 10_000_000_000_000_000_000);
    for token in 1..=tokens {
        nfts.mint(&nft(), TokenId::new(token), &addr("alice"));
    }
    nfts.set_approval_for_all(&nft(), &addr("alice"), &addr("engine"), true);

    World {
        engine,
        clock,
        nfts,
        rewards,
    }
}

pub fn pool_config(supply: u128, cycle_length: u64, reward_per_cycle: u128, max_cycles: u64) -> PoolConfig {
    PoolConfig {
        nft_collection: nft(),
        reward_asset: erc20(),
        reward_supply: supply,
        cycle_length,
        reward_per_cycle,
        max_cycles,
        ending_date: Timestamp::new(START + 10_000_000),
        is_active: true,
    }
}

impl World {
    pub fn nft_owner(&self, token: TokenId) -> Address {
        self.nfts.owner_of(&nft(), token).unwrap()
    }
}
