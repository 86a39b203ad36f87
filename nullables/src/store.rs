//! Nullable store: thread-safe in-memory storage for testing.

use nftstake_store::{Pool, PoolStore, Stake, StakeStore, StakingStore, StoreBatch, StoreError};
use nftstake_types::{PoolId, TokenId};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    pools: BTreeMap<PoolId, Pool>,
    stakes: BTreeMap<(PoolId, TokenId), Stake>,
    next_pool_id: Option<PoolId>,
    fail_next_commit: bool,
    commits: usize,
}

/// An in-memory pool + stake store.
///
/// A commit applies its whole batch under one lock, so readers see either
/// none or all of it.
pub struct NullStore {
    state: Mutex<State>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Make the next commit fail with a backend error and apply nothing.
    pub fn fail_next_commit(&self) {
        self.state.lock().unwrap().fail_next_commit = true;
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.state.lock().unwrap().commits
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolStore for NullStore {
    fn get_pool(&self, id: PoolId) -> Result<Option<Pool>, StoreError> {
        Ok(self.state.lock().unwrap().pools.get(&id).cloned())
    }

    fn iter_pools(&self) -> Result<Vec<Pool>, StoreError> {
        Ok(self.state.lock().unwrap().pools.values().cloned().collect())
    }

    fn next_pool_id(&self) -> Result<PoolId, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .next_pool_id
            .unwrap_or(PoolId::FIRST))
    }
}

impl StakeStore for NullStore {
    fn get_stake(&self, pool: PoolId, token: TokenId) -> Result<Option<Stake>, StoreError> {
        Ok(self.state.lock().unwrap().stakes.get(&(pool, token)).cloned())
    }

    fn iter_pool_stakes(&self, pool: PoolId) -> Result<Vec<Stake>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .stakes
            .range((pool, TokenId::new(0))..=(pool, TokenId::new(u64::MAX)))
            .map(|(_, s)| s.clone())
            .collect())
    }
}

impl StakingStore for NullStore {
    fn commit(&self, batch: StoreBatch) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next_commit {
            state.fail_next_commit = false;
            return Err(StoreError::Backend("injected commit failure".into()));
        }
        for pool in batch.pools() {
            state.pools.insert(pool.id, pool.clone());
        }
        for stake in batch.stakes() {
            state
                .stakes
                .insert((stake.pool_id, stake.token_id), stake.clone());
        }
        if let Some(id) = batch.next_pool_id() {
            state.next_pool_id = Some(id);
        }
        state.commits += 1;
        Ok(())
    }
}
