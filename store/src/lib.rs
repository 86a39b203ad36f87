//! Abstract storage traits for the NFT staking engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The engine depends only on the traits, never on a backend.
//!
//! State is two mappings: pool id → [`Pool`] and `(pool id, token id)` →
//! [`Stake`]. All mutation goes through [`StakingStore::commit`], which
//! applies a [`StoreBatch`] atomically.

pub mod batch;
pub mod error;
pub mod meta;
pub mod pool;
pub mod stake;

pub use batch::{StakingStore, StoreBatch};
pub use error::StoreError;
pub use meta::MetaStore;
pub use pool::{Pool, PoolStore};
pub use stake::{Stake, StakeStore};
