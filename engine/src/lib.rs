//! NFT staking engine.
//!
//! Token holders lock NFTs of a collection into a pool and earn a fungible
//! reward per completed cycle. The engine is made of four parts:
//! - [`pool`]: pool configuration, funding and deactivation
//! - [`ledger`]: per-token stake records and custody
//! - [`calculator`]: pure cycle-based accrual with lifetime and supply caps
//! - [`engine`]: the [`StakingEngine`] tying them to storage and assets
//!
//! All external effects go through injected capabilities ([`StakingStore`],
//! [`NftRegistry`], [`RewardLedger`], [`Clock`]), so the engine runs the same
//! against LMDB and real asset contracts as against in-memory test doubles.
//!
//! [`StakingStore`]: nftstake_store::StakingStore
//! [`NftRegistry`]: nftstake_assets::NftRegistry
//! [`RewardLedger`]: nftstake_assets::RewardLedger
//! [`Clock`]: nftstake_types::Clock

pub mod calculator;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod pool;
pub mod receipt;

pub use calculator::Accrual;
pub use engine::{EngineConfig, StakingEngine};
pub use error::StakingError;
pub use pool::PoolConfig;
pub use receipt::{ClaimReceipt, Settlement, TokenPayout};
