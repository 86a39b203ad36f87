//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the staking engine (clock, storage, NFT
//! registry, reward ledger) are abstracted behind traits. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (advance time, inject failures)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod nft;
pub mod store;
pub mod token;

pub use clock::NullClock;
pub use nft::NullNftRegistry;
pub use store::NullStore;
pub use token::NullRewardLedger;
