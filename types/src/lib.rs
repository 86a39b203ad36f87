//! Fundamental types for the NFT staking engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, pool and token identifiers, timestamps and the clock abstraction.

pub mod address;
pub mod error;
pub mod ids;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use ids::{PoolId, TokenId};
pub use time::{Clock, SystemClock, Timestamp};
