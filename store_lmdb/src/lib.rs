//! LMDB storage backend for the NFT staking engine.
//!
//! Implements all storage traits from `nftstake-store` using the `heed` LMDB bindings.
//! Pools, stakes and metadata each live in their own named database inside a
//! single environment, so a [`WriteBatch`] can update all three in one
//! write transaction.

pub mod environment;
pub mod error;
pub mod meta;
pub mod pool;
pub mod stake;
pub mod staking;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use write_batch::WriteBatch;

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(value).map_err(|e| LmdbError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}
