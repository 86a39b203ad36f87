//! Asset transfer capabilities.
//!
//! The staking engine never owns token contracts; it moves assets through
//! these two traits:
//! - [`NftRegistry`]: ownership and custody of non-fungible tokens
//! - [`RewardLedger`]: balances of fungible reward assets
//!
//! Every call is atomic: it either fully succeeds or fails with an
//! [`AssetError`] and changes nothing.

pub mod error;

pub use error::AssetError;

use nftstake_types::{Address, TokenId};

/// Non-fungible asset registry (one registry may serve many collections).
pub trait NftRegistry: Send + Sync {
    /// Current owner of `token` in `collection`.
    fn owner_of(&self, collection: &Address, token: TokenId) -> Result<Address, AssetError>;

    /// Whether `operator` may move every token `owner` holds in `collection`.
    fn is_approved_for_all(
        &self,
        collection: &Address,
        owner: &Address,
        operator: &Address,
    ) -> Result<bool, AssetError>;

    /// Move `token` from `from` to `to` on behalf of `operator`.
    ///
    /// Succeeds when `operator` is `from` itself or an approved operator of `from`.
    fn transfer(
        &self,
        collection: &Address,
        operator: &Address,
        from: &Address,
        to: &Address,
        token: TokenId,
    ) -> Result<(), AssetError>;

    /// Human-readable name of this registry.
    fn name(&self) -> &str;
}

/// Fungible reward asset ledger (one ledger may serve many assets).
pub trait RewardLedger: Send + Sync {
    fn balance_of(&self, asset: &Address, holder: &Address) -> Result<u128, AssetError>;

    /// Pull `amount` from `payer` to `recipient` using an allowance granted to `spender`.
    fn transfer_from(
        &self,
        asset: &Address,
        spender: &Address,
        payer: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), AssetError>;

    /// Move `amount` that `from` holds to `to`.
    fn transfer(
        &self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), AssetError>;

    /// Human-readable name of this ledger.
    fn name(&self) -> &str;
}
