//! Errors reported by asset collaborators.

use nftstake_types::{Address, TokenId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("unknown collection {0}")]
    UnknownCollection(Address),

    #[error("unknown asset {0}")]
    UnknownAsset(Address),

    #[error("token {token} does not exist in {collection}")]
    TokenNotFound { collection: Address, token: TokenId },

    #[error("{account} does not own token {token}")]
    NotOwner { account: Address, token: TokenId },

    #[error("{operator} is not approved to move tokens of {owner}")]
    NotApproved { owner: Address, operator: Address },

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: u128, approved: u128 },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
