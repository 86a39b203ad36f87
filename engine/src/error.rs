//! Staking engine errors.

use nftstake_assets::AssetError;
use nftstake_store::StoreError;
use nftstake_types::{Address, PoolId, TokenId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("{0} not found")]
    PoolNotFound(PoolId),

    #[error("no stake for token {token} in {pool}")]
    StakeNotFound { pool: PoolId, token: TokenId },

    #[error("caller does not own token {token}")]
    NotTokenOwner { token: TokenId },

    #[error("token {token} is already staked")]
    TokenAlreadyStaked { token: TokenId },

    #[error("insufficient funding: {0}")]
    InsufficientFunding(String),

    #[error("{0} is not accepting stakes")]
    PoolInactive(PoolId),

    #[error("invalid pool config: {0}")]
    InvalidPoolConfig(String),

    #[error("only the creator may modify {pool}")]
    NotPoolCreator { pool: PoolId },

    #[error("{owner} has not approved the engine as operator on {collection}")]
    OperatorNotApproved { owner: Address, collection: Address },

    #[error("token {0} appears more than once in the batch")]
    DuplicateToken(TokenId),

    #[error("arithmetic overflow in staking computation")]
    Overflow,

    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
