//! Stake ledger lookups shared by the engine operations.

use crate::error::StakingError;
use nftstake_store::{Stake, StakeStore};
use nftstake_types::{Address, PoolId, TokenId};
use std::collections::HashSet;

/// Reject a batch that names the same token twice.
pub fn ensure_unique(tokens: &[TokenId]) -> Result<(), StakingError> {
    let mut seen = HashSet::with_capacity(tokens.len());
    for &token in tokens {
        if !seen.insert(token) {
            return Err(StakingError::DuplicateToken(token));
        }
    }
    Ok(())
}

/// Stake records for `tokens`, active or not, in batch order.
pub fn load_stakes<S: StakeStore + ?Sized>(
    store: &S,
    pool: PoolId,
    tokens: &[TokenId],
) -> Result<Vec<Stake>, StakingError> {
    tokens
        .iter()
        .map(|&token| {
            store
                .get_stake(pool, token)?
                .ok_or(StakingError::StakeNotFound { pool, token })
        })
        .collect()
}

/// Active stakes of `tokens`, each owned by `owner`.
///
/// A token with no record or only an exited one is `StakeNotFound`; a token
/// staked by someone else is `NotTokenOwner`.
pub fn load_owned_stakes<S: StakeStore + ?Sized>(
    store: &S,
    pool: PoolId,
    owner: &Address,
    tokens: &[TokenId],
) -> Result<Vec<Stake>, StakingError> {
    let stakes = load_stakes(store, pool, tokens)?;
    for stake in &stakes {
        if !stake.active {
            return Err(StakingError::StakeNotFound {
                pool,
                token: stake.token_id,
            });
        }
        if stake.owner != *owner {
            return Err(StakingError::NotTokenOwner {
                token: stake.token_id,
            });
        }
    }
    Ok(stakes)
}

/// Tokens `owner` currently has staked in `pool`, ascending.
pub fn staked_tokens<S: StakeStore + ?Sized>(
    store: &S,
    pool: PoolId,
    owner: &Address,
) -> Result<Vec<TokenId>, StakingError> {
    Ok(store
        .iter_pool_stakes(pool)?
        .into_iter()
        .filter(|s| s.active && s.owner == *owner)
        .map(|s| s.token_id)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nftstake_nullables::NullStore;
    use nftstake_store::{StakingStore, StoreBatch};
    use nftstake_types::Timestamp;

    fn seeded() -> NullStore {
        let store = NullStore::new();
        let mut batch = StoreBatch::new();
        let pool = PoolId::new(0);
        batch.put_stake(Stake::new(pool, TokenId::new(1), Address::new("alice"), Timestamp::new(0)));
        batch.put_stake(Stake::new(pool, TokenId::new(2), Address::new("bob"), Timestamp::new(0)));
        let mut exited = Stake::new(pool, TokenId::new(3), Address::new("alice"), Timestamp::new(0));
        exited.active = false;
        batch.put_stake(exited);
        store.commit(batch).unwrap();
        store
    }

    #[test]
    fn duplicates_are_rejected() {
        let tokens = [TokenId::new(1), TokenId::new(2), TokenId::new(1)];
        assert!(matches!(
            ensure_unique(&tokens),
            Err(StakingError::DuplicateToken(t)) if t == TokenId::new(1)
        ));
        ensure_unique(&tokens[..2]).unwrap();
    }

    #[test]
    fn missing_stake_is_reported_with_its_token() {
        let store = seeded();
        let err = load_stakes(&store, PoolId::new(0), &[TokenId::new(1), TokenId::new(9)]).unwrap_err();
        assert!(matches!(
            err,
            StakingError::StakeNotFound { token, .. } if token == TokenId::new(9)
        ));
    }

    #[test]
    fn owned_stakes_check_owner_and_activity() {
        let store = seeded();
        let alice = Address::new("alice");
        let pool = PoolId::new(0);

        assert_eq!(load_owned_stakes(&store, pool, &alice, &[TokenId::new(1)]).unwrap().len(), 1);
        assert!(matches!(
            load_owned_stakes(&store, pool, &alice, &[TokenId::new(2)]),
            Err(StakingError::NotTokenOwner { .. })
        ));
        assert!(matches!(
            load_owned_stakes(&store, pool, &alice, &[TokenId::new(3)]),
            Err(StakingError::StakeNotFound { .. })
        ));
    }

    #[test]
    fn staked_tokens_skips_exited_and_foreign() {
        let store = seeded();
        let tokens = staked_tokens(&store, PoolId::new(0), &Address::new("alice")).unwrap();
        assert_eq!(tokens, vec![TokenId::new(1)]);
    }
}
