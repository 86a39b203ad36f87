//! Nullable NFT registry: in-memory ownership with operator approvals.

use nftstake_assets::{AssetError, NftRegistry};
use nftstake_types::{Address, TokenId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    owners: HashMap<(Address, TokenId), Address>,
    /// (collection, owner, operator)
    approvals: HashSet<(Address, Address, Address)>,
    /// Transfers left before the injected failure fires.
    fail_after: Option<usize>,
    transfers: usize,
}

/// An in-memory NFT registry serving any number of collections.
pub struct NullNftRegistry {
    state: Mutex<State>,
}

impl NullNftRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Create `token` in `collection`, owned by `owner`.
    pub fn mint(&self, collection: &Address, token: TokenId, owner: &Address) {
        self.state
            .lock()
            .unwrap()
            .owners
            .insert((collection.clone(), token), owner.clone());
    }

    pub fn set_approval_for_all(
        &self,
        collection: &Address,
        owner: &Address,
        operator: &Address,
        approved: bool,
    ) {
        let key = (collection.clone(), owner.clone(), operator.clone());
        let mut state = self.state.lock().unwrap();
        if approved {
            state.approvals.insert(key);
        } else {
            state.approvals.remove(&key);
        }
    }

    /// Let `n` more transfers succeed, then reject the next one.
    pub fn fail_transfer_after(&self, n: usize) {
        self.state.lock().unwrap().fail_after = Some(n);
    }

    /// Number of successful transfers so far.
    pub fn transfer_count(&self) -> usize {
        self.state.lock().unwrap().transfers
    }
}

impl Default for NullNftRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NftRegistry for NullNftRegistry {
    fn owner_of(&self, collection: &Address, token: TokenId) -> Result<Address, AssetError> {
        self.state
            .lock()
            .unwrap()
            .owners
            .get(&(collection.clone(), token))
            .cloned()
            .ok_or_else(|| AssetError::TokenNotFound {
                collection: collection.clone(),
                token,
            })
    }

    fn is_approved_for_all(
        &self,
        collection: &Address,
        owner: &Address,
        operator: &Address,
    ) -> Result<bool, AssetError> {
        Ok(self.state.lock().unwrap().approvals.contains(&(
            collection.clone(),
            owner.clone(),
            operator.clone(),
        )))
    }

    fn transfer(
        &self,
        collection: &Address,
        operator: &Address,
        from: &Address,
        to: &Address,
        token: TokenId,
    ) -> Result<(), AssetError> {
        let mut state = self.state.lock().unwrap();
        match state.fail_after {
            Some(0) => {
                state.fail_after = None;
                return Err(AssetError::Rejected(format!("injected failure moving {token}")));
            }
            Some(n) => state.fail_after = Some(n - 1),
            None => {}
        }

        let key = (collection.clone(), token);
        let owner = state
            .owners
            .get(&key)
            .cloned()
            .ok_or_else(|| AssetError::TokenNotFound {
                collection: collection.clone(),
                token,
            })?;
        if owner != *from {
            return Err(AssetError::NotOwner {
                account: from.clone(),
                token,
            });
        }
        let approved = operator == from
            || state
                .approvals
                .contains(&(collection.clone(), from.clone(), operator.clone()));
        if !approved {
            return Err(AssetError::NotApproved {
                owner: from.clone(),
                operator: operator.clone(),
            });
        }
        state.owners.insert(key, to.clone());
        state.transfers += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "null-nft-registry"
    }
}
