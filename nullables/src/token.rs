//! Nullable reward ledger: in-memory fungible balances and allowances.

use nftstake_assets::{AssetError, RewardLedger};
use nftstake_types::Address;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    /// (asset, holder) -> balance
    balances: HashMap<(Address, Address), u128>,
    /// (asset, owner, spender) -> remaining allowance
    allowances: HashMap<(Address, Address, Address), u128>,
    fail_after: Option<usize>,
}

impl State {
    fn check_injected_failure(&mut self) -> Result<(), AssetError> {
        match self.fail_after {
            Some(0) => {
                self.fail_after = None;
                Err(AssetError::Rejected("injected reward transfer failure".into()))
            }
            Some(n) => {
                self.fail_after = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn move_balance(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let available = self
            .balances
            .get(&(asset.clone(), from.clone()))
            .copied()
            .unwrap_or(0);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances
            .insert((asset.clone(), from.clone()), available - amount);
        let to_balance = self.balances.entry((asset.clone(), to.clone())).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }
}

/// An in-memory multi-asset fungible ledger.
pub struct NullRewardLedger {
    state: Mutex<State>,
}

impl NullRewardLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Credit `amount` of `asset` to `to` out of thin air.
    pub fn mint(&self, asset: &Address, to: &Address, amount: u128) {
        let mut state = self.state.lock().unwrap();
        let bal = state.balances.entry((asset.clone(), to.clone())).or_insert(0);
        *bal = bal.saturating_add(amount);
    }

    /// Allow `spender` to pull up to `amount` of `owner`'s `asset`.
    pub fn approve(&self, asset: &Address, owner: &Address, spender: &Address, amount: u128) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((asset.clone(), owner.clone(), spender.clone()), amount);
    }

    /// Let `n` more transfers succeed, then reject the next one.
    pub fn fail_transfer_after(&self, n: usize) {
        self.state.lock().unwrap().fail_after = Some(n);
    }

    /// Balance shortcut for assertions.
    pub fn balance(&self, asset: &Address, holder: &Address) -> u128 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&(asset.clone(), holder.clone()))
            .copied()
            .unwrap_or(0)
    }
}

impl Default for NullRewardLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardLedger for NullRewardLedger {
    fn balance_of(&self, asset: &Address, holder: &Address) -> Result<u128, AssetError> {
        Ok(self.balance(asset, holder))
    }

    fn transfer_from(
        &self,
        asset: &Address,
        spender: &Address,
        payer: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let mut state = self.state.lock().unwrap();
        state.check_injected_failure()?;
        let key = (asset.clone(), payer.clone(), spender.clone());
        let approved = state.allowances.get(&key).copied().unwrap_or(0);
        if approved < amount {
            return Err(AssetError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        state.move_balance(asset, payer, recipient, amount)?;
        state.allowances.insert(key, approved - amount);
        Ok(())
    }

    fn transfer(
        &self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), AssetError> {
        let mut state = self.state.lock().unwrap();
        state.check_injected_failure()?;
        state.move_balance(asset, from, to, amount)
    }

    fn name(&self) -> &str {
        "null-reward-ledger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_from_consumes_allowance() {
        let ledger = NullRewardLedger::new();
        let (erc20, alice, engine) = (Address::new("erc20"), Address::new("alice"), Address::new("engine"));
        ledger.mint(&erc20, &alice, 1_000);
        ledger.approve(&erc20, &alice, &engine, 600);

        ledger.transfer_from(&erc20, &engine, &alice, &engine, 500).unwrap();
        assert_eq!(ledger.balance(&erc20, &alice), 500);
        assert_eq!(ledger.balance(&erc20, &engine), 500);

        let err = ledger
            .transfer_from(&erc20, &engine, &alice, &engine, 200)
            .unwrap_err();
        assert_eq!(err, AssetError::InsufficientAllowance { needed: 200, approved: 100 });
    }

    #[test]
    fn transfer_requires_balance() {
        let ledger = NullRewardLedger::new();
        let (erc20, alice, bob) = (Address::new("erc20"), Address::new("alice"), Address::new("bob"));
        ledger.mint(&erc20, &alice, 10);
        assert!(ledger.transfer(&erc20, &alice, &bob, 11).is_err());
        ledger.transfer(&erc20, &alice, &bob, 10).unwrap();
        assert_eq!(ledger.balance_of(&erc20, &bob).unwrap(), 10);
    }

    #[test]
    fn failed_transfer_changes_nothing() {
        let ledger = NullRewardLedger::new();
        let (erc20, alice, bob) = (Address::new("erc20"), Address::new("alice"), Address::new("bob"));
        ledger.mint(&erc20, &alice, 10);
        ledger.fail_transfer_after(0);
        assert!(ledger.transfer(&erc20, &alice, &bob, 5).is_err());
        assert_eq!(ledger.balance(&erc20, &alice), 10);
        assert_eq!(ledger.balance(&erc20, &bob), 0);
    }
}
