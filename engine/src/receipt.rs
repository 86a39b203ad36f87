//! Outcome of a claim or exit.

use nftstake_types::{Address, PoolId, TokenId};
use serde::Serialize;

/// What one token got out of a settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Settlement {
    Paid(u128),
    /// No whole cycle had elapsed, the cap was reached, or supply ran out.
    NothingToClaim,
}

impl Settlement {
    pub fn amount(&self) -> u128 {
        match self {
            Settlement::Paid(amount) => *amount,
            Settlement::NothingToClaim => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TokenPayout {
    pub token_id: TokenId,
    pub cycles: u64,
    pub settlement: Settlement,
}

/// Per-token breakdown of one aggregated reward transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    pub pool_id: PoolId,
    pub recipient: Address,
    pub payouts: Vec<TokenPayout>,
}

impl ClaimReceipt {
    pub fn empty(pool_id: PoolId, recipient: Address) -> Self {
        Self {
            pool_id,
            recipient,
            payouts: Vec::new(),
        }
    }

    /// Sum transferred to the recipient.
    pub fn total(&self) -> u128 {
        self.payouts.iter().map(|p| p.settlement.amount()).sum()
    }

    /// Per-token amounts in batch order.
    pub fn amounts(&self) -> Vec<u128> {
        self.payouts.iter().map(|p| p.settlement.amount()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_ignores_empty_settlements() {
        let receipt = ClaimReceipt {
            pool_id: PoolId::new(0),
            recipient: Address::new("alice"),
            payouts: vec![
                TokenPayout {
                    token_id: TokenId::new(1),
                    cycles: 2,
                    settlement: Settlement::Paid(6),
                },
                TokenPayout {
                    token_id: TokenId::new(2),
                    cycles: 0,
                    settlement: Settlement::NothingToClaim,
                },
            ],
        };
        assert_eq!(receipt.total(), 6);
        assert_eq!(receipt.amounts(), vec![6, 0]);
    }
}
