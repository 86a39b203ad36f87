#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use nftstake_engine::calculator;
use nftstake_store::{Pool, Stake};
use nftstake_types::{Address, PoolId, Timestamp, TokenId};

#[derive(Debug, Arbitrary)]
struct Input {
    reward_supply: u128,
    claimed_rewards: u128,
    cycle_length: u64,
    reward_per_cycle: u128,
    max_cycles: u64,
    ending_date: u64,
    now: u64,
    stakes: Vec<(u64, u64, bool)>,
}

// Accrual over arbitrary pools and stake windows must never panic, never
// exceed the pool's remaining supply, and never move a claim window past
// the accrual horizon.
fuzz_target!(|input: Input| {
    let pool = Pool {
        id: PoolId::FIRST,
        creator: Address::new("creator"),
        nft_collection: Address::new("nft"),
        reward_asset: Address::new("erc20"),
        reward_supply: input.reward_supply,
        cycle_length: input.cycle_length,
        reward_per_cycle: input.reward_per_cycle,
        max_cycles: input.max_cycles,
        ending_date: Timestamp::new(input.ending_date),
        is_active: true,
        claimed_rewards: input.claimed_rewards.min(input.reward_supply),
        created_at: Timestamp::EPOCH,
    };
    let now = Timestamp::new(input.now);

    let stakes: Vec<Stake> = input
        .stakes
        .iter()
        .take(64)
        .enumerate()
        .map(|(i, &(staked_at, extra, active))| {
            let mut stake = Stake::new(
                PoolId::FIRST,
                TokenId::new(i as u64),
                Address::new("alice"),
                Timestamp::new(staked_at),
            );
            stake.last_claim_at = Timestamp::new(staked_at.saturating_add(extra));
            stake.active = active;
            stake
        })
        .collect();

    let accruals = calculator::accrue_batch(&pool, &stakes, now);
    let total = accruals
        .iter()
        .try_fold(0u128, |acc, a| acc.checked_add(a.amount))
        .expect("batch total fits in u128");
    assert!(total <= pool.remaining_supply());

    let horizon = now.min(pool.ending_date);
    for (stake, accrual) in stakes.iter().zip(&accruals) {
        let mut settled = stake.clone();
        calculator::advance(&pool, &mut settled, accrual);
        if accrual.cycles > 0 {
            assert!(settled.last_claim_at <= horizon);
        }
    }
});
