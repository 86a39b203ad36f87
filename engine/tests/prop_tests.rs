use proptest::prelude::*;

mod common;

use common::*;
use nftstake_engine::calculator;
use nftstake_store::{Pool, Stake};
use nftstake_types::{Address, Clock, PoolId, Timestamp, TokenId};

fn bare_pool(supply: u128, cycle_length: u64, reward_per_cycle: u128, max_cycles: u64) -> Pool {
    Pool {
        id: PoolId::FIRST,
        creator: Address::new("creator"),
        nft_collection: Address::new("nft"),
        reward_asset: Address::new("erc20"),
        reward_supply: supply,
        cycle_length,
        reward_per_cycle,
        max_cycles,
        ending_date: Timestamp::new(u64::MAX),
        is_active: true,
        claimed_rewards: 0,
        created_at: Timestamp::EPOCH,
    }
}

proptest! {
    /// claimed_rewards never decreases and never exceeds the supply, whatever
    /// the sequence of time advances and claims.
    #[test]
    fn claimed_rewards_monotonic_and_bounded(
        supply in 1u128..500,
        reward_per_cycle in 1u128..50,
        max_cycles in 0u64..20,
        steps in prop::collection::vec((0u64..3_000, 0usize..4), 1..20),
    ) {
        let w = world(4);
        let pool = w.engine
            .create_pool(&addr("deployer"), pool_config(supply, 1_000, reward_per_cycle, max_cycles))
            .unwrap();
        let tokens = ids(&[1, 2, 3, 4]);
        w.engine.enter_staking(&addr("alice"), pool, &tokens).unwrap();

        let mut last = 0u128;
        for (advance, split) in steps {
            w.clock.advance(advance);
            w.engine.claim_reward(&addr("alice"), pool, &tokens[split..]).unwrap();
            let claimed = w.engine.claimed_pool_rewards(pool).unwrap();
            prop_assert!(claimed >= last, "claimed went from {} to {}", last, claimed);
            prop_assert!(claimed <= supply, "claimed {} exceeds supply {}", claimed, supply);
            last = claimed;
        }
        prop_assert_eq!(w.rewards.balance(&erc20(), &addr("alice")), last);
    }

    /// A claim pays exactly what calculate_rewards predicted a moment
    /// before, after which nothing more is due.
    #[test]
    fn prediction_equals_payment(
        supply in 1u128..1_000,
        reward_per_cycle in 1u128..100,
        elapsed in 0u64..20_000,
        count in 1u64..6,
    ) {
        let w = world(count);
        let pool = w.engine
            .create_pool(&addr("deployer"), pool_config(supply, 1_000, reward_per_cycle, 0))
            .unwrap();
        let tokens: Vec<TokenId> = (1..=count).map(TokenId::new).collect();
        w.engine.enter_staking(&addr("alice"), pool, &tokens).unwrap();
        w.clock.advance(elapsed);

        let predicted = w.engine.calculate_rewards(pool, &tokens).unwrap();
        let receipt = w.engine.claim_reward(&addr("alice"), pool, &tokens).unwrap();
        prop_assert_eq!(receipt.amounts(), predicted);

        let again = w.engine.calculate_rewards(pool, &tokens).unwrap();
        prop_assert!(again.iter().all(|&a| a == 0));
    }

    /// A second claim with no time in between pays nothing and leaves every
    /// accrual window where the first claim put it.
    #[test]
    fn second_claim_is_noop(
        elapsed in 0u64..50_000,
        max_cycles in 0u64..30,
    ) {
        let w = world(2);
        let pool = w.engine
            .create_pool(&addr("deployer"), pool_config(1_000_000, 1_000, 3, max_cycles))
            .unwrap();
        let tokens = ids(&[1, 2]);
        w.engine.enter_staking(&addr("alice"), pool, &tokens).unwrap();
        w.clock.advance(elapsed);

        w.engine.claim_reward(&addr("alice"), pool, &tokens).unwrap();
        let before = w.engine.get_stakes(pool, &tokens).unwrap();
        let balance = w.rewards.balance(&erc20(), &addr("alice"));

        let second = w.engine.claim_reward(&addr("alice"), pool, &tokens).unwrap();
        prop_assert_eq!(second.total(), 0);
        prop_assert_eq!(w.engine.get_stakes(pool, &tokens).unwrap(), before);
        prop_assert_eq!(w.rewards.balance(&erc20(), &addr("alice")), balance);
    }

    /// Only whole cycles are settled; the leftover seconds stay in the
    /// accrual window.
    #[test]
    fn partial_cycle_is_preserved(
        cycle_length in 1u64..5_000,
        elapsed in 0u64..100_000,
    ) {
        let w = world(1);
        let pool = w.engine
            .create_pool(&addr("deployer"), pool_config(1_000_000, cycle_length, 1, 0))
            .unwrap();
        w.engine.enter_staking(&addr("alice"), pool, &ids(&[1])).unwrap();
        w.clock.advance(elapsed);

        let paid = w.engine.claim_reward(&addr("alice"), pool, &ids(&[1])).unwrap().total();
        prop_assert_eq!(paid, u128::from(elapsed / cycle_length));

        let stake = &w.engine.get_stakes(pool, &ids(&[1])).unwrap()[0];
        let leftover = elapsed % cycle_length;
        prop_assert_eq!(stake.last_claim_at.elapsed_since(w.clock.now()), leftover);

        w.clock.advance(cycle_length - leftover);
        prop_assert_eq!(w.engine.calculate_rewards(pool, &ids(&[1])).unwrap(), vec![1]);
    }

    /// A batch never accrues more than the pool has left, and no single
    /// stake exceeds its lifetime cap.
    #[test]
    fn batch_accrual_respects_caps(
        supply in 0u128..10_000,
        reward_per_cycle in 1u128..1_000,
        max_cycles in 0u64..50,
        starts in prop::collection::vec(0u64..100_000, 1..10),
        now in 0u64..200_000,
    ) {
        let pool = bare_pool(supply, 1_000, reward_per_cycle, max_cycles);
        let stakes: Vec<Stake> = starts
            .iter()
            .enumerate()
            .map(|(i, &at)| Stake::new(PoolId::FIRST, TokenId::new(i as u64), Address::new("alice"), Timestamp::new(at)))
            .collect();

        let accruals = calculator::accrue_batch(&pool, &stakes, Timestamp::new(now));
        let total: u128 = accruals.iter().map(|a| a.amount).sum();
        prop_assert!(total <= supply);
        if max_cycles > 0 {
            prop_assert!(accruals.iter().all(|a| a.cycles <= max_cycles));
        }
    }
}
