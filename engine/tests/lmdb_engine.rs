//! The engine running on the durable LMDB backend.

mod common;

use common::*;
use nftstake_store_lmdb::LmdbEnvironment;
use std::sync::Arc;

const MAP_SIZE: usize = 16 * 1024 * 1024;

#[test]
fn claims_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = ids(&[1, 2, 3]);

    let pool = {
        let env = Arc::new(LmdbEnvironment::open(dir.path(), 8, MAP_SIZE).unwrap());
        let w = world_with_store(env, 3);
        let pool = w
            .engine
            .create_pool(&addr("deployer"), pool_config(1_000, 1_000, 2, 5))
            .unwrap();
        w.engine.enter_staking(&addr("alice"), pool, &tokens).unwrap();
        w.clock.advance(3_000);
        assert_eq!(w.engine.claim_reward(&addr("alice"), pool, &tokens).unwrap().total(), 18);
        w.engine.exit_staking(&addr("alice"), pool, &ids(&[3])).unwrap();
        pool
    };

    let env = Arc::new(LmdbEnvironment::open(dir.path(), 8, MAP_SIZE).unwrap());
    let w = world_with_store(env, 0);
    assert_eq!(w.engine.claimed_pool_rewards(pool).unwrap(), 18);
    assert_eq!(w.engine.staked_tokens(pool, &addr("alice")).unwrap(), ids(&[1, 2]));

    let stakes = w.engine.get_stakes(pool, &tokens).unwrap();
    assert!(stakes[0].active && stakes[1].active && !stakes[2].active);
    assert_eq!(stakes[0].last_claim_at.as_secs(), START + 3_000);

    // The next pool id continues after the persisted one.
    let next = w
        .engine
        .create_pool(&addr("deployer"), pool_config(10, 1_000, 1, 0))
        .unwrap();
    assert_eq!(next.value(), pool.value() + 1);
    assert_eq!(w.engine.list_pools().unwrap().len(), 2);
}
