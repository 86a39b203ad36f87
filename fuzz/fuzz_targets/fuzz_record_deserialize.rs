#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Stored records are bincode; decoding corrupt bytes must fail cleanly.
    let _ = bincode::deserialize::<nftstake_store::Pool>(data);
    let _ = bincode::deserialize::<nftstake_store::Stake>(data);
    let _ = bincode::deserialize::<nftstake_types::Timestamp>(data);
    let _ = bincode::deserialize::<nftstake_types::Address>(data);

    if data.len() >= 16 {
        let mut pool = [0u8; 8];
        let mut token = [0u8; 8];
        pool.copy_from_slice(&data[..8]);
        token.copy_from_slice(&data[8..16]);
        let pool = nftstake_types::PoolId::from_be_bytes(pool);
        let token = nftstake_types::TokenId::from_be_bytes(token);
        assert_eq!(pool.to_be_bytes(), data[..8]);
        assert_eq!(token.to_be_bytes(), data[8..16]);
    }
});
