#![allow(dead_code)]

use once_cell::sync::Lazy;
use por_stark::field::FieldElement;
use por_stark::params::{PorParams, PorParamsBuilder};
use por_stark::proof::{prove_with_artifacts, ProverOutput};

pub const USERS: usize = 15;
pub const UTS: usize = 16;
pub const MAIN_COINS: usize = 2;

/// Default parameters with a light proof-of-work so tests stay fast.
pub fn test_params() -> PorParams {
    PorParamsBuilder::new()
        .pow_bits(8)
        .build()
        .expect("test params")
}

pub fn user_ids(count: usize) -> Vec<FieldElement> {
    (0..count as u64)
        .map(|i| FieldElement::new(0xabc0_0000 + i))
        .collect()
}

/// Three coins, coin-major.  Coin 1 is negative for every fourth user while
/// every net value stays positive.
pub fn user_balances(count: usize) -> Vec<Vec<i64>> {
    let coin0 = (0..count as i64).map(|i| 10 * (i + 1) + i * i).collect();
    let coin1 = (0..count as i64)
        .map(|i| if i % 4 == 0 { -(i + 1) } else { 3 * i })
        .collect();
    let coin2 = (0..count as i64).map(|i| (i * 7) % 13).collect();
    vec![coin0, coin1, coin2]
}

pub static SOLVENCY_FIXTURE: Lazy<ProverOutput> = Lazy::new(|| {
    init_tracing();
    prove_with_artifacts(
        &test_params(),
        &user_ids(USERS),
        &user_balances(USERS),
        UTS,
        MAIN_COINS,
    )
    .expect("fixture proof")
});

pub fn solvency_fixture() -> &'static ProverOutput {
    &SOLVENCY_FIXTURE
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
