//! Utility helpers: Fiat–Shamir sampling and the parallelism switch.

pub mod parallel;
pub mod randomness;

#[cfg(feature = "parallel")]
pub use parallel::task_len;
pub use parallel::{
    map_indices, map_weighted, parallelism_enabled, set_parallelism, ParallelismGuard, HASH_OPS,
};
pub use randomness::{
    derive_coefficients, get_power_cycle, get_pseudorandom_indices, MAX_SAMPLE_MODULUS,
};
