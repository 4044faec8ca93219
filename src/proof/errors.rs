//! Prover and verifier failure classes.

use core::fmt;

use thiserror::Error;

use crate::air::AirError;
use crate::fri::FriError;
use crate::merkle::MerkleError;

/// Failures while building a proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProverError {
    /// Inputs or witness rejected by the arithmetization.
    #[error(transparent)]
    Air(#[from] AirError),
    /// Commitment construction failed.
    #[error("commitment failed: {0}")]
    Merkle(#[from] MerkleError),
    /// Low-degree proof construction failed.
    #[error("low-degree proof failed: {0}")]
    Fri(#[from] FriError),
    /// Requested inclusion proof for a user outside the batch.
    #[error("user {user} is not part of a batch of {users} users")]
    UnknownUser { user: usize, users: usize },
}

/// Constraint identities checked at every spot-check position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// 1: first row of each user block is zero.
    FirstRowZero,
    /// 2: rows unfold in base 4.
    BaseFourUnfolding,
    /// 3: net values accumulate across users.
    Accumulation,
    /// 4: running sum starts at zero and ends at the total.
    Boundary,
    /// 5: net value equals the sum of the user's balances.
    CoinSplit,
    /// Per-coin accumulation.
    CoinAccumulation { coin: usize },
    /// Per-coin boundary.
    CoinBoundary { coin: usize },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::FirstRowZero => f.write_str("constraint 1 (first row zero)"),
            Constraint::BaseFourUnfolding => f.write_str("constraint 2 (base-4 unfolding)"),
            Constraint::Accumulation => f.write_str("constraint 3 (accumulation)"),
            Constraint::Boundary => f.write_str("constraint 4 (boundary)"),
            Constraint::CoinSplit => f.write_str("constraint 5 (coin split)"),
            Constraint::CoinAccumulation { coin } => write!(f, "coin {coin} accumulation"),
            Constraint::CoinBoundary { coin } => write!(f, "coin {coin} boundary"),
        }
    }
}

/// Failures while verifying a solvency or inclusion proof.  The first
/// failing check aborts verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    #[error("claimed sums carry no coins")]
    NoCoins,
    #[error("claimed sum of coin {coin} is non-canonical or exceeds what a batch can hold")]
    CoinSumOutOfRange { coin: usize },
    #[error("claimed total {total} is not below the batch limit {max}")]
    TotalOutOfRange { total: u128, max: u128 },
    #[error("claimed total {claimed} differs from the signed coin sums {computed}")]
    TotalMismatch { claimed: u128, computed: i128 },
    #[error("{main_coins} main coins requested for {coins} coins")]
    TooManyMainCoins { main_coins: usize, coins: usize },
    #[error("invalid proof shape: steps {steps}, uts {uts}")]
    InvalidShape { steps: usize, uts: usize },
    #[error("proof-of-work nonce does not meet the difficulty")]
    ProofOfWork,
    #[error("low-degree proof rejected: {0}")]
    Fri(#[from] FriError),
    #[error("expected {expected} spot checks, got {got}")]
    SpotCheckCount { expected: usize, got: usize },
    #[error("spot check {index} has malformed entries")]
    EntryShape { index: usize },
    #[error("trace opening rejected: {0}")]
    TraceOpening(MerkleError),
    #[error("trace entry hash mismatch at spot check {index}")]
    EntryHash { index: usize },
    #[error("combination opening rejected: {0}")]
    CombinationOpening(MerkleError),
    #[error("non-canonical combination value at spot check {index}")]
    NonCanonicalValue { index: usize },
    #[error("zerofier vanishes at spot check {index}")]
    DegeneratePosition { index: usize },
    #[error("{constraint} fails at spot check {index}")]
    Constraint { index: usize, constraint: Constraint },
    #[error("linear combination mismatch at spot check {index}")]
    LinearCombination { index: usize },
    #[error("inclusion branch rejected: {0}")]
    InclusionBranch(MerkleError),
    #[error("inclusion balance {value} is out of range")]
    InclusionBalanceOutOfRange { value: i64 },
    #[error("inclusion balances do not sum to the net value")]
    InclusionSumMismatch,
    #[error("inclusion leaf hash mismatch")]
    InclusionLeafHash,
}
