//! Quartic FRI low-degree proofs.
//!
//! Each round commits the current codeword, derives `special_x` from its
//! root, and folds every row of four quarter-stride evaluations into one
//! column value by interpolating the row and evaluating at `special_x`.  The
//! column is a codeword of a polynomial of a quarter of the degree over a
//! domain a quarter of the size.  Rounds continue until the degree bound is
//! at most [`DIRECT_PROOF_THRESHOLD`], at which point the remaining codeword
//! is sent in the clear.
//!
//! Sample indices are derived once, from the first column root, and folded
//! modulo the column length in later rounds so openings of successive rounds
//! line up.

mod folding;
mod prover;
mod types;
mod verifier;

pub use folding::{fold_column, quartic_roots_of_unity, row_positions};
pub use prover::{prove_committed_low_degree, prove_low_degree};
pub use types::{FriError, FriProof, FriRound};
pub use verifier::verify_low_degree_proof;

/// Degree bound at or below which the codeword itself is the proof.
pub const DIRECT_PROOF_THRESHOLD: usize = 16;

/// Number of folding rounds needed to bring `maxdeg_plus_1` down to the
/// direct threshold.
pub fn round_count(mut maxdeg_plus_1: usize) -> usize {
    let mut rounds = 0;
    while maxdeg_plus_1 > DIRECT_PROOF_THRESHOLD {
        maxdeg_plus_1 /= 4;
        rounds += 1;
    }
    rounds
}
