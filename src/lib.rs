//! STARK proofs of solvency.
//!
//! A prover commits to a batch of per-user, per-coin balances and proves two
//! things without revealing any balance: the balances add up to the claimed
//! per-coin sums and total, and every user's net value is non-negative.
//!
//! ```text
//! field ─ fft ─ hash ─ merkle ─ fri
//!                          └── air ── proof (prove / verify / inclusion)
//! ```
//!
//! [`prove`] returns a [`SolvencyProof`] with the [`ClaimedSums`] it attests
//! to; [`verify`] checks a proof against claimed sums.  Every tunable lives
//! in [`PorParams`].

pub mod air;
pub mod fft;
pub mod field;
pub mod fri;
pub mod hash;
pub mod merkle;
pub mod params;
pub mod proof;
pub mod utils;

pub use field::FieldElement;
pub use params::{ParamsError, PorParams, PorParamsBuilder};
pub use proof::{
    prove, prove_with_artifacts, verify, verify_inclusion_proof, verify_por_proof, ClaimedSums,
    InclusionProof, ProverError, SolvencyProof, VerifierError,
};
