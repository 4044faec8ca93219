//! # Proof module overview
//!
//! ```text
//! proof
//! ├── types      : SolvencyProof, ClaimedSums and the spot-check entries
//! ├── prover     : prove / prove_with_artifacts
//! ├── verifier   : verify / verify_por_proof
//! ├── pow        : proof-of-work grinding over the trace root
//! ├── inclusion  : per-user inclusion proofs
//! └── errors     : ProverError, VerifierError
//! ```

pub mod errors;
pub mod inclusion;
pub mod pow;
pub mod prover;
pub mod types;
pub mod verifier;

pub use errors::{Constraint, ProverError, VerifierError};
pub use inclusion::{verify_inclusion_proof, InclusionProof};
pub use pow::{check_proof_of_work, proof_of_work};
pub use prover::{prove, prove_with_artifacts, ProverArtifacts, ProverOutput};
pub use types::{ClaimedSums, CoinEntry, CompactEntry, FullEntry, SolvencyProof, SpotCheck};
pub use verifier::{check_sum_values, verify, verify_por_proof};
