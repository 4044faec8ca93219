use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::FieldElement;
use crate::hash::Digest;
use crate::merkle::{MerkleError, MultiBranch};

/// One folding round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriRound {
    /// Commitment to the folded column.
    pub column_root: Digest,
    /// Column openings at the sampled indices.
    pub column_branch: MultiBranch,
    /// Openings of the four row entries behind every sampled index.
    pub poly_branch: MultiBranch,
}

/// Complete low-degree proof: folding rounds followed by the remainder
/// codeword in the clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriProof {
    pub rounds: Vec<FriRound>,
    pub remainder: Vec<FieldElement>,
}

/// FRI proving and verification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FriError {
    /// Codeword length does not match the order of the root of unity.
    #[error("codeword of length {len} does not match domain size {domain}")]
    DomainMismatch { len: usize, domain: usize },
    /// Degree bound is not below the domain size.
    #[error("degree bound {maxdeg_plus_1} too large for domain size {domain}")]
    DegreeBoundTooLarge { maxdeg_plus_1: usize, domain: usize },
    /// Proof carried an unexpected number of rounds.
    #[error("expected {expected} fri rounds, got {got}")]
    RoundCountMismatch { expected: usize, got: usize },
    /// Merkle opening failed.
    #[error("merkle opening failed in round {round}: {source}")]
    Merkle {
        round: usize,
        #[source]
        source: MerkleError,
    },
    /// An opened leaf was not a canonical field encoding.
    #[error("non-canonical value opened in round {round}")]
    NonCanonicalValue { round: usize },
    /// Row interpolation disagrees with the committed column.
    #[error("column value mismatch in round {round} at index {index}")]
    ColumnMismatch { round: usize, index: usize },
    /// Remainder does not hash to the last committed root.
    #[error("remainder does not match the final commitment")]
    RemainderRootMismatch,
    /// Too few remainder points survive exclusion to test the degree bound.
    #[error("remainder has {available} usable points, degree bound needs more than {maxdeg_plus_1}")]
    RemainderTooShort { available: usize, maxdeg_plus_1: usize },
    /// Remainder is not of the claimed degree.
    #[error("remainder exceeds the degree bound at position {position}")]
    RemainderDegree { position: usize },
}

impl FriError {
    pub(crate) fn merkle(round: usize) -> impl FnOnce(MerkleError) -> Self {
        move |source| FriError::Merkle { round, source }
    }
}
