use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::Digest;

/// Authentication path for a single leaf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBranch {
    /// Opened leaf.
    pub leaf: Digest,
    /// Sibling digests from the leaf level up to just below the root.
    pub siblings: Vec<Digest>,
}

impl MerkleBranch {
    /// Number of leaves in the tree this branch was cut from.
    pub fn leaf_count(&self) -> usize {
        1usize << self.siblings.len()
    }
}

/// Batched opening of several leaves.
///
/// `leaves[i]` is the leaf at the `i`-th requested index.  `siblings` holds
/// every digest the verifier cannot recompute, ordered level by level from
/// the leaves upwards and left to right within a level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiBranch {
    /// Opened leaves in request order.
    pub leaves: Vec<Digest>,
    /// Deduplicated authentication digests.
    pub siblings: Vec<Digest>,
}

/// Errors emitted by the Merkle layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// Leaf count is not a power of two of at least four.
    #[error("leaf count {0} must be a power of two of at least 4")]
    InvalidLeafCount(usize),
    /// Requested index lies outside the tree.
    #[error("index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },
    /// Opening carried a different number of leaves than indices.
    #[error("expected {expected} opened leaves, got {got}")]
    LeafCountMismatch { expected: usize, got: usize },
    /// The same index was opened with two different leaves.
    #[error("conflicting leaves opened at index {index}")]
    ConflictingLeaves { index: usize },
    /// Authentication path had too few or too many digests.
    #[error("invalid authentication path length")]
    InvalidPathLength,
    /// Recomputed root does not match the commitment.
    #[error("merkle root mismatch")]
    RootMismatch,
}
