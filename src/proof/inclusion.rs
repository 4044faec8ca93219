//! Per-user inclusion proofs into the trace commitment.
//!
//! A user's entry sits on the net-value row of their block.  The proof
//! reveals that entry (net value, signed balances, id and the constraint
//! salt blinding the leaf) together with a single Merkle branch, letting the
//! user check their balances were counted without seeing anyone else's.

use serde::{Deserialize, Serialize};

use crate::field::FieldElement;
use crate::hash::Digest;
use crate::merkle::{verify_branch, MerkleBranch};
use crate::params::PorParams;

use super::errors::VerifierError;
use super::types::{coins_digest, trace_leaf};

/// Committed values on one user's net-value row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserEntry {
    pub(crate) net_value: FieldElement,
    pub(crate) balances: Vec<FieldElement>,
    pub(crate) id: FieldElement,
    pub(crate) salt: Digest,
}

/// Evidence that one user's balances are part of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Index of the user within the batch.
    pub user_index: usize,
    pub uts: usize,
    pub net_value: FieldElement,
    /// Balances decoded to signed integers.
    pub balances: Vec<i64>,
    pub user_id: FieldElement,
    pub salt: Digest,
    pub branch: MerkleBranch,
}

impl InclusionProof {
    pub(crate) fn new(
        user_index: usize,
        uts: usize,
        entry: &UserEntry,
        branch: MerkleBranch,
    ) -> Self {
        Self {
            user_index,
            uts,
            net_value: entry.net_value,
            balances: entry.balances.iter().map(FieldElement::as_signed).collect(),
            user_id: entry.id,
            salt: entry.salt,
            branch,
        }
    }

    /// Extended-domain position of the user's entry.
    pub fn position(&self, extension_factor: usize) -> usize {
        (self.uts * (self.user_index + 1) + self.uts - 2) * extension_factor
    }
}

/// Checks an inclusion proof against a trace root.
///
/// Balances whose magnitude exceeds `max_user_value` are rejected, so a huge
/// positive value cannot pose as a small negative one.  The net value is only
/// bounded through the balances it must equal the sum of; across several
/// coins it may legitimately exceed `max_user_value`.
pub fn verify_inclusion_proof(
    params: &PorParams,
    trace_root: &Digest,
    proof: &InclusionProof,
) -> Result<(), VerifierError> {
    let limit = params.max_user_value();
    if let Some(value) = proof
        .balances
        .iter()
        .copied()
        .find(|value| value.unsigned_abs() > limit)
    {
        return Err(VerifierError::InclusionBalanceOutOfRange { value });
    }
    let sum: i128 = proof.balances.iter().map(|value| *value as i128).sum();
    if sum != proof.net_value.as_u64() as i128 {
        return Err(VerifierError::InclusionSumMismatch);
    }

    let leaf = verify_branch(
        trace_root,
        proof.position(params.extension_factor()),
        &proof.branch,
    )
    .map_err(VerifierError::InclusionBranch)?;
    let balances: Vec<FieldElement> = proof
        .balances
        .iter()
        .copied()
        .map(FieldElement::from_i64)
        .collect();
    let expected = trace_leaf(
        proof.net_value,
        &coins_digest(&balances),
        proof.user_id,
        &proof.salt,
    );
    if leaf != expected {
        return Err(VerifierError::InclusionLeafHash);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_position_matches_the_net_row() {
        let proof = InclusionProof {
            user_index: 2,
            uts: 8,
            net_value: FieldElement::ZERO,
            balances: Vec::new(),
            user_id: FieldElement::ZERO,
            salt: Digest::default(),
            branch: MerkleBranch {
                leaf: Digest::default(),
                siblings: Vec::new(),
            },
        };
        assert_eq!(proof.position(8), (8 * 3 + 6) * 8);
    }
}
