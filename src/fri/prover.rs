use tracing::{debug, instrument};

use super::folding::{fold_column, row_positions};
use super::types::{FriError, FriProof, FriRound};
use super::DIRECT_PROOF_THRESHOLD;
use crate::fft::root_order;
use crate::field::FieldElement;
use crate::merkle::MerkleTree;
use crate::utils::get_pseudorandom_indices;

/// Proves that `values`, evaluations over the subgroup generated by
/// `root_of_unity`, agree with a polynomial of degree below `maxdeg_plus_1`.
///
/// Column indices of the first round avoid multiples of
/// `exclude_multiples_of` (0 disables exclusion).
pub fn prove_low_degree(
    values: &[FieldElement],
    root_of_unity: FieldElement,
    maxdeg_plus_1: usize,
    exclude_multiples_of: usize,
    query_count: usize,
) -> Result<FriProof, FriError> {
    check_domain(values.len(), root_of_unity, maxdeg_plus_1)?;
    let tree = MerkleTree::commit_elements(values).map_err(FriError::merkle(0))?;
    prove_committed_low_degree(
        values,
        tree,
        root_of_unity,
        maxdeg_plus_1,
        exclude_multiples_of,
        query_count,
    )
}

/// [`prove_low_degree`] for a codeword the caller already committed to with
/// [`MerkleTree::commit_elements`]; `tree` must be that commitment.
#[instrument(
    skip_all,
    name = "fri::prove_low_degree",
    fields(len = values.len(), maxdeg_plus_1 = maxdeg_plus_1)
)]
pub fn prove_committed_low_degree(
    values: &[FieldElement],
    mut tree: MerkleTree,
    root_of_unity: FieldElement,
    maxdeg_plus_1: usize,
    exclude_multiples_of: usize,
    query_count: usize,
) -> Result<FriProof, FriError> {
    let domain = check_domain(values.len(), root_of_unity, maxdeg_plus_1)?;
    if tree.leaf_count() != domain {
        return Err(FriError::DomainMismatch {
            len: tree.leaf_count(),
            domain,
        });
    }

    let mut rounds = Vec::new();
    let mut current = values.to_vec();
    let mut root = root_of_unity;
    let mut maxdeg = maxdeg_plus_1;
    let mut samples: Vec<usize> = Vec::new();

    while maxdeg > DIRECT_PROOF_THRESHOLD {
        let round = rounds.len();
        let special_x = tree.root().to_field();
        let column = fold_column(&current, root, special_x);
        let column_tree = MerkleTree::commit_elements(&column).map_err(FriError::merkle(round))?;

        samples = if round == 0 {
            get_pseudorandom_indices(
                column_tree.root().as_bytes(),
                column.len(),
                query_count,
                exclude_multiples_of,
            )
        } else {
            samples.iter().map(|y| y % column.len()).collect()
        };
        let positions = row_positions(&samples, current.len());

        rounds.push(FriRound {
            column_root: column_tree.root(),
            column_branch: column_tree
                .multi_branch(&samples)
                .map_err(FriError::merkle(round))?,
            poly_branch: tree
                .multi_branch(&positions)
                .map_err(FriError::merkle(round))?,
        });
        debug!(round, domain = current.len(), maxdeg, "fri round committed");

        current = column;
        tree = column_tree;
        root = root.pow(4);
        maxdeg /= 4;
    }

    debug!(rounds = rounds.len(), remainder = current.len(), "fri proof complete");
    Ok(FriProof {
        rounds,
        remainder: current,
    })
}

fn check_domain(
    len: usize,
    root_of_unity: FieldElement,
    maxdeg_plus_1: usize,
) -> Result<usize, FriError> {
    let domain = root_order(root_of_unity);
    if len != domain {
        return Err(FriError::DomainMismatch { len, domain });
    }
    if maxdeg_plus_1 >= domain {
        return Err(FriError::DegreeBoundTooLarge {
            maxdeg_plus_1,
            domain,
        });
    }
    Ok(domain)
}
