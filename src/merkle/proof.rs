use crate::hash::{hash_pair, Digest};

use super::tree::{ensure_leaf_count, permute4_index};
use super::types::{MerkleBranch, MerkleError, MultiBranch};

/// Checks a single-leaf branch against `root` and returns the opened leaf.
///
/// The tree size is implied by the path length.
pub fn verify_branch(
    root: &Digest,
    index: usize,
    branch: &MerkleBranch,
) -> Result<Digest, MerkleError> {
    if branch.siblings.len() >= usize::BITS as usize {
        return Err(MerkleError::InvalidPathLength);
    }
    let leaf_count = branch.leaf_count();
    ensure_leaf_count(leaf_count)?;
    if index >= leaf_count {
        return Err(MerkleError::IndexOutOfRange { index, leaf_count });
    }

    let mut position = permute4_index(index, leaf_count);
    let mut current = branch.leaf;
    for sibling in &branch.siblings {
        current = if position & 1 == 0 {
            hash_pair(&current, sibling)
        } else {
            hash_pair(sibling, &current)
        };
        position >>= 1;
    }
    if current == *root {
        Ok(branch.leaf)
    } else {
        Err(MerkleError::RootMismatch)
    }
}

/// Checks a batched opening of `indices` in a tree of `leaf_count` leaves
/// and returns the opened leaves in request order.
pub fn verify_multi_branch(
    root: &Digest,
    leaf_count: usize,
    indices: &[usize],
    branch: &MultiBranch,
) -> Result<Vec<Digest>, MerkleError> {
    ensure_leaf_count(leaf_count)?;
    if branch.leaves.len() != indices.len() {
        return Err(MerkleError::LeafCountMismatch {
            expected: indices.len(),
            got: branch.leaves.len(),
        });
    }
    if indices.is_empty() {
        return Err(MerkleError::InvalidPathLength);
    }

    let mut current: Vec<(usize, Digest)> = Vec::with_capacity(indices.len());
    for (&index, leaf) in indices.iter().zip(&branch.leaves) {
        if index >= leaf_count {
            return Err(MerkleError::IndexOutOfRange { index, leaf_count });
        }
        current.push((leaf_count + permute4_index(index, leaf_count), *leaf));
    }
    current.sort_by_key(|(node, _)| *node);
    for window in current.windows(2) {
        if window[0].0 == window[1].0 && window[0].1 != window[1].1 {
            let position = window[0].0 - leaf_count;
            let index = indices
                .iter()
                .copied()
                .find(|index| permute4_index(*index, leaf_count) == position)
                .unwrap_or(position);
            return Err(MerkleError::ConflictingLeaves { index });
        }
    }
    current.dedup_by_key(|(node, _)| *node);

    let mut siblings = branch.siblings.iter();
    while current[0].0 > 1 {
        let mut next = Vec::with_capacity(current.len());
        let mut i = 0;
        while i < current.len() {
            let (node, digest) = current[i];
            let parent = if node & 1 == 0 {
                match current.get(i + 1) {
                    Some((other, right)) if *other == node + 1 => {
                        i += 2;
                        hash_pair(&digest, right)
                    }
                    _ => {
                        let right = siblings.next().ok_or(MerkleError::InvalidPathLength)?;
                        i += 1;
                        hash_pair(&digest, right)
                    }
                }
            } else {
                let left = siblings.next().ok_or(MerkleError::InvalidPathLength)?;
                i += 1;
                hash_pair(left, &digest)
            };
            next.push((node / 2, parent));
        }
        current = next;
    }

    if siblings.next().is_some() {
        return Err(MerkleError::InvalidPathLength);
    }
    if current[0].1 == *root {
        Ok(branch.leaves.clone())
    } else {
        Err(MerkleError::RootMismatch)
    }
}
