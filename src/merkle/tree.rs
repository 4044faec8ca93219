use crate::field::FieldElement;
use crate::hash::{hash_pair, Digest};

use super::types::{MerkleBranch, MerkleError, MultiBranch};

/// Position of element `index` after the quarter-stride permutation of a
/// vector of length `len` (a multiple of 4).
pub fn permute4_index(index: usize, len: usize) -> usize {
    let quarter = len / 4;
    index / quarter + 4 * (index % quarter)
}

/// Applies the quarter-stride permutation.
pub fn permute4<T: Clone>(values: &[T]) -> Vec<T> {
    let quarter = values.len() / 4;
    let mut out = Vec::with_capacity(values.len());
    for i in 0..quarter {
        for k in 0..4 {
            out.push(values[i + k * quarter].clone());
        }
    }
    out
}

pub(crate) fn ensure_leaf_count(leaf_count: usize) -> Result<(), MerkleError> {
    if leaf_count < 4 || !leaf_count.is_power_of_two() {
        return Err(MerkleError::InvalidLeafCount(leaf_count));
    }
    Ok(())
}

/// Array-backed Merkle tree storing every node for later openings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    nodes: Vec<Digest>,
}

impl MerkleTree {
    /// Commits to `leaves`, given in original (unpermuted) order.
    pub fn commit(leaves: &[Digest]) -> Result<Self, MerkleError> {
        let leaf_count = leaves.len();
        ensure_leaf_count(leaf_count)?;

        let mut nodes = vec![Digest::default(); 2 * leaf_count];
        nodes[leaf_count..].copy_from_slice(&permute4(leaves));

        let mut width = leaf_count / 2;
        while width >= 1 {
            let (upper, lower) = nodes.split_at_mut(2 * width);
            let children = &lower[..2 * width];
            hash_level(&mut upper[width..], children);
            width /= 2;
        }
        Ok(Self { nodes })
    }

    /// Commits to a vector of field elements through their word encoding.
    pub fn commit_elements(values: &[FieldElement]) -> Result<Self, MerkleError> {
        let leaves: Vec<Digest> = values
            .iter()
            .map(|value| Digest::from_bytes(value.to_bytes()))
            .collect();
        Self::commit(&leaves)
    }

    /// Root digest.
    pub fn root(&self) -> Digest {
        self.nodes[1]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.len() / 2
    }

    /// Leaf at original index `index`.
    pub fn leaf(&self, index: usize) -> Result<Digest, MerkleError> {
        let node = self.leaf_node(index)?;
        Ok(self.nodes[node])
    }

    /// Single-leaf authentication path.
    pub fn branch(&self, index: usize) -> Result<MerkleBranch, MerkleError> {
        let mut node = self.leaf_node(index)?;
        let leaf = self.nodes[node];
        let mut siblings = Vec::with_capacity(self.leaf_count().trailing_zeros() as usize);
        while node > 1 {
            siblings.push(self.nodes[node ^ 1]);
            node /= 2;
        }
        Ok(MerkleBranch { leaf, siblings })
    }

    /// Batched opening; shared and recomputable siblings are emitted once or
    /// not at all.
    pub fn multi_branch(&self, indices: &[usize]) -> Result<MultiBranch, MerkleError> {
        let mut current = Vec::with_capacity(indices.len());
        let mut leaves = Vec::with_capacity(indices.len());
        for &index in indices {
            let node = self.leaf_node(index)?;
            leaves.push(self.nodes[node]);
            current.push(node);
        }
        current.sort_unstable();
        current.dedup();

        let mut siblings = Vec::new();
        while current.first().is_some_and(|node| *node > 1) {
            let mut next = Vec::with_capacity(current.len());
            let mut i = 0;
            while i < current.len() {
                let node = current[i];
                let paired = node & 1 == 0
                    && current.get(i + 1).is_some_and(|other| *other == node + 1);
                if paired {
                    i += 2;
                } else {
                    siblings.push(self.nodes[node ^ 1]);
                    i += 1;
                }
                next.push(node / 2);
            }
            current = next;
        }
        Ok(MultiBranch { leaves, siblings })
    }

    fn leaf_node(&self, index: usize) -> Result<usize, MerkleError> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(MerkleError::IndexOutOfRange { index, leaf_count });
        }
        Ok(leaf_count + permute4_index(index, leaf_count))
    }
}

fn hash_level(parents: &mut [Digest], children: &[Digest]) {
    #[cfg(feature = "parallel")]
    {
        if crate::utils::parallelism_enabled() && parents.len() >= 256 {
            use rayon::prelude::*;
            let chunk = crate::utils::task_len(parents.len(), crate::utils::HASH_OPS);
            parents
                .par_iter_mut()
                .with_min_len(chunk)
                .enumerate()
                .for_each(|(i, parent)| {
                    *parent = hash_pair(&children[2 * i], &children[2 * i + 1]);
                });
            return;
        }
    }
    for (i, parent) in parents.iter_mut().enumerate() {
        *parent = hash_pair(&children[2 * i], &children[2 * i + 1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash;

    #[test]
    fn permutation_groups_quarter_strides() {
        let values: Vec<usize> = (0..16).collect();
        let permuted = permute4(&values);
        assert_eq!(&permuted[..8], &[0, 4, 8, 12, 1, 5, 9, 13]);
        for (i, value) in values.iter().enumerate() {
            assert_eq!(permuted[permute4_index(i, 16)], *value);
        }
    }

    #[test]
    fn four_leaf_root_by_hand() {
        let leaves: Vec<Digest> = (0u8..4).map(|i| hash(&[i])).collect();
        let tree = MerkleTree::commit(&leaves).expect("commit");
        let left = hash_pair(&leaves[0], &leaves[1]);
        let right = hash_pair(&leaves[2], &leaves[3]);
        assert_eq!(tree.root(), hash_pair(&left, &right));
    }

    #[test]
    fn rejects_bad_leaf_counts() {
        let leaves = vec![Digest::default(); 6];
        assert_eq!(
            MerkleTree::commit(&leaves),
            Err(MerkleError::InvalidLeafCount(6))
        );
        assert!(MerkleTree::commit(&leaves[..2]).is_err());
    }

    #[test]
    fn adjacent_openings_share_siblings() {
        let leaves: Vec<Digest> = (0u8..16).map(|i| hash(&[i])).collect();
        let tree = MerkleTree::commit(&leaves).expect("commit");
        let single = tree.multi_branch(&[3]).expect("open");
        assert_eq!(single.siblings.len(), 4);
        // 3 and 7 are neighbours after the permutation.
        let pair = tree.multi_branch(&[3, 7]).expect("open");
        assert_eq!(pair.siblings.len(), 3);
        let repeated = tree.multi_branch(&[3, 3]).expect("open");
        assert_eq!(repeated.siblings.len(), 4);
        assert_eq!(repeated.leaves, vec![leaves[3], leaves[3]]);
    }
}
