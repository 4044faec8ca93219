//! Keccak Merkle commitments over quarter-stride permuted leaves.
//!
//! The module fixes the following protocol knobs:
//!
//! * **Arity:** binary.  Internal nodes are `keccak256(left || right)`.
//! * **Leaves:** 32-byte digests.  Field vectors are committed through their
//!   big-endian word encoding, structured rows through their entry hash.
//! * **Permutation:** element `i` of a vector of length `L` is stored at leaf
//!   `i / (L/4) + 4 * (i mod L/4)`, so the four elements
//!   `i, i + L/4, i + 2L/4, i + 3L/4` that FRI folds together sit in adjacent
//!   leaves and share most of their authentication path.
//! * **Layout:** the tree is a flat array of `2n` digests; `nodes[1]` is the
//!   root and the leaves occupy `nodes[n..2n]`.
//!
//! Callers always address leaves by their *original* index; the permutation
//! is applied internally on both the opening and the verifying side.

mod proof;
mod tree;
mod types;

pub use proof::{verify_branch, verify_multi_branch};
pub use tree::{permute4, permute4_index, MerkleTree};
pub use types::{MerkleBranch, MerkleError, MultiBranch};
