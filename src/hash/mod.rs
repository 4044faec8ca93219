//! Keccak-256 hashing used for commitments and Fiat–Shamir derivations.
//!
//! Field elements enter the hash as 32-byte big-endian words (see
//! [`crate::field::FieldElement::to_bytes`]).  Digests are mapped back into the field by
//! reading all 32 bytes as a big-endian integer and reducing modulo `p`.

mod keccak;

pub use keccak::{hash, hash_elements, hash_pair, Digest, Hasher, HexOutput, DIGEST_SIZE};
