//! Proof-of-work grinding over the trace commitment.
//!
//! The nonce search starts at the trace root read as a 256-bit big-endian
//! integer and walks upward until `keccak(root || nonce)` has `pow_bits`
//! leading zero bits.  The parallel search scans fixed windows and keeps the
//! lowest hit in each, so both paths return the same nonce.

use tracing::{debug, instrument};

use crate::hash::{Digest, Hasher};

#[cfg(feature = "parallel")]
const SEARCH_WINDOW: u64 = 1 << 14;

/// Adds `offset` to a 256-bit big-endian integer, wrapping on overflow.
pub fn nonce_at(base: &Digest, offset: u64) -> Digest {
    let mut bytes = base.into_bytes();
    let mut carry = offset as u128;
    for byte in bytes.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = *byte as u128 + (carry & 0xff);
        *byte = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
    Digest::from_bytes(bytes)
}

/// Returns `true` when `keccak(root || nonce)` has `pow_bits` leading zeros.
pub fn check_proof_of_work(root: &Digest, nonce: &Digest, pow_bits: u32) -> bool {
    let mut hasher = Hasher::new();
    hasher.update(root.as_bytes()).update(nonce.as_bytes());
    leading_zero_bits(hasher.finalize().as_bytes()) >= pow_bits
}

fn leading_zero_bits(bytes: &[u8]) -> u32 {
    let mut zeros = 0;
    for byte in bytes {
        if *byte == 0 {
            zeros += 8;
        } else {
            return zeros + byte.leading_zeros();
        }
    }
    zeros
}

/// Finds the lowest nonce at or above `root` meeting the difficulty.
#[instrument(skip_all, name = "proof::proof_of_work", fields(pow_bits = pow_bits))]
pub fn proof_of_work(root: &Digest, pow_bits: u32) -> Digest {
    let offset = search(root, pow_bits);
    debug!(attempts = offset + 1, "proof-of-work nonce found");
    nonce_at(root, offset)
}

#[cfg(feature = "parallel")]
fn search(root: &Digest, pow_bits: u32) -> u64 {
    use rayon::prelude::*;

    if !crate::utils::parallelism_enabled() {
        return sequential_search(root, pow_bits, 0);
    }
    let mut start = 0u64;
    loop {
        let hit = (start..start + SEARCH_WINDOW)
            .into_par_iter()
            .find_first(|offset| check_proof_of_work(root, &nonce_at(root, *offset), pow_bits));
        if let Some(offset) = hit {
            return offset;
        }
        start += SEARCH_WINDOW;
    }
}

#[cfg(not(feature = "parallel"))]
fn search(root: &Digest, pow_bits: u32) -> u64 {
    sequential_search(root, pow_bits, 0)
}

fn sequential_search(root: &Digest, pow_bits: u32, start: u64) -> u64 {
    (start..)
        .find(|offset| check_proof_of_work(root, &nonce_at(root, *offset), pow_bits))
        .unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash;
    use crate::utils::set_parallelism;

    #[test]
    fn nonce_addition_carries_across_bytes() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xff;
        bytes[30] = 0xff;
        let nonce = nonce_at(&Digest::from_bytes(bytes), 1);
        assert_eq!(nonce.as_bytes()[29], 1);
        assert_eq!(nonce.as_bytes()[30], 0);
        assert_eq!(nonce.as_bytes()[31], 0);
        assert_eq!(nonce_at(&Digest::from_bytes([0xff; 32]), 1), Digest::from_bytes([0; 32]));
    }

    #[test]
    fn found_nonce_meets_the_difficulty() {
        let root = hash(b"trace root");
        let nonce = proof_of_work(&root, 10);
        assert!(check_proof_of_work(&root, &nonce, 10));
        assert!(nonce >= root);
    }

    #[test]
    fn zero_difficulty_accepts_the_root_itself() {
        let root = hash(b"easy");
        assert_eq!(proof_of_work(&root, 0), root);
    }

    #[test]
    fn parallel_and_sequential_search_agree() {
        let root = hash(b"agree");
        let parallel = proof_of_work(&root, 12);
        let _guard = set_parallelism(false);
        assert_eq!(proof_of_work(&root, 12), parallel);
    }

    #[test]
    fn leading_zero_count() {
        assert_eq!(leading_zero_bits(&[0, 0x10, 0xff]), 11);
        assert_eq!(leading_zero_bits(&[0, 0]), 16);
    }
}
