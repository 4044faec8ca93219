//! Fiat–Shamir derivations shared by the prover and the verifier.
//!
//! Both sides expand a 32-byte seed (a Merkle root or the proof-of-work
//! nonce) with keccak-256, so any change to a committed value changes every
//! sampled position and every combination coefficient.

use crate::fft::{powers, root_order};
use crate::field::FieldElement;
use crate::hash::{hash, Hasher};

/// Exclusive upper bound on the modulus accepted by
/// [`get_pseudorandom_indices`]; indices are read from 4-byte words.
pub const MAX_SAMPLE_MODULUS: usize = 1 << 24;

/// Derives `count` indices in `[0, modulus)` from `seed`.
///
/// The seed is extended by repeatedly hashing its last 32 bytes until
/// `4 * count` bytes are available; each 4-byte big-endian word is reduced
/// modulo `modulus`.  With `exclude_multiples_of = e > 0` the words are
/// reduced modulo `modulus * (e - 1) / e` and mapped past every multiple of
/// `e`, so no sampled index is divisible by `e`.
///
/// # Panics
///
/// Panics when `modulus >= MAX_SAMPLE_MODULUS`, when `modulus` is zero, or
/// when `exclude_multiples_of == 1`.
pub fn get_pseudorandom_indices(
    seed: &[u8],
    modulus: usize,
    count: usize,
    exclude_multiples_of: usize,
) -> Vec<usize> {
    assert!(
        modulus > 0 && modulus < MAX_SAMPLE_MODULUS,
        "sampling modulus must lie in [1, 2^24)"
    );
    assert_ne!(exclude_multiples_of, 1, "cannot exclude every index");

    let mut data = seed.to_vec();
    while data.len() < 4 * count {
        let tail = data[data.len().saturating_sub(32)..].to_vec();
        data.extend_from_slice(hash(&tail).as_bytes());
    }

    let words = data
        .chunks_exact(4)
        .take(count)
        .map(|word| u32::from_be_bytes([word[0], word[1], word[2], word[3]]) as usize);

    if exclude_multiples_of == 0 {
        words.map(|word| word % modulus).collect()
    } else {
        let e = exclude_multiples_of;
        let real_modulus = modulus * (e - 1) / e;
        words
            .map(|word| word % real_modulus)
            .map(|x| x + 1 + x / (e - 1))
            .collect()
    }
}

/// Returns `[1, root, root^2, ...]` up to, but excluding, the return to 1.
pub fn get_power_cycle(root: FieldElement) -> Vec<FieldElement> {
    powers(root, root_order(root))
}

/// Derives `count` field coefficients `k_i = keccak(seed || enc(i)) mod p`.
pub fn derive_coefficients(seed: &[u8], count: usize) -> Vec<FieldElement> {
    (0..count)
        .map(|i| {
            let mut hasher = Hasher::new();
            hasher
                .update(seed)
                .update_element(FieldElement::new(i as u64));
            hasher.finalize().to_field()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_multiples_never_sampled() {
        let seed = hash(b"seed");
        let indices = get_pseudorandom_indices(seed.as_bytes(), 512, 200, 8);
        assert_eq!(indices.len(), 200);
        assert!(indices.iter().all(|i| *i < 512 && i % 8 != 0));
    }

    #[test]
    fn plain_indices_follow_seed_words() {
        let mut seed = [0u8; 32];
        seed[..4].copy_from_slice(&1000u32.to_be_bytes());
        seed[4..8].copy_from_slice(&7u32.to_be_bytes());
        let indices = get_pseudorandom_indices(&seed, 64, 2, 0);
        assert_eq!(indices, vec![1000 % 64, 7]);
    }

    #[test]
    fn power_cycle_has_root_order() {
        let root = FieldElement::root_of_unity(FieldElement::GENERATOR, 16);
        let cycle = get_power_cycle(root);
        assert_eq!(cycle.len(), 16);
        assert_eq!(cycle[1], root);
    }

    #[test]
    fn coefficients_depend_on_index() {
        let coefficients = derive_coefficients(b"nonce", 4);
        assert_eq!(coefficients.len(), 4);
        assert_ne!(coefficients[0], coefficients[1]);
        assert_eq!(derive_coefficients(b"nonce", 2), coefficients[..2].to_vec());
    }
}
