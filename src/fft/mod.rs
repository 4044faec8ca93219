//! Radix-2 FFT over the Goldilocks field.
//!
//! Transforms run over the cyclic subgroup generated by the supplied root.
//! Inputs shorter than the subgroup are zero padded, so a coefficient vector
//! of length `n` can be evaluated over any domain of size `>= n`.  Outputs
//! are always in natural order: `out[k] = sum_j values[j] * root^(j*k)`.

use crate::field::FieldElement as Felt;

pub mod lde;

pub use lde::{low_degree_extension, EvaluationDomain};

/// Largest transform supported, expressed as `log2(n)`.
pub const RADIX2_MAX_LOG2_SIZE: u32 = Felt::TWO_ADICITY;

/// Returns the multiplicative order of `root`.
///
/// # Panics
///
/// Panics unless the order is a power of two no larger than
/// `2^RADIX2_MAX_LOG2_SIZE`.
pub fn root_order(root: Felt) -> usize {
    let mut current = root;
    let mut log2 = 0u32;
    while current != Felt::ONE {
        assert!(
            log2 < RADIX2_MAX_LOG2_SIZE,
            "root of unity must have power-of-two order"
        );
        current = current.square();
        log2 += 1;
    }
    1usize << log2
}

/// Returns `[1, root, root^2, ..., root^(count-1)]`.
pub fn powers(root: Felt, count: usize) -> Vec<Felt> {
    let mut out = Vec::with_capacity(count);
    let mut current = Felt::ONE;
    for _ in 0..count {
        out.push(current);
        current *= root;
    }
    out
}

/// Evaluates the polynomial with coefficients `values` on the subgroup
/// generated by `root`.
///
/// # Panics
///
/// Panics when `values` is longer than the order of `root`.
pub fn fft(values: &[Felt], root: Felt) -> Vec<Felt> {
    let n = root_order(root);
    assert!(
        values.len() <= n,
        "fft input of length {} exceeds domain size {}",
        values.len(),
        n
    );
    let mut buffer = values.to_vec();
    buffer.resize(n, Felt::ZERO);
    let twiddles = powers(root, n / 2);
    transform(&mut buffer, &twiddles);
    buffer
}

/// Recovers coefficients from evaluations over the subgroup generated by
/// `root`.
///
/// # Panics
///
/// Panics when `values` is longer than the order of `root`.
pub fn ifft(values: &[Felt], root: Felt) -> Vec<Felt> {
    let inverse_root = root.inv().expect("roots of unity are non-zero");
    let mut out = fft(values, inverse_root);
    let scale = Felt::new(out.len() as u64)
        .inv()
        .expect("domain size is non-zero modulo p");
    for value in &mut out {
        *value *= scale;
    }
    out
}

fn bit_reverse_permute(values: &mut [Felt]) {
    let n = values.len();
    if n <= 2 {
        return;
    }
    let shift = usize::BITS - n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> shift;
        if i < j {
            values.swap(i, j);
        }
    }
}

fn butterfly_block(block: &mut [Felt], twiddles: &[Felt], stride: usize) {
    let half = block.len() / 2;
    let (lo, hi) = block.split_at_mut(half);
    for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
        let t = *b * twiddles[j * stride];
        *b = *a - t;
        *a += t;
    }
}

fn transform(values: &mut [Felt], twiddles: &[Felt]) {
    let n = values.len();
    bit_reverse_permute(values);
    let mut block = 2;
    while block <= n {
        let stride = n / block;
        #[cfg(feature = "parallel")]
        {
            if crate::utils::parallelism_enabled() && n >= 1 << 12 {
                use rayon::prelude::*;
                values
                    .par_chunks_mut(block)
                    .with_min_len(crate::utils::task_len(stride, block / 2))
                    .for_each(|chunk| butterfly_block(chunk, twiddles, stride));
                block *= 2;
                continue;
            }
        }
        for chunk in values.chunks_mut(block) {
            butterfly_block(chunk, twiddles, stride);
        }
        block *= 2;
    }
}
