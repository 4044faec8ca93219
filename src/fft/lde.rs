//! Low-degree extension from the trace domain to the evaluation domain.
//!
//! A trace column of `steps` values is interpolated over the subgroup of
//! order `steps` (generator `G1`) and re-evaluated over the subgroup of order
//! `steps * extension_factor` (generator `G2`, with `G1 = G2^extension_factor`).
//! Trace row `i` therefore lands at extended position `i * extension_factor`.

use crate::field::FieldElement as Felt;

use super::{fft, ifft, powers};

/// Interpolates `values` on the subgroup of `trace_root` and evaluates the
/// result on the subgroup of `extended_root`.
pub fn low_degree_extension(values: &[Felt], trace_root: Felt, extended_root: Felt) -> Vec<Felt> {
    let coefficients = ifft(values, trace_root);
    fft(&coefficients, extended_root)
}

/// Pair of nested radix-2 domains used by the prover and the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationDomain {
    /// Number of trace rows.
    pub steps: usize,
    /// Blow-up between the trace and the evaluation domain.
    pub extension_factor: usize,
    /// Generator of the extended domain (`G2`).
    pub extended_root: Felt,
    /// Generator of the trace domain (`G1 = G2^extension_factor`).
    pub trace_root: Felt,
}

impl EvaluationDomain {
    /// Derives both generators from `nonresidue`.
    ///
    /// # Panics
    ///
    /// Panics unless `steps * extension_factor` is a power of two dividing
    /// `MODULUS - 1`.
    pub fn new(nonresidue: Felt, steps: usize, extension_factor: usize) -> Self {
        let precision = steps * extension_factor;
        let extended_root = Felt::root_of_unity(nonresidue, precision as u64);
        let trace_root = extended_root.pow(extension_factor as u64);
        Self {
            steps,
            extension_factor,
            extended_root,
            trace_root,
        }
    }

    /// Size of the extended domain.
    pub fn precision(&self) -> usize {
        self.steps * self.extension_factor
    }

    /// All points of the extended domain, `G2^i` for `i < precision`.
    pub fn points(&self) -> Vec<Felt> {
        powers(self.extended_root, self.precision())
    }

    /// Extended-domain point at `index`.
    pub fn point(&self, index: usize) -> Felt {
        self.extended_root.pow(index as u64)
    }

    /// Extends a trace column of length `steps`.
    pub fn extend(&self, column: &[Felt]) -> Vec<Felt> {
        low_degree_extension(column, self.trace_root, self.extended_root)
    }
}
