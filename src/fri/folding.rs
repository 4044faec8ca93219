use crate::fft::powers;
use crate::field::{eval_quartic, multi_interp_4, FieldElement};
use crate::utils::map_weighted;

const FOLD_CHUNK: usize = 1 << 10;
/// Interpolating and evaluating one quartic, in field multiplications.
const ROW_OPS: usize = 32;

/// Folds a codeword over the subgroup of `root` into its column at
/// `special_x`.
///
/// Row `i` is the four points `root^(i + k*L/4)` for `k = 0..4`.
pub fn fold_column(
    values: &[FieldElement],
    root: FieldElement,
    special_x: FieldElement,
) -> Vec<FieldElement> {
    let quarter = values.len() / 4;
    let xs = powers(root, values.len());
    let chunks = quarter.div_ceil(FOLD_CHUNK);

    let parts: Vec<Vec<FieldElement>> = map_weighted(chunks, FOLD_CHUNK * ROW_OPS, |chunk| {
        let start = chunk * FOLD_CHUNK;
        let end = (start + FOLD_CHUNK).min(quarter);
        let xsets: Vec<[FieldElement; 4]> = (start..end)
            .map(|i| core::array::from_fn(|k| xs[i + k * quarter]))
            .collect();
        let ysets: Vec<[FieldElement; 4]> = (start..end)
            .map(|i| core::array::from_fn(|k| values[i + k * quarter]))
            .collect();
        multi_interp_4(&xsets, &ysets)
            .iter()
            .map(|poly| eval_quartic(poly, special_x))
            .collect()
    });
    parts.concat()
}

/// The four fourth roots of unity `[1, w^(n/4), w^(n/2), w^(3n/4)]` for a
/// root `w` of order `n`.
pub fn quartic_roots_of_unity(root: FieldElement, order: usize) -> [FieldElement; 4] {
    let quarter = (order / 4) as u64;
    [
        FieldElement::ONE,
        root.pow(quarter),
        root.pow(2 * quarter),
        root.pow(3 * quarter),
    ]
}

/// Positions of the four codeword entries behind each column index.
pub fn row_positions(samples: &[usize], domain: usize) -> Vec<usize> {
    let quarter = domain / 4;
    samples
        .iter()
        .flat_map(|y| (0..4).map(move |k| y + k * quarter))
        .collect()
}
