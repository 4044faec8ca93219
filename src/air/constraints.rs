//! Constraint evaluations over the extended domain.
//!
//! Every constraint is `numerator * zerofier^-1`, evaluated pointwise with
//! batch-inverted zerofiers.  Zerofier roots all sit at multiples of the
//! extension factor, the positions spot checks and FRI never sample.
//!
//! | # | numerator                                       | vanishes on                  |
//! |---|-------------------------------------------------|------------------------------|
//! | 1 | `t(x)`                                          | first row of each block      |
//! | 2 | `prod_d (t(gx) - 4 t(x) - d)`, `d = 0..4`        | rows `0..uts-2` of each block|
//! | 3 | `t(g^uts x) - t(g^(uts-1) x) - t(x)`            | sum rows except the last     |
//! | 4 | `t(x) - I(x)`                                   | first and last sum rows      |
//! | 5 | `t(x) - sum_j b_j(x)`                           | net-value rows               |
//!
//! Each main coin adds the analogues of 3 and 4 on its own column.

use tracing::{debug, instrument};

use crate::field::{batch_inverse, FieldElement};
use crate::hash::{Digest, Hasher};
use crate::utils::map_indices;

use super::context::SolvencyLayout;
use super::trace::ExtendedTrace;

/// Number of constraints on the main column.
pub const TRACE_CONSTRAINTS: usize = 5;

/// Constraint evaluations of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    /// The five main-column constraints.
    pub trace: [Vec<FieldElement>; TRACE_CONSTRAINTS],
    /// Accumulation and boundary constraint for every main coin.
    pub coins: Vec<[Vec<FieldElement>; 2]>,
}

struct Zerofiers {
    inv_first_row: Vec<FieldElement>,
    inv_steps: Vec<FieldElement>,
    inv_sum_rows: Vec<FieldElement>,
    inv_net_rows: Vec<FieldElement>,
    inv_boundary: Vec<FieldElement>,
    /// `(x^u - net_anchor)(x^u - sum_anchor)`, multiplied back into constraint 2.
    excluded_rows: Vec<FieldElement>,
    /// `x - last_step_point`, multiplied back into constraint 3.
    last_step: Vec<FieldElement>,
}

impl Zerofiers {
    fn new(layout: &SolvencyLayout, xs: &[FieldElement]) -> Self {
        let precision = xs.len();
        let u = layout.user_num;
        let steps = layout.steps();
        let x_u = |i: usize| xs[(i * u) % precision];
        let x_steps = |i: usize| xs[(i * steps) % precision];

        let first_row: Vec<FieldElement> =
            (0..precision).map(|i| x_u(i) - FieldElement::ONE).collect();
        let steps_vanishing: Vec<FieldElement> =
            (0..precision).map(|i| x_steps(i) - FieldElement::ONE).collect();
        let sum_rows: Vec<FieldElement> =
            (0..precision).map(|i| x_u(i) - layout.sum_row_anchor).collect();
        let net_rows: Vec<FieldElement> =
            (0..precision).map(|i| x_u(i) - layout.net_row_anchor).collect();
        let boundary: Vec<FieldElement> = xs
            .iter()
            .map(|x| (*x - layout.first_sum_point) * (*x - layout.last_step_point))
            .collect();
        let excluded_rows = net_rows.iter().zip(&sum_rows).map(|(a, b)| *a * *b).collect();
        let last_step = xs.iter().map(|x| *x - layout.last_step_point).collect();

        Self {
            inv_first_row: batch_inverse(&first_row),
            inv_steps: batch_inverse(&steps_vanishing),
            inv_sum_rows: batch_inverse(&sum_rows),
            inv_net_rows: batch_inverse(&net_rows),
            inv_boundary: batch_inverse(&boundary),
            excluded_rows,
            last_step,
        }
    }
}

/// `prod_{d=0..4} (next - 4 current - d)`: zero exactly when `next` extends
/// `current` by one base-4 digit.
pub fn base4_digits(next: FieldElement, current: FieldElement) -> FieldElement {
    let delta = next - FieldElement::new(4) * current;
    (0..4u64)
        .map(|digit| delta - FieldElement::new(digit))
        .product()
}

impl ConstraintSet {
    /// Evaluates every constraint on the extended trace.
    ///
    /// `coin_sums` holds one sum per coin; only the first `main_coins` get
    /// constraints of their own.
    #[instrument(skip_all, name = "air::ConstraintSet::evaluate", fields(main_coins = main_coins))]
    pub fn evaluate(
        layout: &SolvencyLayout,
        trace: &ExtendedTrace,
        coin_sums: &[FieldElement],
        total: FieldElement,
        main_coins: usize,
    ) -> Self {
        let precision = layout.precision();
        let xs = layout.domain.points();
        let z = Zerofiers::new(layout, &xs);
        let t = &trace.main;
        let ef = layout.skips();
        let row = |i: usize, offset: usize| (i + offset) % precision;
        let next_block = layout.uts * ef;
        let block_offset = (layout.uts - 1) * ef;

        let boundary = layout.boundary_interpolant(total);
        let c1 = map_indices(precision, |i| t[i] * z.inv_first_row[i]);
        let c2 = map_indices(precision, |i| {
            base4_digits(t[row(i, ef)], t[i]) * z.inv_steps[i] * z.excluded_rows[i]
        });
        let c3 = map_indices(precision, |i| {
            (t[row(i, next_block)] - t[row(i, block_offset)] - t[i])
                * z.inv_sum_rows[i]
                * z.last_step[i]
        });
        let c4 = map_indices(precision, |i| {
            (t[i] - boundary.evaluate(xs[i])) * z.inv_boundary[i]
        });
        let c5 = map_indices(precision, |i| {
            let coins: FieldElement = trace.coins.iter().map(|column| column[i]).sum();
            (t[i] - coins) * z.inv_net_rows[i]
        });

        let coins = trace
            .coins
            .iter()
            .zip(coin_sums)
            .take(main_coins)
            .map(|(b, sum)| {
                let interpolant = layout.boundary_interpolant(*sum);
                let accumulation = map_indices(precision, |i| {
                    (b[row(i, next_block)] - b[row(i, block_offset)] - b[i])
                        * z.inv_sum_rows[i]
                        * z.last_step[i]
                });
                let boundary = map_indices(precision, |i| {
                    (b[i] - interpolant.evaluate(xs[i])) * z.inv_boundary[i]
                });
                [accumulation, boundary]
            })
            .collect();

        debug!(precision, "constraints evaluated");
        Self {
            trace: [c1, c2, c3, c4, c5],
            coins,
        }
    }

    /// Main-column constraint values at `position`.
    pub fn trace_at(&self, position: usize) -> [FieldElement; TRACE_CONSTRAINTS] {
        core::array::from_fn(|k| self.trace[k][position])
    }

    /// Coin constraint values at `position`, two per main coin.
    pub fn coins_at(&self, position: usize) -> Vec<FieldElement> {
        self.coins
            .iter()
            .flat_map(|[accumulation, boundary]| [accumulation[position], boundary[position]])
            .collect()
    }

    /// Digest of every constraint value at `position`; blinds trace leaves.
    pub fn salt_at(&self, position: usize) -> Digest {
        constraint_salt(&self.trace_at(position), &self.coins_at(position))
    }
}

/// `keccak(enc(c_1..c_5) || enc(cc..))`.
pub fn constraint_salt(trace: &[FieldElement], coins: &[FieldElement]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update_elements(trace).update_elements(coins);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::inputs::BatchInputs;
    use crate::air::trace::SolvencyTrace;
    use crate::params::PorParams;

    fn fixture(balances: &[Vec<i64>]) -> (SolvencyLayout, SolvencyTrace, ConstraintSet) {
        let ids: Vec<FieldElement> = (1..=balances[0].len() as u64)
            .map(FieldElement::new)
            .collect();
        let batch = BatchInputs::normalise(&PorParams::default(), &ids, balances, 4, balances.len())
            .expect("batch");
        let trace = SolvencyTrace::build(&batch).expect("trace");
        let layout = SolvencyLayout::new(FieldElement::GENERATOR, 4, trace.user_num, 8);
        let extended = trace.extend(&layout.domain);
        let set = ConstraintSet::evaluate(
            &layout,
            &extended,
            &trace.coin_sums,
            FieldElement::from_u128(trace.total),
            balances.len(),
        );
        (layout, trace, set)
    }

    fn degree_off_sampled_positions(values: &[FieldElement], layout: &SolvencyLayout) -> usize {
        // Interpolate through positions that are not multiples of ef only.
        let ef = layout.skips();
        let xs: Vec<FieldElement> = (0..values.len())
            .filter(|i| i % ef != 0)
            .map(|i| layout.domain.point(i))
            .collect();
        let ys: Vec<FieldElement> = (0..values.len())
            .filter(|i| i % ef != 0)
            .map(|i| values[i])
            .collect();
        crate::field::lagrange_interp(&xs, &ys).degree().unwrap_or(0)
    }

    #[test]
    fn honest_constraints_are_low_degree() {
        let (layout, _, set) = fixture(&[vec![3, 9, 1], vec![0, 2, 5]]);
        let steps = layout.steps();
        assert!(degree_off_sampled_positions(&set.trace[0], &layout) < steps);
        assert!(degree_off_sampled_positions(&set.trace[2], &layout) < steps);
        assert!(degree_off_sampled_positions(&set.trace[3], &layout) < steps);
        assert!(degree_off_sampled_positions(&set.trace[4], &layout) < steps);
        assert!(degree_off_sampled_positions(&set.trace[1], &layout) < 4 * steps);
        for [accumulation, boundary] in &set.coins {
            assert!(degree_off_sampled_positions(accumulation, &layout) < steps);
            assert!(degree_off_sampled_positions(boundary, &layout) < steps);
        }
    }

    #[test]
    fn wrong_total_breaks_the_boundary_constraint() {
        let (layout, trace, _) = fixture(&[vec![3, 9, 1]]);
        let extended = trace.extend(&layout.domain);
        let set = ConstraintSet::evaluate(
            &layout,
            &extended,
            &trace.coin_sums,
            FieldElement::from_u128(trace.total + 1),
            1,
        );
        assert!(degree_off_sampled_positions(&set.trace[3], &layout) >= layout.steps());
    }

    #[test]
    fn pointwise_zerofiers_match_the_batched_ones() {
        let (layout, trace, set) = fixture(&[vec![4, 4, 4]]);
        let extended = trace.extend(&layout.domain);
        let position = 13;
        let x = layout.domain.point(position);
        let z = layout.zerofiers_at(x).expect("off the trace domain");
        assert_eq!(set.trace[0][position] * z.z1, extended.main[position]);
        let precision = layout.precision();
        let next = extended.main[(position + 8) % precision];
        let digits = base4_digits(next, extended.main[position]);
        assert_eq!(set.trace[1][position] * z.z2, digits);
    }

    #[test]
    fn salt_covers_every_constraint() {
        let (_, _, set) = fixture(&[vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(set.coins_at(3).len(), 4);
        assert_ne!(set.salt_at(3), set.salt_at(5));
    }
}
