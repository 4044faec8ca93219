//! Domain layout shared by the prover and the verifier.
//!
//! With `u = user_num` users of `uts` rows each, trace row `r` of user block
//! `b` sits at trace index `b * uts + r` and at extended position
//! `(b * uts + r) * extension_factor`.  Every zerofier used by the constraint
//! set is a polynomial in `x^u` or `x^steps`, so both sides evaluate them
//! from a handful of fixed powers of `G2`.

use crate::fft::EvaluationDomain;
use crate::field::{lagrange_interp_2, FieldElement, Polynomial};

/// Fixed geometry of one solvency batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvencyLayout {
    pub domain: EvaluationDomain,
    pub uts: usize,
    pub user_num: usize,
    /// `G2^((uts-2) * ef * u)`: value of `x^u` on net-value rows.
    pub net_row_anchor: FieldElement,
    /// `G2^((uts-1) * ef * u)`: value of `x^u` on running-sum rows.
    pub sum_row_anchor: FieldElement,
    /// Running-sum row of the leading zero user, `G2^((uts-1) * ef)`.
    pub first_sum_point: FieldElement,
    /// Last trace row, `G2^((steps-1) * ef)`.
    pub last_step_point: FieldElement,
}

impl SolvencyLayout {
    /// Builds the layout for `steps = uts * user_num` trace rows.
    pub fn new(
        nonresidue: FieldElement,
        uts: usize,
        user_num: usize,
        extension_factor: usize,
    ) -> Self {
        let steps = uts * user_num;
        let domain = EvaluationDomain::new(nonresidue, steps, extension_factor);
        let ef = extension_factor as u64;
        let g2 = domain.extended_root;
        Self {
            domain,
            uts,
            user_num,
            net_row_anchor: g2.pow((uts as u64 - 2) * ef * user_num as u64),
            sum_row_anchor: g2.pow((uts as u64 - 1) * ef * user_num as u64),
            first_sum_point: g2.pow((uts as u64 - 1) * ef),
            last_step_point: g2.pow((steps as u64 - 1) * ef),
        }
    }

    pub fn steps(&self) -> usize {
        self.domain.steps
    }

    pub fn precision(&self) -> usize {
        self.domain.precision()
    }

    /// Extended-domain distance between consecutive trace rows.
    pub fn skips(&self) -> usize {
        self.domain.extension_factor
    }

    /// Extended position of the net-value row of real user `user`.
    pub fn user_entry_position(&self, user: usize) -> usize {
        (self.uts * (user + 1) + self.uts - 2) * self.skips()
    }

    /// The four trace openings needed at spot-check position `x`:
    /// `x`, the next row, and rows `uts - 1` and `uts` further on.
    pub fn augmented_positions(&self, position: usize) -> [usize; 4] {
        let precision = self.precision();
        let skips = self.skips();
        [
            position,
            (position + skips) % precision,
            (position + (self.uts - 1) * skips) % precision,
            (position + self.uts * skips) % precision,
        ]
    }

    /// Line through `(first_sum_point, 0)` and `(last_step_point, total)`.
    pub fn boundary_interpolant(&self, total: FieldElement) -> Polynomial {
        lagrange_interp_2(
            [self.first_sum_point, self.last_step_point],
            [FieldElement::ZERO, total],
        )
    }

    /// Zerofier values at a single point off the trace domain.
    pub fn zerofiers_at(&self, x: FieldElement) -> Option<PointZerofiers> {
        let x_u = x.pow(self.user_num as u64);
        let x_steps = x.pow(self.steps() as u64);

        let z1 = x_u - FieldElement::ONE;
        let z2_den = (x_u - self.net_row_anchor) * (x_u - self.sum_row_anchor);
        let z2 = (x_steps - FieldElement::ONE) * z2_den.inv()?;
        let z3 = (x_u - self.sum_row_anchor) * (x - self.last_step_point).inv()?;
        let z4 = (x - self.first_sum_point) * (x - self.last_step_point);
        let z5 = x_u - self.net_row_anchor;
        Some(PointZerofiers { z1, z2, z3, z4, z5 })
    }
}

/// Zerofiers of the five trace constraints at one point; coin constraints
/// reuse `z3` and `z4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointZerofiers {
    pub z1: FieldElement,
    pub z2: FieldElement,
    pub z3: FieldElement,
    pub z4: FieldElement,
    pub z5: FieldElement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_match_trace_rows() {
        let layout = SolvencyLayout::new(FieldElement::GENERATOR, 4, 8, 8);
        let g2 = layout.domain.extended_root;
        let net_row = g2.pow(layout.user_entry_position(0) as u64);
        assert_eq!(net_row.pow(8), layout.net_row_anchor);
        assert_eq!(layout.last_step_point, g2.pow((32 - 1) * 8));
        assert_eq!(layout.augmented_positions(255), [255, 7, 23, 31]);
    }

    #[test]
    fn boundary_interpolant_hits_both_rows() {
        let layout = SolvencyLayout::new(FieldElement::GENERATOR, 4, 4, 8);
        let total = FieldElement::new(99);
        let line = layout.boundary_interpolant(total);
        assert_eq!(line.evaluate(layout.first_sum_point), FieldElement::ZERO);
        assert_eq!(line.evaluate(layout.last_step_point), total);
    }
}
