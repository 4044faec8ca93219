//! Random linear combination of every committed column.
//!
//! Components are combined in the fixed order
//! `[t, b_0.., id, c_1, c_3, c_4, c_5, cc..]`, each weighted by
//! `k_{2j} + k_{2j+1} * x^(3 steps)`.  The shift lifts degree `< steps`
//! components to the same `< 4 steps` bound as constraint 2, which is added
//! without a coefficient.

use tracing::instrument;

use crate::field::FieldElement;
use crate::hash::Digest;
use crate::utils::{derive_coefficients, map_indices};

use super::constraints::ConstraintSet;
use super::context::SolvencyLayout;
use super::trace::ExtendedTrace;

/// Number of weighted components for `coins` coins of which `main_coins`
/// carry coin constraints.
pub fn component_count(coins: usize, main_coins: usize) -> usize {
    // t, id, and four trace constraints
    6 + coins + 2 * main_coins
}

/// Coefficient pairs `(k_{2j}, k_{2j+1})`, one per component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationCoefficients {
    pairs: Vec<(FieldElement, FieldElement)>,
}

impl CombinationCoefficients {
    /// Derives `k_i = keccak(nonce || enc(i)) mod p`.
    pub fn derive(nonce: &Digest, components: usize) -> Self {
        let k = derive_coefficients(nonce.as_bytes(), 2 * components);
        let pairs = k.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Combines one point's component values; `shift` is `x^(3 steps)` and
    /// `unweighted` is constraint 2.
    ///
    /// # Panics
    ///
    /// Panics when the number of components differs from the derived count.
    pub fn combine<I>(
        &self,
        shift: FieldElement,
        components: I,
        unweighted: FieldElement,
    ) -> FieldElement
    where
        I: IntoIterator<Item = FieldElement>,
    {
        let mut used = 0;
        let mut acc = unweighted;
        for (value, (k0, k1)) in components.into_iter().zip(&self.pairs) {
            acc += (*k0 + *k1 * shift) * value;
            used += 1;
        }
        assert_eq!(used, self.pairs.len(), "component count mismatch");
        acc
    }
}

/// Component values at one point, in combination order.
pub fn point_components<'a>(
    t: FieldElement,
    coins: &'a [FieldElement],
    id: FieldElement,
    trace_constraints: &[FieldElement; 5],
    coin_constraints: &'a [FieldElement],
) -> impl Iterator<Item = FieldElement> + 'a {
    let [c1, _, c3, c4, c5] = *trace_constraints;
    core::iter::once(t)
        .chain(coins.iter().copied())
        .chain(core::iter::once(id))
        .chain([c1, c3, c4, c5])
        .chain(coin_constraints.iter().copied())
}

/// Evaluates the combination over the whole extended domain.
#[instrument(skip_all, name = "air::linear_combination")]
pub fn linear_combination(
    layout: &SolvencyLayout,
    coefficients: &CombinationCoefficients,
    trace: &ExtendedTrace,
    constraints: &ConstraintSet,
) -> Vec<FieldElement> {
    let shift_root = layout.domain.extended_root.pow(3 * layout.steps() as u64);
    let shifts = crate::fft::powers(shift_root, layout.precision());
    map_indices(layout.precision(), |i| {
        let coins = trace.coins_at(i);
        let trace_constraints = constraints.trace_at(i);
        let coin_constraints = constraints.coins_at(i);
        let components = point_components(
            trace.main[i],
            &coins,
            trace.ids[i],
            &trace_constraints,
            &coin_constraints,
        );
        coefficients.combine(shifts[i], components, trace_constraints[1])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash;

    #[test]
    fn coefficient_pairs_follow_the_nonce() {
        let nonce = hash(b"nonce");
        let a = CombinationCoefficients::derive(&nonce, 3);
        let b = CombinationCoefficients::derive(&hash(b"other"), 3);
        assert_eq!(a.len(), 3);
        assert_ne!(a, b);
        assert_eq!(a, CombinationCoefficients::derive(&nonce, 3));
    }

    #[test]
    fn combine_weights_each_component() {
        let nonce = hash(b"weights");
        let coefficients = CombinationCoefficients::derive(&nonce, 2);
        let k = derive_coefficients(nonce.as_bytes(), 4);
        let shift = FieldElement::new(10);
        let (a, b, extra) = (FieldElement::new(3), FieldElement::new(5), FieldElement::new(7));
        let expected = extra + (k[0] + k[1] * shift) * a + (k[2] + k[3] * shift) * b;
        assert_eq!(coefficients.combine(shift, [a, b], extra), expected);
    }

    #[test]
    #[should_panic(expected = "component count mismatch")]
    fn combine_rejects_short_input() {
        let coefficients = CombinationCoefficients::derive(&hash(b"short"), 3);
        coefficients.combine(FieldElement::ONE, [FieldElement::ONE], FieldElement::ZERO);
    }

    #[test]
    fn component_order_skips_constraint_two() {
        let c: [FieldElement; 5] = core::array::from_fn(|i| FieldElement::new(10 + i as u64));
        let values: Vec<FieldElement> = point_components(
            FieldElement::new(1),
            &[FieldElement::new(2), FieldElement::new(3)],
            FieldElement::new(4),
            &c,
            &[FieldElement::new(20), FieldElement::new(21)],
        )
        .collect();
        let expected: Vec<FieldElement> = [1, 2, 3, 4, 10, 12, 13, 14, 20, 21]
            .into_iter()
            .map(FieldElement::new)
            .collect();
        assert_eq!(values, expected);
        assert_eq!(component_count(2, 1), values.len());
    }
}
