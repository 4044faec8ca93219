//! Field arithmetic primitives for the solvency prover.
//! Contains the Goldilocks field and polynomial utilities.

pub mod polynomial;
pub mod prime_field;

pub use polynomial::{
    add_polys, div_polys, eval_poly_at, eval_quartic, lagrange_interp, lagrange_interp_2,
    lagrange_interp_4, mul_polys, multi_interp_4, sub_polys, zpoly, Polynomial, Quartic,
};
pub use prime_field::{batch_inverse, FieldDeserializeError, FieldElement, ENCODED_SIZE, MODULUS};
