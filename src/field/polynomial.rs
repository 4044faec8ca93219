//! Polynomial utilities operating over the prime field.
//!
//! The general routines ([`Polynomial`], [`lagrange_interp`]) are used for
//! zerofier construction and for the FRI remainder check.  The specialised
//! two-point and four-point interpolators sit on the hot paths: boundary
//! interpolants and the quartic FRI fold.

use core::ops::{Add, Mul, Sub};

use super::prime_field::batch_inverse;
use super::FieldElement as Felt;

/// Coefficients of a polynomial of degree below four, constant term first.
pub type Quartic = [Felt; 4];

/// Dense polynomial represented by coefficients in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polynomial {
    /// Coefficients starting from the constant term.
    pub coefficients: Vec<Felt>,
}

impl Polynomial {
    /// Constructs a polynomial from raw coefficients.
    pub fn new(coefficients: Vec<Felt>) -> Self {
        Self { coefficients }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builds `(x - r_0)(x - r_1)...` for the supplied roots.
    pub fn from_roots(roots: &[Felt]) -> Self {
        let mut coefficients = vec![Felt::ONE];
        for root in roots {
            let mut next = vec![Felt::ZERO; coefficients.len() + 1];
            for (i, coeff) in coefficients.iter().enumerate() {
                next[i + 1] += *coeff;
                next[i] -= *coeff * *root;
            }
            coefficients = next;
        }
        Self { coefficients }
    }

    /// Evaluates the polynomial at the provided point using Horner's method.
    pub fn evaluate(&self, point: Felt) -> Felt {
        self.coefficients
            .iter()
            .rev()
            .fold(Felt::ZERO, |acc, coeff| acc * point + *coeff)
    }

    /// Returns the degree of the polynomial or `None` if the polynomial is zero.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.iter().rposition(|coeff| !coeff.is_zero())
    }

    /// Drops trailing zero coefficients.
    pub fn trimmed(mut self) -> Self {
        let len = self.degree().map_or(0, |degree| degree + 1);
        self.coefficients.truncate(len);
        self
    }

    /// Long division returning `(quotient, remainder)`.
    ///
    /// # Panics
    ///
    /// Panics when `divisor` is the zero polynomial.
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let divisor = divisor.clone().trimmed();
        let divisor_degree = divisor
            .degree()
            .expect("polynomial division by the zero polynomial");
        let lead_inv = divisor.coefficients[divisor_degree]
            .inv()
            .expect("leading coefficient of a trimmed polynomial is non-zero");

        let mut remainder = self.clone().trimmed().coefficients;
        if remainder.len() <= divisor_degree {
            return (Self::zero(), Self::new(remainder));
        }

        let mut quotient = vec![Felt::ZERO; remainder.len() - divisor_degree];
        for shift in (0..quotient.len()).rev() {
            let factor = remainder[shift + divisor_degree] * lead_inv;
            quotient[shift] = factor;
            if factor.is_zero() {
                continue;
            }
            for (i, coeff) in divisor.coefficients.iter().enumerate() {
                remainder[shift + i] -= factor * *coeff;
            }
        }
        remainder.truncate(divisor_degree);
        (Self::new(quotient), Self::new(remainder).trimmed())
    }

    fn coeff(&self, index: usize) -> Felt {
        self.coefficients.get(index).copied().unwrap_or(Felt::ZERO)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, other: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(other.coefficients.len());
        let coefficients = (0..len)
            .map(|i| self.coeff(i) + other.coeff(i))
            .collect();
        Polynomial { coefficients }
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(other.coefficients.len());
        let coefficients = (0..len)
            .map(|i| self.coeff(i) - other.coeff(i))
            .collect();
        Polynomial { coefficients }
    }
}

/// Schoolbook product.
impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, other: &Polynomial) -> Polynomial {
        if self.coefficients.is_empty() || other.coefficients.is_empty() {
            return Polynomial::zero();
        }
        let mut coefficients =
            vec![Felt::ZERO; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += *a * *b;
            }
        }
        Polynomial { coefficients }
    }
}

/// Product of two polynomials.
pub fn mul_polys(a: &Polynomial, b: &Polynomial) -> Polynomial {
    a * b
}

/// Sum of two polynomials.
pub fn add_polys(a: &Polynomial, b: &Polynomial) -> Polynomial {
    a + b
}

/// Difference of two polynomials.
pub fn sub_polys(a: &Polynomial, b: &Polynomial) -> Polynomial {
    a - b
}

/// Vanishing polynomial over `points`.
pub fn zpoly(points: &[Felt]) -> Polynomial {
    Polynomial::from_roots(points)
}

/// Quotient of `a / b`, discarding any remainder.
pub fn div_polys(a: &Polynomial, b: &Polynomial) -> Polynomial {
    a.div_rem(b).0
}

/// Evaluates a polynomial given as raw coefficients.
pub fn eval_poly_at(coefficients: &[Felt], x: Felt) -> Felt {
    coefficients
        .iter()
        .rev()
        .fold(Felt::ZERO, |acc, coeff| acc * x + *coeff)
}

/// General Lagrange interpolation through `(xs[i], ys[i])`.
///
/// # Panics
///
/// Panics when the slices differ in length or `xs` contains duplicates.
pub fn lagrange_interp(xs: &[Felt], ys: &[Felt]) -> Polynomial {
    assert_eq!(xs.len(), ys.len(), "interpolation needs one y per x");
    let root = zpoly(xs);
    let numerators: Vec<Polynomial> = xs
        .iter()
        .map(|x| div_polys(&root, &Polynomial::new(vec![-*x, Felt::ONE])))
        .collect();
    let denominators: Vec<Felt> = numerators
        .iter()
        .zip(xs)
        .map(|(numerator, x)| numerator.evaluate(*x))
        .collect();
    assert!(
        denominators.iter().all(|d| !d.is_zero()),
        "interpolation points must be distinct"
    );
    let inverses = batch_inverse(&denominators);

    let mut coefficients = vec![Felt::ZERO; xs.len()];
    for ((numerator, y), inverse) in numerators.iter().zip(ys).zip(inverses) {
        let scale = *y * inverse;
        for (slot, coeff) in coefficients.iter_mut().zip(&numerator.coefficients) {
            *slot += *coeff * scale;
        }
    }
    Polynomial::new(coefficients)
}

/// Line through two points.
///
/// # Panics
///
/// Panics when `xs[0] == xs[1]`.
pub fn lagrange_interp_2(xs: [Felt; 2], ys: [Felt; 2]) -> Polynomial {
    let slope = (ys[1] - ys[0]) / (xs[1] - xs[0]);
    Polynomial::new(vec![ys[0] - slope * xs[0], slope])
}

struct QuarticBasis {
    eqs: [Quartic; 4],
    evals: [Felt; 4],
}

fn quartic_basis(xs: &[Felt; 4]) -> QuarticBasis {
    let x01 = xs[0] * xs[1];
    let x02 = xs[0] * xs[2];
    let x03 = xs[0] * xs[3];
    let x12 = xs[1] * xs[2];
    let x13 = xs[1] * xs[3];
    let x23 = xs[2] * xs[3];
    let eqs = [
        [-(x12 * xs[3]), x12 + x13 + x23, -(xs[1] + xs[2] + xs[3]), Felt::ONE],
        [-(x02 * xs[3]), x02 + x03 + x23, -(xs[0] + xs[2] + xs[3]), Felt::ONE],
        [-(x01 * xs[3]), x01 + x03 + x13, -(xs[0] + xs[1] + xs[3]), Felt::ONE],
        [-(x01 * xs[2]), x01 + x02 + x12, -(xs[0] + xs[1] + xs[2]), Felt::ONE],
    ];
    let evals = [
        eval_quartic(&eqs[0], xs[0]),
        eval_quartic(&eqs[1], xs[1]),
        eval_quartic(&eqs[2], xs[2]),
        eval_quartic(&eqs[3], xs[3]),
    ];
    QuarticBasis { eqs, evals }
}

fn combine_quartic(basis: &QuarticBasis, ys: &[Felt; 4], inv_all: Felt) -> Quartic {
    let [e0, e1, e2, e3] = basis.evals;
    let e01 = e0 * e1;
    let e23 = e2 * e3;
    let scales = [
        ys[0] * inv_all * e1 * e23,
        ys[1] * inv_all * e0 * e23,
        ys[2] * inv_all * e01 * e3,
        ys[3] * inv_all * e01 * e2,
    ];
    let mut out = [Felt::ZERO; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = (0..4).map(|k| basis.eqs[k][i] * scales[k]).sum();
    }
    out
}

/// Interpolates the degree < 4 polynomial through four points.
///
/// # Panics
///
/// Panics when the x coordinates are not distinct.
pub fn lagrange_interp_4(xs: &[Felt; 4], ys: &[Felt; 4]) -> Quartic {
    let basis = quartic_basis(xs);
    let inv_all = basis
        .evals
        .iter()
        .copied()
        .product::<Felt>()
        .inv()
        .expect("quartic interpolation points must be distinct");
    combine_quartic(&basis, ys, inv_all)
}

/// Batched [`lagrange_interp_4`] sharing a single field inversion.
///
/// # Panics
///
/// Panics when the inputs differ in length or a row repeats an x coordinate.
pub fn multi_interp_4(xsets: &[[Felt; 4]], ysets: &[[Felt; 4]]) -> Vec<Quartic> {
    assert_eq!(xsets.len(), ysets.len(), "one y row per x row");
    let bases: Vec<QuarticBasis> = xsets.iter().map(quartic_basis).collect();
    let products: Vec<Felt> = bases
        .iter()
        .map(|basis| basis.evals.iter().copied().product())
        .collect();
    assert!(
        products.iter().all(|p| !p.is_zero()),
        "quartic interpolation points must be distinct"
    );
    let inverses = batch_inverse(&products);
    bases
        .iter()
        .zip(ysets)
        .zip(inverses)
        .map(|((basis, ys), inv_all)| combine_quartic(basis, ys, inv_all))
        .collect()
}

/// Evaluates a [`Quartic`] at `x`.
pub fn eval_quartic(p: &Quartic, x: Felt) -> Felt {
    let x2 = x * x;
    p[0] + p[1] * x + p[2] * x2 + p[3] * x2 * x
}
