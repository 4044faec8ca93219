//! Goldilocks prime field used by every layer of the solvency prover.
//!
//! Elements are stored as canonical `u64` representatives in `[0, MODULUS)`.
//! Products are reduced through a `u128` intermediate, which keeps the
//! implementation short and obviously correct at the cost of a division per
//! multiplication.
//!
//! # Encoding
//!
//! Commitments and Fiat–Shamir derivations hash field elements as 32-byte
//! **big-endian** words: 24 zero bytes followed by the 8-byte value.  Decoding
//! rejects any word with non-zero high bytes or a value `>= MODULUS`.

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prime modulus `2^64 - 2^32 + 1`.
pub const MODULUS: u64 = 0xffff_ffff_0000_0001;

/// Width of the canonical field encoding in bytes.
pub const ENCODED_SIZE: usize = 32;

/// Errors raised while decoding field elements from their byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldDeserializeError {
    /// Input slice did not contain exactly [`ENCODED_SIZE`] bytes.
    #[error("field element deserialization failed: expected {ENCODED_SIZE} bytes, got {0}")]
    Length(usize),
    /// Encoded integer was not below the modulus.
    #[error("field element deserialization failed: non-canonical input")]
    NonCanonical,
}

/// Field element represented as a canonical value modulo [`MODULUS`].
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub struct FieldElement(u64);

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldElement").field(&self.0).finish()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FieldElement {
    /// Canonical prime modulus associated with this field.
    pub const MODULUS: u64 = MODULUS;
    /// Additive identity.
    pub const ZERO: FieldElement = FieldElement(0);
    /// Multiplicative identity.
    pub const ONE: FieldElement = FieldElement(1);
    /// Generator of the full multiplicative group.
    pub const GENERATOR: FieldElement = FieldElement(7);
    /// Largest `k` such that `2^k` divides `MODULUS - 1`.
    pub const TWO_ADICITY: u32 = 32;

    /// Builds an element from an arbitrary `u64`, reducing it modulo the prime.
    pub const fn new(value: u64) -> Self {
        if value >= MODULUS {
            Self(value - MODULUS)
        } else {
            Self(value)
        }
    }

    /// Builds an element from a signed value; negatives map to `MODULUS - |v|`.
    pub fn from_i64(value: i64) -> Self {
        let magnitude = Self::new(value.unsigned_abs());
        if value < 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Reduces a 128-bit integer into the field.
    pub const fn from_u128(value: u128) -> Self {
        Self((value % MODULUS as u128) as u64)
    }

    /// Reduces a 256-bit big-endian integer (typically a digest) into the field.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        let modulus = MODULUS as u128;
        let acc = bytes
            .iter()
            .fold(0u128, |acc, byte| ((acc << 8) | *byte as u128) % modulus);
        Self(acc as u64)
    }

    /// Returns the canonical integer representative.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Reads the element as signed: values above `MODULUS / 2` are the
    /// negatives `value - MODULUS`.
    pub const fn as_signed(&self) -> i64 {
        if self.0 > MODULUS / 2 {
            -((MODULUS - self.0) as i64)
        } else {
            self.0 as i64
        }
    }

    /// Returns `true` for the additive identity.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Squares the element.
    pub fn square(self) -> Self {
        self * self
    }

    /// Raises the element to `exponent` by square-and-multiply.
    pub fn pow(self, mut exponent: u64) -> Self {
        let mut base = self;
        let mut acc = Self::ONE;
        while exponent > 0 {
            if exponent & 1 == 1 {
                acc *= base;
            }
            base = base.square();
            exponent >>= 1;
        }
        acc
    }

    /// Computes the multiplicative inverse via Fermat, `None` for zero.
    pub fn inv(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.pow(MODULUS - 2))
        }
    }

    /// Returns a primitive `order`-th root of unity derived from `nonresidue`.
    ///
    /// # Panics
    ///
    /// Panics unless `order` is a power of two of at most `2^TWO_ADICITY`.
    pub fn root_of_unity(nonresidue: FieldElement, order: u64) -> Self {
        assert!(
            order.is_power_of_two() && order.trailing_zeros() <= Self::TWO_ADICITY,
            "root of unity order must be a power of two dividing MODULUS - 1"
        );
        nonresidue.pow((MODULUS - 1) / order)
    }

    /// Encodes the element as a 32-byte big-endian word.
    pub fn to_bytes(&self) -> [u8; ENCODED_SIZE] {
        let mut out = [0u8; ENCODED_SIZE];
        out[ENCODED_SIZE - 8..].copy_from_slice(&self.0.to_be_bytes());
        out
    }

    /// Decodes a 32-byte big-endian word, rejecting non-canonical input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FieldDeserializeError> {
        if bytes.len() != ENCODED_SIZE {
            return Err(FieldDeserializeError::Length(bytes.len()));
        }
        if bytes[..ENCODED_SIZE - 8].iter().any(|byte| *byte != 0) {
            return Err(FieldDeserializeError::NonCanonical);
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[ENCODED_SIZE - 8..]);
        let value = u64::from_be_bytes(word);
        if value >= MODULUS {
            return Err(FieldDeserializeError::NonCanonical);
        }
        Ok(Self(value))
    }
}

impl From<u32> for FieldElement {
    fn from(value: u32) -> Self {
        Self(value as u64)
    }
}

impl TryFrom<u64> for FieldElement {
    type Error = FieldDeserializeError;

    /// Accepts only canonical representatives.
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value < MODULUS {
            Ok(Self(value))
        } else {
            Err(FieldDeserializeError::NonCanonical)
        }
    }
}

impl From<FieldElement> for u64 {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (sum, overflow) = self.0.overflowing_add(rhs.0);
        if overflow || sum >= MODULUS {
            // 2^64 = 2^32 - 1 (mod p), so a wrapped sum only needs the correction.
            Self(sum.wrapping_sub(MODULUS))
        } else {
            Self(sum)
        }
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        if self.0 >= rhs.0 {
            Self(self.0 - rhs.0)
        } else {
            Self(MODULUS - (rhs.0 - self.0))
        }
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        if self.0 == 0 {
            self
        } else {
            Self(MODULUS - self.0)
        }
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as u128 * rhs.0 as u128) % MODULUS as u128) as u64)
    }
}

impl Div for FieldElement {
    type Output = Self;

    /// # Panics
    ///
    /// Division by zero is an internal invariant violation and panics.
    fn div(self, rhs: Self) -> Self {
        self * rhs.inv().expect("division by zero field element")
    }
}

impl AddAssign for FieldElement {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FieldElement {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for FieldElement {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl core::iter::Sum for FieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, value| acc + value)
    }
}

impl core::iter::Product for FieldElement {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, value| acc * value)
    }
}

/// Inverts every element with one field inversion (Montgomery's trick).
///
/// Zero entries produce zero outputs instead of failing: the zerofiers used by
/// the constraint system vanish on the trace domain and those positions are
/// never sampled.
pub fn batch_inverse(values: &[FieldElement]) -> Vec<FieldElement> {
    let mut partials = Vec::with_capacity(values.len() + 1);
    partials.push(FieldElement::ONE);
    for value in values {
        let last = partials[partials.len() - 1];
        partials.push(if value.is_zero() { last } else { last * *value });
    }

    let mut inverse = partials[values.len()]
        .inv()
        .expect("product of non-zero field elements is non-zero");
    let mut outputs = vec![FieldElement::ZERO; values.len()];
    for i in (0..values.len()).rev() {
        if !values[i].is_zero() {
            outputs[i] = partials[i] * inverse;
            inverse *= values[i];
        }
    }
    outputs
}
