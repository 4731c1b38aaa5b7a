//! # Field Elements
//!
//! [`FieldElement`] is the unit of computation in the constraint system: an
//! element of the BN254 scalar field (the field snarkjs/circom call `bn128`).
//!
//! ## Encoding
//!
//! The textual form is the canonical decimal representation of the integer
//! in `[0, p)`. Parsing rejects values `>= p` instead of reducing them, so a
//! witness file cannot smuggle `p + 1` in place of `1`.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger256, Field, One, PrimeField, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self(Fr::one())
    }

    /// Embed an unsigned integer.
    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// `2^exponent` as a field element.
    pub fn pow2(exponent: u32) -> Self {
        Self(Fr::from(2u64).pow([u64::from(exponent)]))
    }

    /// Interpret little-endian bytes as an integer and reduce modulo `p`.
    ///
    /// Used for deriving constants from hash output, never for parsing input.
    pub fn from_le_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_le_bytes_mod_order(bytes))
    }

    /// Parse a canonical decimal literal.
    ///
    /// # Errors
    ///
    /// [`FieldError::Empty`] for an empty string, [`FieldError::NonDecimal`]
    /// for anything other than ASCII digits, [`FieldError::OutOfRange`] when
    /// the integer is not less than the field modulus.
    pub fn parse_decimal(literal: &str) -> Result<Self, FieldError> {
        if literal.is_empty() {
            return Err(FieldError::Empty);
        }
        if !literal.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::NonDecimal(literal.to_string()));
        }
        // Only the 256-bit and modulus bounds can fail past the digit check.
        let out_of_range = || FieldError::OutOfRange(literal.to_string());
        let integer = BigInteger256::from_str(literal).map_err(|()| out_of_range())?;
        Fr::from_bigint(integer).map(Self).ok_or_else(out_of_range)
    }

    /// Canonical decimal representation.
    pub fn to_decimal(&self) -> String {
        self.0.into_bigint().to_string()
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        let limbs = self.limbs();
        if limbs[1..].iter().all(|l| *l == 0) {
            Some(limbs[0])
        } else {
            None
        }
    }

    /// The lowest `count` bits of the canonical integer, least significant first.
    pub fn bits_le(&self, count: usize) -> Vec<bool> {
        let limbs = self.limbs();
        (0..count)
            .map(|i| {
                limbs
                    .get(i / 64)
                    .map_or(false, |limb| (limb >> (i % 64)) & 1 == 1)
            })
            .collect()
    }

    /// Number of significant bits of the canonical integer.
    pub fn num_bits(&self) -> u32 {
        let limbs = self.limbs();
        for (i, limb) in limbs.iter().enumerate().rev() {
            if *limb != 0 {
                return 64 * i as u32 + (64 - limb.leading_zeros());
            }
        }
        0
    }

    /// Multiplicative inverse, or `None` for zero.
    pub fn inverse(&self) -> Option<Self> {
        self.0.inverse().map(Self)
    }

    /// Whether this is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Raise to a small exponent.
    pub fn pow(&self, exponent: u64) -> Self {
        Self(self.0.pow([exponent]))
    }

    /// The underlying arkworks field element.
    pub fn into_inner(self) -> Fr {
        self.0
    }

    fn limbs(&self) -> [u64; 4] {
        self.0.into_bigint().0
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<bool> for FieldElement {
    fn from(value: bool) -> Self {
        if value {
            Self::one()
        } else {
            Self::zero()
        }
    }
}

impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl Add for FieldElement {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FieldElement {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for FieldElement {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for FieldElement {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_decimal(&s).map_err(serde::de::Error::custom)
    }
}
