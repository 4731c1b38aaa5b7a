//! # Range Checks and Comparison
//!
//! `less_than(a, b, n)` decomposes `a + 2^n - b` into `n + 1` bits. For
//! `a, b ∈ [0, 2^n)` that difference lies in `[1, 2^(n+1))` and its top bit
//! is set exactly when `a ≥ b`, so `a < b ⇔ bit_n = 0`.
//!
//! The identity only holds for in-range operands, so the comparator range
//! checks both operands itself. An operand `≥ 2^n` leaves the range
//! recomposition unsatisfiable rather than producing a wrong answer.

use rxzk_core::FieldElement;

use super::boolean::alloc_bit;
use super::equality::assert_equal;
use super::Num;
use crate::r1cs::{ConstraintSystem, SynthesisError};

/// Constrain `x ∈ [0, 2^bits)` and return its bits, least significant first.
///
/// Emits `bits + 1` constraints: one booleanity constraint per bit plus the
/// recomposition `Σ bit_i · 2^i = x`.
pub fn range_check(
    cs: &mut ConstraintSystem,
    x: &Num,
    bits: u32,
) -> Result<Vec<Num>, SynthesisError> {
    debug_assert!(bits < 253, "range must fit below the field modulus");
    let values = x.value().map(|v| v.bits_le(bits as usize));
    let mut out = Vec::with_capacity(bits as usize);
    let mut recomposed = Num::constant(FieldElement::zero());
    for i in 0..bits {
        let bit_value = values.as_ref().map(|v| v[i as usize]);
        let bit = alloc_bit(cs, &format!("b{i}"), bit_value)?;
        recomposed = recomposed.add(&bit.scale(FieldElement::pow2(i)));
        out.push(bit);
    }
    assert_equal(cs, "recompose", &recomposed, x);
    Ok(out)
}

/// Boolean `a < b` over `bits`-bit unsigned operands.
pub fn less_than(
    cs: &mut ConstraintSystem,
    a: &Num,
    b: &Num,
    bits: u32,
) -> Result<Num, SynthesisError> {
    cs.namespace("lhs_range", |cs| range_check(cs, a, bits))?;
    cs.namespace("rhs_range", |cs| range_check(cs, b, bits))?;
    let shifted = a
        .add(&Num::constant(FieldElement::pow2(bits)))
        .sub(b);
    let diff_bits = cs.namespace("difference", |cs| range_check(cs, &shifted, bits + 1))?;
    let top = &diff_bits[bits as usize];
    Ok(Num::constant(FieldElement::one()).sub(top))
}
