//! Zero test.
//!
//! With a private hint `inv`:
//!
//! ```text
//! d · inv    = 1 - isZero
//! d · isZero = 0
//! ```
//!
//! If `d ≠ 0` the second constraint forces `isZero = 0`, and the first then
//! forces `inv = 1/d`. If `d = 0` the first constraint forces `isZero = 1`
//! whatever `inv` is. No choice of hint yields the wrong answer.

use rxzk_core::FieldElement;

use super::{alloc_hint, Num};
use crate::r1cs::{ConstraintSystem, LinearCombination, SynthesisError};

/// Boolean `d == 0`, using the honest inverse hint.
pub fn is_zero(cs: &mut ConstraintSystem, d: &Num) -> Result<Num, SynthesisError> {
    let hint = d.value().map(|v| v.inverse().unwrap_or_else(FieldElement::zero));
    is_zero_with_hint(cs, d, hint)
}

/// [`is_zero`] with a caller-chosen inverse hint.
///
/// The output value is derived from the hint as `1 - d · inv`; the
/// constraints reject every hint except the honest one when `d ≠ 0`.
pub fn is_zero_with_hint(
    cs: &mut ConstraintSystem,
    d: &Num,
    inv_hint: Option<FieldElement>,
) -> Result<Num, SynthesisError> {
    let inv = alloc_hint(cs, "inv", inv_hint)?;
    let out_value = d
        .value()
        .zip(inv_hint)
        .map(|(d, inv)| FieldElement::one() - d * inv);
    let out = alloc_hint(cs, "is_zero", out_value)?;

    cs.enforce(
        "inverse",
        d.lc(),
        inv.lc(),
        LinearCombination::constant(FieldElement::one()) - out.lc(),
    );
    cs.enforce("zero_product", d.lc(), out.lc(), LinearCombination::zero());
    Ok(out)
}
