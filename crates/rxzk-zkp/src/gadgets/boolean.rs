//! Booleanity: `b · (b - 1) = 0`.

use rxzk_core::FieldElement;

use super::{alloc_hint, Num};
use crate::r1cs::{ConstraintSystem, LinearCombination, SynthesisError};

/// Constrain `b` to `{0, 1}`.
pub fn enforce_boolean(cs: &mut ConstraintSystem, label: &str, b: &Num) {
    cs.enforce(
        label,
        b.lc(),
        b.lc() - LinearCombination::constant(FieldElement::one()),
        LinearCombination::zero(),
    );
}

/// Allocate a private bit and constrain it.
pub fn alloc_bit(
    cs: &mut ConstraintSystem,
    name: &str,
    value: Option<bool>,
) -> Result<Num, SynthesisError> {
    let bit = alloc_hint(cs, name, value.map(FieldElement::from))?;
    enforce_boolean(cs, name, &bit);
    Ok(bit)
}
