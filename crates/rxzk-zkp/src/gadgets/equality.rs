//! Equality: `(a - b) · 1 = 0`.

use rxzk_core::FieldElement;

use super::Num;
use crate::r1cs::{ConstraintSystem, LinearCombination};

/// Constrain `a = b`.
pub fn assert_equal(cs: &mut ConstraintSystem, label: &str, a: &Num, b: &Num) {
    cs.enforce(
        label,
        a.sub(b).lc(),
        LinearCombination::constant(FieldElement::one()),
        LinearCombination::zero(),
    );
}
