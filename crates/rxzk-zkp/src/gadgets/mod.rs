//! # Constraint Gadgets
//!
//! Reusable constraint patterns. Every gadget takes a [`ConstraintSystem`]
//! plus [`Num`] operands and emits a fixed set of constraints regardless of
//! the operand values, so setup and witness synthesis agree on the shape.
//!
//! Auxiliary signals (bits, inverses, products) are allocated as private
//! hints. A hint's value is computed natively; its correctness is carried
//! entirely by the constraints that mention it.

pub mod boolean;
pub mod commitment;
pub mod comparator;
pub mod equality;
pub mod is_zero;

use rxzk_core::FieldElement;

use crate::r1cs::{ConstraintSystem, LinearCombination, SynthesisError, Variable};

/// A linear combination together with its value, when known.
///
/// Linear operations on `Num` are free: they build a new combination
/// without allocating signals or constraints.
#[derive(Debug, Clone)]
pub struct Num {
    lc: LinearCombination,
    value: Option<FieldElement>,
}

impl Num {
    /// Wrap an allocated variable.
    pub fn from_variable(var: Variable, value: Option<FieldElement>) -> Self {
        Self {
            lc: var.into(),
            value,
        }
    }

    /// A constant.
    pub fn constant(value: FieldElement) -> Self {
        Self {
            lc: LinearCombination::constant(value),
            value: Some(value),
        }
    }

    /// The linear combination.
    pub fn lc(&self) -> LinearCombination {
        self.lc.clone()
    }

    /// The value, if known.
    pub fn value(&self) -> Option<FieldElement> {
        self.value
    }

    /// `self + other`.
    pub fn add(&self, other: &Num) -> Num {
        Num {
            lc: self.lc.clone() + other.lc.clone(),
            value: self.value.zip(other.value).map(|(a, b)| a + b),
        }
    }

    /// `self - other`.
    pub fn sub(&self, other: &Num) -> Num {
        Num {
            lc: self.lc.clone() - other.lc.clone(),
            value: self.value.zip(other.value).map(|(a, b)| a - b),
        }
    }

    /// `self * factor` for a constant factor.
    pub fn scale(&self, factor: FieldElement) -> Num {
        Num {
            lc: self.lc.scale(factor),
            value: self.value.map(|v| v * factor),
        }
    }
}

/// Allocate a private hint whose witness value is `value`.
pub(crate) fn alloc_hint(
    cs: &mut ConstraintSystem,
    name: &str,
    value: Option<FieldElement>,
) -> Result<Num, SynthesisError> {
    let var = cs.alloc_private(name, || {
        value.ok_or_else(|| SynthesisError::AssignmentMissing(name.to_string()))
    })?;
    Ok(Num::from_variable(var, value))
}

/// Allocate `out = a · b` with one constraint.
pub fn mul(cs: &mut ConstraintSystem, name: &str, a: &Num, b: &Num) -> Result<Num, SynthesisError> {
    let value = a.value().zip(b.value()).map(|(x, y)| x * y);
    let out = alloc_hint(cs, name, value)?;
    cs.enforce(name, a.lc(), b.lc(), out.lc());
    Ok(out)
}
