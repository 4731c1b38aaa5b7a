//! # Witness Builder
//!
//! Turns a circuit carrying an assignment into an immutable [`Witness`], or
//! reports that no satisfying assignment exists.
//!
//! A [`WitnessError::ConstraintViolation`] is an expected outcome, not a
//! defect: it is how the constraint system says "this statement is false".
//! It is deterministic and not retryable without changing the inputs.

use thiserror::Error;

use rxzk_core::{ContentDigest, FieldElement, PublicInputVector};

use crate::r1cs::{Circuit, ConstraintSystem, SynthesisError, SynthesisMode};

/// Error returned by [`build_witness`].
#[derive(Error, Debug)]
pub enum WitnessError {
    /// No satisfying assignment exists for the supplied inputs.
    #[error("constraint {index} ({label}) is not satisfied")]
    ConstraintViolation {
        /// Position of the first unsatisfied constraint.
        index: usize,
        /// Its namespaced label.
        label: String,
    },

    /// Synthesis itself failed (missing value, canonicalization).
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}

/// A satisfying assignment, bound to the shape it satisfies.
///
/// Immutable once built; provers read it and never modify it.
#[derive(Debug, Clone)]
pub struct Witness {
    shape_digest: ContentDigest,
    public_inputs: PublicInputVector,
    private_values: Vec<FieldElement>,
}

impl Witness {
    /// Digest of the shape this witness satisfies.
    pub fn shape_digest(&self) -> &ContentDigest {
        &self.shape_digest
    }

    /// The public subset, in vector order.
    pub fn public_inputs(&self) -> &PublicInputVector {
        &self.public_inputs
    }

    /// Private signal values in allocation order, hints included.
    pub fn private_values(&self) -> &[FieldElement] {
        &self.private_values
    }
}

/// Synthesize `circuit` in witness mode and check every constraint.
///
/// # Errors
///
/// [`WitnessError::ConstraintViolation`] naming the first unsatisfied
/// constraint, or [`WitnessError::Synthesis`] when the circuit could not be
/// evaluated at all.
pub fn build_witness<C: Circuit>(circuit: &C) -> Result<Witness, WitnessError> {
    let mut cs = ConstraintSystem::new(SynthesisMode::Witness);
    circuit.synthesize(&mut cs)?;

    if let Some((index, constraint)) = cs.which_is_unsatisfied() {
        tracing::debug!(circuit = circuit.name(), index, label = %constraint.label, "no satisfying assignment");
        return Err(WitnessError::ConstraintViolation {
            index,
            label: constraint.label.clone(),
        });
    }

    let output = cs.finish(circuit.name())?;
    let public = output
        .public_values
        .into_iter()
        .zip(output.shape.public_signals())
        .map(|(v, name)| v.ok_or_else(|| SynthesisError::AssignmentMissing(name.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    let private = output
        .private_values
        .into_iter()
        .zip(output.shape.private_signals())
        .map(|(v, name)| v.ok_or_else(|| SynthesisError::AssignmentMissing(name.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Witness {
        shape_digest: output.shape.digest()?,
        public_inputs: PublicInputVector::new(public),
        private_values: private,
    })
}
