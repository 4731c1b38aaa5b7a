//! Verification entry point with a fixed key.
//!
//! [`Verifier`] pins a backend to one verifying key and exposes the
//! contract-style `verify(proof, publics) -> bool`: pure, side-effect free,
//! and `false` for anything that does not verify, malformed input included.

use rxzk_core::PublicInputVector;

use crate::traits::{ProofSystem, VerifyError};

/// A backend bound to one verifying key.
#[derive(Debug, Clone)]
pub struct Verifier<S: ProofSystem> {
    system: S,
    vk: S::VerifyingKey,
}

impl<S: ProofSystem> Verifier<S> {
    /// Bind `system` to `vk`.
    pub fn new(system: S, vk: S::VerifyingKey) -> Self {
        Self { system, vk }
    }

    /// The pinned key.
    pub fn verifying_key(&self) -> &S::VerifyingKey {
        &self.vk
    }

    /// `true` iff `proof` verifies for `public_inputs` under the pinned key.
    pub fn verify(&self, proof: &S::Proof, public_inputs: &PublicInputVector) -> bool {
        match self.check(proof, public_inputs) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting malformed verification request");
                false
            }
        }
    }

    /// Like [`verify`](Self::verify) but distinguishes malformed input.
    pub fn check(
        &self,
        proof: &S::Proof,
        public_inputs: &PublicInputVector,
    ) -> Result<bool, VerifyError> {
        self.system.verify(&self.vk, public_inputs, proof)
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::circuits::{PrescriptionAssignment, PrescriptionCircuit};
    use crate::mock::{MockProof, MockProofSystem};
    use crate::r1cs::synthesize_shape;
    use crate::witness::build_witness;
    use rxzk_core::FieldElement;

    #[test]
    fn bool_entry_point() {
        let fe = FieldElement::from_u64;
        let sys = MockProofSystem::new();
        let (pk, vk) = sys
            .setup(&synthesize_shape(&PrescriptionCircuit::blank()).unwrap())
            .unwrap();
        let assignment = PrescriptionAssignment {
            doctor_credential_hash: rxzk_crypto::commit(&[fe(123), fe(456)]),
            trusted_source_hash: rxzk_crypto::commit(&[fe(1)]),
            required_action: fe(1),
            delta_max: fe(60),
            outcome: fe(1),
            doctor_id: fe(123),
            doctor_secret: fe(456),
            authorized_action: fe(1),
            source_id: fe(1),
            data_age: fe(30),
            allergy_class_id: fe(2),
            medication_class_id: fe(5),
        };
        let witness = build_witness(&PrescriptionCircuit::new(assignment)).unwrap();
        let (proof, publics) = sys.prove(&pk, &witness).unwrap();

        let verifier = Verifier::new(sys, vk);
        assert!(verifier.verify(&proof, &publics));
        assert!(!verifier.verify(&proof, &publics.with_coordinate(0, fe(1)).unwrap()));

        let garbage = MockProof {
            pi_a: "x".into(),
            ..proof
        };
        assert!(!verifier.verify(&garbage, &publics));
        assert!(verifier.check(&garbage, &publics).is_err());
    }
}
