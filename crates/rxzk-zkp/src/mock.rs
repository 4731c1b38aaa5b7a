//! # Mock Proof System
//!
//! A transparent backend for development and the scenario harness. It has
//! the same artifact layout as a pairing-based proof system (`pi_a`, `pi_b`,
//! `pi_c`; a verification key with an `IC` array of `nPublic + 1`
//! constants) but every part is a SHA-256 digest.
//!
//! ## Binding
//!
//! ```text
//! fingerprint = SHA256(JCS(verification_key))
//! pi_x        = SHA256(tag_x || fingerprint || JCS(public_inputs))
//! ```
//!
//! Changing any public coordinate or any key constant changes every part,
//! so replayed proofs and substituted keys verify as `false`.
//!
//! ## Security Warning
//!
//! **NOT SOUND, NOT PRIVATE.** Anyone holding the verification key can
//! produce a certificate for any public vector. The proving side only ever
//! emits certificates for witnesses that satisfy the circuit, which is all
//! the harness relies on. [`ProofPolicy`](crate::policy::ProofPolicy)
//! rejects this backend in production.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use rxzk_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, PublicInputVector, Sha256Accumulator,
};

use crate::policy::ProofBackend;
use crate::r1cs::R1csShape;
use crate::traits::{ProofError, ProofSystem, SetupError, VerifyError};
use crate::witness::Witness;

/// Protocol tag carried by mock keys and proofs.
pub const MOCK_PROTOCOL: &str = "mock-sha256";

const IC_TAG: &[u8] = b"rxzk.mock.ic.v1";
const PERTURB_TAG: &[u8] = b"rxzk.mock.ic.perturbed.v1";
const PART_TAGS: [&[u8]; 3] = [b"rxzk.mock.pi_a.v1", b"rxzk.mock.pi_b.v1", b"rxzk.mock.pi_c.v1"];

/// Mock verification key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockVerifyingKey {
    pub protocol: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    /// Hex digest of the circuit shape the key was generated for.
    #[serde(rename = "shapeDigest")]
    pub shape_digest: String,
    /// One constant per public signal plus the constant term.
    #[serde(rename = "IC")]
    pub ic: Vec<String>,
}

impl MockVerifyingKey {
    fn fingerprint(&self) -> Result<[u8; 32], CanonicalizationError> {
        Ok(sha256_digest(&CanonicalBytes::new(self)?).bytes)
    }

    fn check_structure(&self) -> Result<(), VerifyError> {
        if self.protocol != MOCK_PROTOCOL {
            return Err(VerifyError::MalformedKey(format!(
                "protocol {:?} is not {MOCK_PROTOCOL}",
                self.protocol
            )));
        }
        if self.ic.len() != self.n_public + 1 {
            return Err(VerifyError::MalformedKey(format!(
                "IC has {} entries, expected nPublic + 1 = {}",
                self.ic.len(),
                self.n_public + 1
            )));
        }
        if !self.ic.iter().all(|c| is_hex_digest(c)) {
            return Err(VerifyError::MalformedKey(
                "IC entries must be 64 lowercase hex characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mock proving key. Carries the verification key it was generated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockProvingKey {
    pub protocol: String,
    #[serde(rename = "shapeDigest")]
    pub shape_digest: String,
    #[serde(rename = "verificationKey")]
    pub verification_key: MockVerifyingKey,
}

/// Mock proof: three SHA-256 parts in hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockProof {
    pub pi_a: String,
    pub pi_b: String,
    pub pi_c: String,
    pub protocol: String,
}

impl MockProof {
    fn parts(&self) -> [&str; 3] {
        [&self.pi_a, &self.pi_b, &self.pi_c]
    }
}

/// The mock backend.
///
/// Each `setup` draws fresh randomness from the OS unless a fixed seed is
/// configured with [`with_seed`](Self::with_seed).
#[derive(Debug, Clone, Default)]
pub struct MockProofSystem {
    seed: Option<[u8; 32]>,
}

impl MockProofSystem {
    /// Backend with fresh randomness per key pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with reproducible keys.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self { seed: Some(seed) }
    }

    fn certificate(
        vk: &MockVerifyingKey,
        public_inputs: &PublicInputVector,
    ) -> Result<[String; 3], CanonicalizationError> {
        let fingerprint = vk.fingerprint()?;
        let publics = CanonicalBytes::new(public_inputs)?;
        Ok(PART_TAGS.map(|tag| {
            let mut acc = Sha256Accumulator::new();
            acc.update(tag).update(&fingerprint).update(publics.as_bytes());
            acc.finalize_hex()
        }))
    }
}

impl ProofSystem for MockProofSystem {
    type Proof = MockProof;
    type ProvingKey = MockProvingKey;
    type VerifyingKey = MockVerifyingKey;

    fn backend(&self) -> ProofBackend {
        ProofBackend::Mock
    }

    fn setup(&self, shape: &R1csShape) -> Result<(MockProvingKey, MockVerifyingKey), SetupError> {
        let seed = self.seed.unwrap_or_else(|| {
            let mut seed = [0u8; 32];
            OsRng.fill_bytes(&mut seed);
            seed
        });
        let digest = shape.digest()?;
        let ic = (0..=shape.num_public())
            .map(|i| {
                let mut acc = Sha256Accumulator::new();
                acc.update(IC_TAG)
                    .update(&seed)
                    .update(&digest.bytes)
                    .update(&(i as u32).to_be_bytes());
                acc.finalize_hex()
            })
            .collect();
        let vk = MockVerifyingKey {
            protocol: MOCK_PROTOCOL.to_string(),
            n_public: shape.num_public(),
            shape_digest: digest.to_hex(),
            ic,
        };
        tracing::info!(
            circuit = shape.circuit(),
            constraints = shape.num_constraints(),
            shape = %digest,
            "generated mock key pair"
        );
        let pk = MockProvingKey {
            protocol: MOCK_PROTOCOL.to_string(),
            shape_digest: vk.shape_digest.clone(),
            verification_key: vk.clone(),
        };
        Ok((pk, vk))
    }

    fn prove(
        &self,
        pk: &MockProvingKey,
        witness: &Witness,
    ) -> Result<(MockProof, PublicInputVector), ProofError> {
        let witness_shape = witness.shape_digest().to_hex();
        if witness_shape != pk.shape_digest {
            return Err(ProofError::ShapeMismatch {
                witness: witness_shape,
                key: pk.shape_digest.clone(),
            });
        }
        let public_inputs = witness.public_inputs().clone();
        let [pi_a, pi_b, pi_c] = Self::certificate(&pk.verification_key, &public_inputs)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        Ok((
            MockProof {
                pi_a,
                pi_b,
                pi_c,
                protocol: MOCK_PROTOCOL.to_string(),
            },
            public_inputs,
        ))
    }

    fn verify(
        &self,
        vk: &MockVerifyingKey,
        public_inputs: &PublicInputVector,
        proof: &MockProof,
    ) -> Result<bool, VerifyError> {
        if proof.protocol != MOCK_PROTOCOL {
            return Err(VerifyError::MalformedProof(format!(
                "protocol {:?} is not {MOCK_PROTOCOL}",
                proof.protocol
            )));
        }
        if !proof.parts().iter().all(|p| is_hex_digest(p)) {
            return Err(VerifyError::MalformedProof(
                "proof parts must be 64 lowercase hex characters".to_string(),
            ));
        }
        vk.check_structure()?;
        if public_inputs.len() != vk.n_public {
            return Err(VerifyError::PublicInputLength {
                expected: vk.n_public,
                got: public_inputs.len(),
            });
        }
        let expected = Self::certificate(vk, public_inputs)
            .map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        Ok(proof
            .parts()
            .iter()
            .zip(expected.iter())
            .all(|(got, want)| got == want))
    }

    fn perturb_verifying_key(
        &self,
        vk: &MockVerifyingKey,
        index: usize,
    ) -> Result<MockVerifyingKey, VerifyError> {
        let Some(constant) = vk.ic.get(index) else {
            return Err(VerifyError::MalformedKey(format!(
                "IC index {index} out of range for {} constants",
                vk.ic.len()
            )));
        };
        let mut acc = Sha256Accumulator::new();
        acc.update(PERTURB_TAG).update(constant.as_bytes());
        let mut altered = vk.clone();
        altered.ic[index] = acc.finalize_hex();
        Ok(altered)
    }
}

/// Digests are emitted in lowercase hex; any other spelling is malformed.
fn is_hex_digest(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::{synthesize_shape, Circuit, ConstraintSystem, SynthesisError};
    use crate::witness::build_witness;
    use rxzk_core::FieldElement;

    /// `x · x = y` with public `y`.
    struct Square(Option<u64>);

    impl Circuit for Square {
        fn name(&self) -> &'static str {
            "square"
        }

        fn synthesize(&self, cs: &mut ConstraintSystem) -> Result<(), SynthesisError> {
            let x = self.0.map(FieldElement::from_u64);
            let y = cs.alloc_public("y", || {
                x.map(|x| x * x)
                    .ok_or_else(|| SynthesisError::AssignmentMissing("y".into()))
            })?;
            let xv = cs.alloc_private("x", || {
                x.ok_or_else(|| SynthesisError::AssignmentMissing("x".into()))
            })?;
            cs.enforce("square", xv.into(), xv.into(), y.into());
            Ok(())
        }
    }

    fn keyed() -> (MockProofSystem, MockProvingKey, MockVerifyingKey) {
        let sys = MockProofSystem::with_seed([7; 32]);
        let shape = synthesize_shape(&Square(None)).unwrap();
        let (pk, vk) = sys.setup(&shape).unwrap();
        (sys, pk, vk)
    }

    #[test]
    fn key_layout() {
        let (_, pk, vk) = keyed();
        assert_eq!(vk.n_public, 1);
        assert_eq!(vk.ic.len(), 2);
        assert_eq!(pk.verification_key, vk);
        let json = serde_json::to_value(&vk).unwrap();
        assert!(json.get("IC").is_some());
        assert!(json.get("nPublic").is_some());
        assert!(json.get("shapeDigest").is_some());
    }

    #[test]
    fn prove_then_verify() {
        let (sys, pk, vk) = keyed();
        let witness = build_witness(&Square(Some(3))).unwrap();
        let (proof, publics) = sys.prove(&pk, &witness).unwrap();
        assert_eq!(publics.as_slice(), &[FieldElement::from_u64(9)]);
        assert!(sys.verify(&vk, &publics, &proof).unwrap());
    }

    #[test]
    fn replayed_public_vector_fails() {
        let (sys, pk, vk) = keyed();
        let witness = build_witness(&Square(Some(3))).unwrap();
        let (proof, publics) = sys.prove(&pk, &witness).unwrap();
        let tampered = publics.with_coordinate(0, FieldElement::from_u64(10)).unwrap();
        assert!(!sys.verify(&vk, &tampered, &proof).unwrap());
        assert!(sys.verify(&vk, &publics, &proof).unwrap());
    }

    #[test]
    fn perturbed_key_fails_and_original_survives() {
        let (sys, pk, vk) = keyed();
        let witness = build_witness(&Square(Some(4))).unwrap();
        let (proof, publics) = sys.prove(&pk, &witness).unwrap();
        for index in 0..vk.ic.len() {
            let altered = sys.perturb_verifying_key(&vk, index).unwrap();
            assert_ne!(altered.ic[index], vk.ic[index]);
            assert!(!sys.verify(&altered, &publics, &proof).unwrap());
        }
        assert!(sys.verify(&vk, &publics, &proof).unwrap());
        assert!(matches!(
            sys.perturb_verifying_key(&vk, 2),
            Err(VerifyError::MalformedKey(_))
        ));
    }

    #[test]
    fn independent_setups_do_not_share_keys() {
        let shape = synthesize_shape(&Square(None)).unwrap();
        let sys = MockProofSystem::new();
        let (pk_a, _) = sys.setup(&shape).unwrap();
        let (_, vk_b) = sys.setup(&shape).unwrap();
        assert_ne!(pk_a.verification_key, vk_b);

        let witness = build_witness(&Square(Some(5))).unwrap();
        let (proof, publics) = sys.prove(&pk_a, &witness).unwrap();
        assert!(!sys.verify(&vk_b, &publics, &proof).unwrap());
    }

    #[test]
    fn malformed_inputs_are_errors() {
        let (sys, pk, vk) = keyed();
        let witness = build_witness(&Square(Some(2))).unwrap();
        let (proof, publics) = sys.prove(&pk, &witness).unwrap();

        let short = MockProof {
            pi_a: "abcd".into(),
            ..proof.clone()
        };
        assert!(matches!(
            sys.verify(&vk, &publics, &short),
            Err(VerifyError::MalformedProof(_))
        ));

        let long = PublicInputVector::new(vec![FieldElement::one(), FieldElement::one()]);
        assert!(matches!(
            sys.verify(&vk, &long, &proof),
            Err(VerifyError::PublicInputLength { expected: 1, got: 2 })
        ));

        let mut truncated = vk.clone();
        truncated.ic.pop();
        assert!(matches!(
            sys.verify(&truncated, &publics, &proof),
            Err(VerifyError::MalformedKey(_))
        ));
    }

    #[test]
    fn witness_for_another_shape_is_refused() {
        let (sys, pk, _) = keyed();
        let mut other = pk.clone();
        other.shape_digest = "00".repeat(32);
        let witness = build_witness(&Square(Some(2))).unwrap();
        assert!(matches!(
            sys.prove(&other, &witness),
            Err(ProofError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn uppercased_proof_parts_are_rejected() {
        let (sys, pk, vk) = keyed();
        let witness = build_witness(&Square(Some(3))).unwrap();
        let (proof, publics) = sys.prove(&pk, &witness).unwrap();
        let shouted = MockProof {
            pi_a: proof.pi_a.to_ascii_uppercase(),
            ..proof.clone()
        };
        assert!(matches!(
            sys.verify(&vk, &publics, &shouted),
            Err(VerifyError::MalformedProof(_))
        ));
        assert!(sys.verify(&vk, &publics, &proof).unwrap());
    }

}
