//! # Groth16 Backend
//!
//! Real zero-knowledge proofs over BN254 via arkworks. The synthesized
//! [`R1csShape`] is replayed into an arkworks constraint system: public
//! signals become instance variables in vector order, private signals
//! become witness variables in allocation order, and each constraint is
//! enforced term by term.
//!
//! Proof parts are the compressed encodings of `A ∈ G1`, `B ∈ G2` and
//! `C ∈ G1`, hex encoded.

use std::sync::Arc;

use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_groth16::Groth16;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, LinearCombination as ArkLinearCombination,
    SynthesisError as ArkSynthesisError, Variable as ArkVariable,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use rxzk_core::{FieldElement, PublicInputVector};

use crate::policy::ProofBackend;
use crate::r1cs::{LinearCombination, R1csShape, Variable};
use crate::traits::{ProofError, ProofSystem, SetupError, VerifyError};
use crate::witness::Witness;

/// Protocol tag carried by Groth16 proofs.
pub const GROTH16_PROTOCOL: &str = "groth16";

/// Curve name in the snarkjs convention.
pub const GROTH16_CURVE: &str = "bn128";

/// Groth16 proving key, bound to the shape it was generated for.
#[derive(Clone)]
pub struct Groth16ProvingKey {
    shape: Arc<R1csShape>,
    shape_digest: String,
    key: ark_groth16::ProvingKey<Bn254>,
}

impl std::fmt::Debug for Groth16ProvingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Groth16ProvingKey")
            .field("shape_digest", &self.shape_digest)
            .finish_non_exhaustive()
    }
}

/// Groth16 verification key.
#[derive(Debug, Clone)]
pub struct Groth16VerifyingKey {
    shape_digest: String,
    key: ark_groth16::VerifyingKey<Bn254>,
}

impl Groth16VerifyingKey {
    /// Number of public inputs the key expects.
    pub fn n_public(&self) -> usize {
        self.key.gamma_abc_g1.len().saturating_sub(1)
    }

    /// Hex digest of the shape the key was generated for.
    pub fn shape_digest(&self) -> &str {
        &self.shape_digest
    }

    /// Compressed encoding, hex.
    pub fn to_hex(&self) -> Result<String, VerifyError> {
        let mut bytes = Vec::new();
        self.key
            .serialize_compressed(&mut bytes)
            .map_err(|e| VerifyError::MalformedKey(e.to_string()))?;
        Ok(encode_hex(&bytes))
    }
}

/// Groth16 proof artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    pub pi_a: String,
    pub pi_b: String,
    pub pi_c: String,
    pub protocol: String,
    pub curve: String,
}

impl Groth16Proof {
    fn from_ark(proof: &ark_groth16::Proof<Bn254>) -> Result<Self, ProofError> {
        Ok(Self {
            pi_a: compressed_hex(&proof.a).map_err(ProofError::GenerationFailed)?,
            pi_b: compressed_hex(&proof.b).map_err(ProofError::GenerationFailed)?,
            pi_c: compressed_hex(&proof.c).map_err(ProofError::GenerationFailed)?,
            protocol: GROTH16_PROTOCOL.to_string(),
            curve: GROTH16_CURVE.to_string(),
        })
    }

    fn to_ark(&self) -> Result<ark_groth16::Proof<Bn254>, VerifyError> {
        if self.protocol != GROTH16_PROTOCOL {
            return Err(VerifyError::MalformedProof(format!(
                "protocol {:?} is not {GROTH16_PROTOCOL}",
                self.protocol
            )));
        }
        Ok(ark_groth16::Proof {
            a: decode_point::<G1Affine>("pi_a", &self.pi_a)?,
            b: decode_point::<G2Affine>("pi_b", &self.pi_b)?,
            c: decode_point::<G1Affine>("pi_c", &self.pi_c)?,
        })
    }
}

/// Replays an [`R1csShape`] into arkworks.
struct ShapeSynthesizer<'a> {
    shape: &'a R1csShape,
    public: Option<&'a [FieldElement]>,
    private: Option<&'a [FieldElement]>,
}

impl ShapeSynthesizer<'_> {
    fn convert(
        lc: &LinearCombination,
        public: &[ArkVariable],
        private: &[ArkVariable],
    ) -> Result<ArkLinearCombination<Fr>, ArkSynthesisError> {
        lc.terms()
            .iter()
            .try_fold(ArkLinearCombination::zero(), |acc, (var, coeff)| {
                let var = match var {
                    Variable::One => ArkVariable::One,
                    Variable::Public(i) => *public.get(*i).ok_or(ArkSynthesisError::AssignmentMissing)?,
                    Variable::Private(i) => *private.get(*i).ok_or(ArkSynthesisError::AssignmentMissing)?,
                };
                Ok(acc + (coeff.into_inner(), var))
            })
    }
}

impl ConstraintSynthesizer<Fr> for ShapeSynthesizer<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), ArkSynthesisError> {
        let value = |values: Option<&[FieldElement]>, i: usize| {
            values
                .and_then(|v| v.get(i))
                .map(|v| v.into_inner())
                .ok_or(ArkSynthesisError::AssignmentMissing)
        };
        let public = (0..self.shape.num_public())
            .map(|i| cs.new_input_variable(|| value(self.public, i)))
            .collect::<Result<Vec<_>, _>>()?;
        let private = (0..self.shape.num_private())
            .map(|i| cs.new_witness_variable(|| value(self.private, i)))
            .collect::<Result<Vec<_>, _>>()?;
        for constraint in self.shape.constraints() {
            cs.enforce_constraint(
                Self::convert(&constraint.a, &public, &private)?,
                Self::convert(&constraint.b, &public, &private)?,
                Self::convert(&constraint.c, &public, &private)?,
            )?;
        }
        Ok(())
    }
}

/// The arkworks Groth16 backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Groth16ProofSystem;

impl ProofSystem for Groth16ProofSystem {
    type Proof = Groth16Proof;
    type ProvingKey = Groth16ProvingKey;
    type VerifyingKey = Groth16VerifyingKey;

    fn backend(&self) -> ProofBackend {
        ProofBackend::Groth16
    }

    fn setup(
        &self,
        shape: &R1csShape,
    ) -> Result<(Groth16ProvingKey, Groth16VerifyingKey), SetupError> {
        let shape_digest = shape.digest()?.to_hex();
        let synthesizer = ShapeSynthesizer {
            shape,
            public: None,
            private: None,
        };
        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(synthesizer, &mut OsRng)
            .map_err(|e| SetupError::KeyGeneration(e.to_string()))?;
        tracing::info!(
            circuit = shape.circuit(),
            constraints = shape.num_constraints(),
            "generated groth16 key pair"
        );
        Ok((
            Groth16ProvingKey {
                shape: Arc::new(shape.clone()),
                shape_digest: shape_digest.clone(),
                key: pk,
            },
            Groth16VerifyingKey {
                shape_digest,
                key: vk,
            },
        ))
    }

    fn prove(
        &self,
        pk: &Groth16ProvingKey,
        witness: &Witness,
    ) -> Result<(Groth16Proof, PublicInputVector), ProofError> {
        let witness_shape = witness.shape_digest().to_hex();
        if witness_shape != pk.shape_digest {
            return Err(ProofError::ShapeMismatch {
                witness: witness_shape,
                key: pk.shape_digest.clone(),
            });
        }
        let synthesizer = ShapeSynthesizer {
            shape: &pk.shape,
            public: Some(witness.public_inputs().as_slice()),
            private: Some(witness.private_values()),
        };
        let proof = Groth16::<Bn254>::prove(&pk.key, synthesizer, &mut OsRng)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        Ok((Groth16Proof::from_ark(&proof)?, witness.public_inputs().clone()))
    }

    fn verify(
        &self,
        vk: &Groth16VerifyingKey,
        public_inputs: &PublicInputVector,
        proof: &Groth16Proof,
    ) -> Result<bool, VerifyError> {
        let proof = proof.to_ark()?;
        if public_inputs.len() != vk.n_public() {
            return Err(VerifyError::PublicInputLength {
                expected: vk.n_public(),
                got: public_inputs.len(),
            });
        }
        let inputs: Vec<Fr> = public_inputs
            .as_slice()
            .iter()
            .map(|v| v.into_inner())
            .collect();
        Groth16::<Bn254>::verify(&vk.key, &inputs, &proof)
            .map_err(|e| VerifyError::MalformedKey(e.to_string()))
    }

    fn perturb_verifying_key(
        &self,
        vk: &Groth16VerifyingKey,
        index: usize,
    ) -> Result<Groth16VerifyingKey, VerifyError> {
        let mut altered = vk.clone();
        let Some(point) = altered.key.gamma_abc_g1.get_mut(index) else {
            return Err(VerifyError::MalformedKey(format!(
                "IC index {index} out of range for {} constants",
                vk.key.gamma_abc_g1.len()
            )));
        };
        let mut shifted = point.into_group();
        shifted += G1Affine::generator();
        *point = shifted.into_affine();
        Ok(altered)
    }
}

fn compressed_hex<T: CanonicalSerialize>(point: &T) -> Result<String, String> {
    let mut bytes = Vec::new();
    point
        .serialize_compressed(&mut bytes)
        .map_err(|e| e.to_string())?;
    Ok(encode_hex(&bytes))
}

fn decode_point<T: CanonicalDeserialize>(part: &str, hex: &str) -> Result<T, VerifyError> {
    let bytes = decode_hex(hex)
        .ok_or_else(|| VerifyError::MalformedProof(format!("{part} is not valid hex")))?;
    T::deserialize_compressed(bytes.as_slice())
        .map_err(|e| VerifyError::MalformedProof(format!("{part}: {e}")))
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
