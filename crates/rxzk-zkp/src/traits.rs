//! # Proof System Trait (Sealed)
//!
//! The three consumed capabilities of the pipeline, behind one trait:
//! key generation from a circuit shape, proving from a [`Witness`], and
//! verification against a [`PublicInputVector`].
//!
//! ## Sealed Trait
//!
//! Only backends defined in this crate can implement [`ProofSystem`].
//! External crates pick a backend; they cannot inject one.
//!
//! ## Binding Contract
//!
//! A proof is valid for exactly one `(verifying key, public input vector)`
//! pair. `verify` returns `Ok(false)` for a well-formed proof checked
//! against any other pair; `Err` is reserved for inputs that are not
//! well-formed at all.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use rxzk_core::PublicInputVector;

use crate::policy::{PolicyError, ProofBackend};
use crate::r1cs::{R1csShape, SynthesisError};
use crate::witness::Witness;

/// Key generation failed. Fatal to every downstream prove or verify.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The proof policy forbids this backend.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The circuit shape could not be synthesized or digested.
    #[error("circuit synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// The backend's key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The witness was built for a different circuit shape than the key.
    #[error("witness shape {witness} does not match proving key shape {key}")]
    ShapeMismatch {
        /// Shape digest the witness carries.
        witness: String,
        /// Shape digest the proving key was generated for.
        key: String,
    },

    /// Proof generation failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
///
/// A verification *mismatch* is not an error; it is `Ok(false)`.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof is structurally malformed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The verifying key is structurally malformed, or a perturbation index
    /// does not name one of its constants.
    #[error("malformed verifying key: {0}")]
    MalformedKey(String),

    /// The public input vector has the wrong number of coordinates.
    #[error("expected {expected} public inputs, got {got}")]
    PublicInputLength {
        /// Public signals declared by the key.
        expected: usize,
        /// Coordinates supplied.
        got: usize,
    },
}

/// Private module that seals [`ProofSystem`].
mod private {
    pub trait Sealed {}
}

/// Sealed trait for a proof backend.
///
/// `Send + Sync` so one backend instance can serve parallel scenario runs.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// The proof artifact produced by `prove()`.
    type Proof: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync;
    /// The key used to generate proofs.
    type ProvingKey: Send + Sync;
    /// The key used to verify proofs. Cloned freely for distribution.
    type VerifyingKey: Clone + std::fmt::Debug + Send + Sync;

    /// Which backend this is, for policy checks and reports.
    fn backend(&self) -> ProofBackend;

    /// Generate a key pair for `shape`.
    ///
    /// # Errors
    ///
    /// [`SetupError::KeyGeneration`] when the backend cannot produce keys.
    fn setup(&self, shape: &R1csShape)
        -> Result<(Self::ProvingKey, Self::VerifyingKey), SetupError>;

    /// Prove that `witness` satisfies the key's circuit. Returns the proof
    /// together with the public input vector it is bound to.
    ///
    /// # Errors
    ///
    /// [`ProofError::ShapeMismatch`] when the witness was built for another
    /// shape; [`ProofError::GenerationFailed`] for backend failures.
    fn prove(
        &self,
        pk: &Self::ProvingKey,
        witness: &Witness,
    ) -> Result<(Self::Proof, PublicInputVector), ProofError>;

    /// Check `proof` against `public_inputs` under `vk`.
    ///
    /// # Errors
    ///
    /// [`VerifyError::MalformedProof`], [`VerifyError::MalformedKey`] or
    /// [`VerifyError::PublicInputLength`] for inputs that are not well-formed.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        public_inputs: &PublicInputVector,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError>;

    /// A structurally altered copy of `vk` with constant `index` of its
    /// public-input commitment array changed. `vk` itself is untouched.
    ///
    /// # Errors
    ///
    /// [`VerifyError::MalformedKey`] when `index` is not a constant of `vk`.
    fn perturb_verifying_key(
        &self,
        vk: &Self::VerifyingKey,
        index: usize,
    ) -> Result<Self::VerifyingKey, VerifyError>;
}

#[cfg(feature = "mock")]
impl private::Sealed for crate::mock::MockProofSystem {}

#[cfg(feature = "groth16")]
impl private::Sealed for crate::groth16::Groth16ProofSystem {}
