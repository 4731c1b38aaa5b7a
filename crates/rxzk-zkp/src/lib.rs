//! # rxzk-zkp: Prescription-Validity Proof System
//!
//! Everything between a raw signal assignment and a verified proof:
//!
//! - [`r1cs`]: the rank-1 constraint language and its two-mode synthesizer.
//! - [`gadgets`]: booleanity, equality, range checks, comparison, is-zero,
//!   products and the in-circuit MiMC commitment.
//! - [`circuits`]: the prescription-validity circuit and its signal model.
//! - [`witness`]: the witness builder.
//! - [`traits`]: the sealed [`ProofSystem`] trait.
//! - [`mock`] (default feature `mock`): transparent SHA-256 backend.
//! - `groth16` (feature `groth16`): arkworks Groth16 on BN254.
//! - [`policy`]: which backends a deployment accepts.
//! - [`verifier`]: the `verify(proof, publics) -> bool` entry point.
//!
//! ## Pipeline
//!
//! ```text
//! PrescriptionCircuit::blank() ──synthesize_shape──▶ R1csShape ──setup──▶ (pk, vk)
//! WitnessInput ──PrescriptionCircuit::from_input──▶ build_witness ──▶ Witness
//! (pk, Witness) ──prove──▶ (proof, PublicInputVector) ──verify(vk)──▶ bool
//! ```

pub mod circuits;
pub mod gadgets;
#[cfg(feature = "groth16")]
pub mod groth16;
#[cfg(feature = "mock")]
pub mod mock;
pub mod policy;
pub mod r1cs;
pub mod traits;
pub mod verifier;
pub mod witness;

pub use circuits::{
    NativeEvaluation, PrescriptionAssignment, PrescriptionCheck, PrescriptionCircuit,
    PrivateSignal, PublicSignal, COMPARATOR_BITS,
};
#[cfg(feature = "groth16")]
pub use groth16::{Groth16Proof, Groth16ProofSystem, Groth16ProvingKey, Groth16VerifyingKey};
#[cfg(feature = "mock")]
pub use mock::{MockProof, MockProofSystem, MockProvingKey, MockVerifyingKey};
pub use policy::{PolicyError, PolicyMode, ProofBackend, ProofPolicy};
pub use r1cs::{synthesize_shape, Circuit, R1csShape, SynthesisError};
pub use traits::{ProofError, ProofSystem, SetupError, VerifyError};
pub use verifier::Verifier;
pub use witness::{build_witness, Witness, WitnessError};
