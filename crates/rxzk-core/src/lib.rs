//! # rxzk-core: Foundational Types for Prescription-Validity Proofs
//!
//! The leaf crate of the workspace. It defines the value types every other
//! crate speaks in: field elements, the public/private signal vocabulary,
//! and the canonical byte encoding that all digests flow through.
//!
//! ## Key Design Principles
//!
//! 1. **One field, one newtype.** [`FieldElement`] wraps the BN254 scalar
//!    field. Decimal strings are the only textual encoding, and parsing never
//!    silently reduces an out-of-range value.
//!
//! 2. **Immutable public vectors.** [`PublicInputVector`] has no mutable
//!    accessors. Tampering probes go through
//!    [`PublicInputVector::with_coordinate`], which returns a copy.
//!
//! 3. **`CanonicalBytes` for every digest.** Key fingerprints, shape digests
//!    and report digests are all computed over [`CanonicalBytes`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rxzk-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod field;
pub mod signal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm, Sha256Accumulator};
pub use error::{CanonicalizationError, FieldError, RxzkError, SignalError};
pub use field::FieldElement;
pub use signal::{PublicInputVector, Visibility, WitnessInput};
