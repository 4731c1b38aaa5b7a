//! # rxzk-crypto: Commitment Primitives
//!
//! The one-way commitment capability consumed by the prescription circuit.
//! Credential and trusted-source checks compare a commitment computed inside
//! the circuit against a public hash computed here, natively, by whoever
//! registers the doctor or the data source.

pub mod mimc;

pub use mimc::{commit, mimc7_encrypt, round_constants, MIMC_ROUNDS};
