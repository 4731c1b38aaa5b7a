//! # Verify Subcommand
//!
//! Checks a proof against a public input file under a verification key.
//! Exit 0 when the proof verifies, 1 on a mismatch. Malformed files are
//! errors, which also exit 1 but are logged rather than printed as a
//! verdict. The mock backend is refused under the production policy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rxzk_core::PublicInputVector;
use rxzk_zkp::{MockProof, MockProofSystem, MockVerifyingKey, ProofBackend, Verifier};

use crate::config::CliConfig;
use crate::read_json;

/// Arguments for `rxzk verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Verification key written by `rxzk setup`.
    #[arg(long)]
    pub vk: PathBuf,
    /// Proof written by `rxzk prove`.
    #[arg(long)]
    pub proof: PathBuf,
    /// Public input vector: a JSON array of decimal strings.
    #[arg(long)]
    pub public: PathBuf,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, config: &CliConfig) -> Result<u8> {
    config
        .proof_policy()?
        .validate(ProofBackend::Mock)
        .context("verification refused")?;

    let vk: MockVerifyingKey = read_json(&args.vk, "verification key")?;
    let proof: MockProof = read_json(&args.proof, "proof")?;
    let publics: PublicInputVector = read_json(&args.public, "public inputs")?;

    let verifier = Verifier::new(MockProofSystem::new(), vk);
    let valid = verifier
        .check(&proof, &publics)
        .context("verification request is malformed")?;
    tracing::info!(valid, "verification finished");

    if valid {
        println!("OK: proof verifies");
        Ok(0)
    } else {
        println!("FAIL: proof does not verify for these public inputs and key");
        Ok(1)
    }
}
