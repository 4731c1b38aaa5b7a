//! # Setup Subcommand
//!
//! Synthesizes the prescription circuit's shape and writes a mock key pair
//! for it. Keys are only written when the effective proof policy accepts
//! the mock backend.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rxzk_zkp::{
    synthesize_shape, MockProofSystem, PrescriptionCircuit, ProofBackend, ProofSystem,
};

use crate::config::CliConfig;
use crate::{write_json, PROVING_KEY_FILE, VERIFICATION_KEY_FILE};

/// Arguments for `rxzk setup`.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Directory receiving `proving_key.json` and `verification_key.json`.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Execute the setup subcommand.
pub fn run_setup(args: &SetupArgs, config: &CliConfig) -> Result<u8> {
    config
        .proof_policy()?
        .validate(ProofBackend::Mock)
        .context("key generation refused")?;

    let shape = synthesize_shape(&PrescriptionCircuit::blank())
        .context("failed to synthesize the prescription circuit")?;
    let (pk, vk) = MockProofSystem::new()
        .setup(&shape)
        .context("key generation failed")?;

    let pk_path = args.out_dir.join(PROVING_KEY_FILE);
    let vk_path = args.out_dir.join(VERIFICATION_KEY_FILE);
    write_json(&pk_path, &pk, "proving key")?;
    write_json(&vk_path, &vk, "verification key")?;
    tracing::info!(shape = %vk.shape_digest, n_public = vk.n_public, "wrote mock key pair");

    println!("OK: generated mock key pair ({} constraints)", shape.num_constraints());
    println!("  Proving key:      {}", pk_path.display());
    println!("  Verification key: {}", vk_path.display());
    println!("  Shape digest:     {}", vk.shape_digest);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxzk_zkp::{MockProvingKey, MockVerifyingKey, PolicyMode, PublicSignal};

    fn dev_config() -> CliConfig {
        CliConfig {
            policy: Some(PolicyMode::Development),
            ..CliConfig::default()
        }
    }

    #[test]
    fn writes_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let args = SetupArgs {
            out_dir: dir.path().join("keys"),
        };
        assert_eq!(run_setup(&args, &dev_config()).unwrap(), 0);

        let pk: MockProvingKey = crate::read_json(&args.out_dir.join(PROVING_KEY_FILE), "pk").unwrap();
        let vk: MockVerifyingKey =
            crate::read_json(&args.out_dir.join(VERIFICATION_KEY_FILE), "vk").unwrap();
        assert_eq!(pk.verification_key, vk);
        assert_eq!(vk.n_public, PublicSignal::ORDER.len());
        assert_eq!(vk.ic.len(), PublicSignal::ORDER.len() + 1);
    }

    #[test]
    fn each_setup_draws_a_fresh_key() {
        let dir = tempfile::tempdir().unwrap();
        let first = SetupArgs { out_dir: dir.path().join("a") };
        let second = SetupArgs { out_dir: dir.path().join("b") };
        run_setup(&first, &dev_config()).unwrap();
        run_setup(&second, &dev_config()).unwrap();
        let a: MockVerifyingKey = crate::read_json(&first.out_dir.join(VERIFICATION_KEY_FILE), "vk").unwrap();
        let b: MockVerifyingKey = crate::read_json(&second.out_dir.join(VERIFICATION_KEY_FILE), "vk").unwrap();
        assert_eq!(a.shape_digest, b.shape_digest);
        assert_ne!(a.ic, b.ic);
    }
}
