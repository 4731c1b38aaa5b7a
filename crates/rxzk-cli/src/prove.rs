//! # Prove Subcommand
//!
//! Reads a signal assignment, builds the witness and writes the proof and
//! its public input vector. An assignment with no satisfying witness exits
//! with code 2 and names the check that failed; nothing is written.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use rxzk_core::WitnessInput;
use rxzk_zkp::{
    build_witness, MockProofSystem, MockProvingKey, PrescriptionCheck, PrescriptionCircuit,
    ProofBackend, ProofSystem, WitnessError,
};

use crate::config::CliConfig;
use crate::{read_json, write_json, PROOF_FILE, PUBLIC_FILE};

/// Exit code for an assignment that violates a constraint.
pub const EXIT_NO_WITNESS: u8 = 2;

/// Arguments for `rxzk prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Proving key written by `rxzk setup`.
    #[arg(long)]
    pub pk: PathBuf,
    /// JSON object mapping every signal name to a decimal value.
    #[arg(long)]
    pub input: PathBuf,
    /// Directory receiving `proof.json` and `public.json`.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Execute the prove subcommand.
pub fn run_prove(args: &ProveArgs, config: &CliConfig) -> Result<u8> {
    config
        .proof_policy()?
        .validate(ProofBackend::Mock)
        .context("proving refused")?;

    let pk: MockProvingKey = read_json(&args.pk, "proving key")?;
    let input = read_input(&args.input)?;
    let circuit = PrescriptionCircuit::from_input(&input)
        .with_context(|| format!("invalid witness input: {}", args.input.display()))?;

    let witness = match build_witness(&circuit) {
        Ok(witness) => witness,
        Err(WitnessError::ConstraintViolation { index, label }) => {
            match PrescriptionCheck::from_label(&label) {
                Some(check) => println!("FAIL: {check} check: {}", check.describe()),
                None => println!("FAIL: no satisfying assignment"),
            }
            println!("  Constraint {index}: {label}");
            return Ok(EXIT_NO_WITNESS);
        }
        Err(e) => return Err(e).context("witness construction failed"),
    };

    let (proof, publics) = MockProofSystem::new()
        .prove(&pk, &witness)
        .context("proof generation failed")?;

    let proof_path = args.out_dir.join(PROOF_FILE);
    let public_path = args.out_dir.join(PUBLIC_FILE);
    write_json(&proof_path, &proof, "proof")?;
    write_json(&public_path, &publics, "public inputs")?;
    tracing::info!(shape = %witness.shape_digest(), "wrote proof");

    println!("OK: proof generated");
    println!("  Proof:         {}", proof_path.display());
    println!("  Public inputs: {}", public_path.display());
    Ok(0)
}

fn read_input(path: &Path) -> Result<WitnessInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read witness input: {}", path.display()))?;
    WitnessInput::from_json_str(&content)
        .with_context(|| format!("failed to parse witness input: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{run_setup, SetupArgs};
    use crate::PROVING_KEY_FILE;
    use rxzk_core::{FieldElement, PublicInputVector};
    use rxzk_zkp::{PolicyMode, PublicSignal};

    fn config() -> CliConfig {
        CliConfig {
            policy: Some(PolicyMode::Development),
            ..CliConfig::default()
        }
    }

    fn input_json(doctor_secret: u64, outcome: u64) -> String {
        let fe = FieldElement::from_u64;
        let credential = rxzk_crypto::commit(&[fe(123), fe(456)]).to_decimal();
        let source = rxzk_crypto::commit(&[fe(1)]).to_decimal();
        format!(
            r#"{{
                "doctorCredentialHash": "{credential}",
                "trustedSourceHash": "{source}",
                "requiredAction": "1",
                "deltaMax": "60",
                "outcome": "{outcome}",
                "doctorId": "123",
                "doctorSecret": "{doctor_secret}",
                "authorizedAction": "1",
                "sourceId": "1",
                "dataAge": 30,
                "allergyClassId": "2",
                "medicationClassId": "5"
            }}"#
        )
    }

    fn setup(dir: &Path) -> PathBuf {
        let keys = dir.join("keys");
        run_setup(&SetupArgs { out_dir: keys.clone() }, &config()).unwrap();
        keys.join(PROVING_KEY_FILE)
    }

    #[test]
    fn valid_input_writes_proof_and_publics() {
        let dir = tempfile::tempdir().unwrap();
        let pk = setup(dir.path());
        let input = dir.path().join("input.json");
        std::fs::write(&input, input_json(456, 1)).unwrap();
        let args = ProveArgs { pk, input, out_dir: dir.path().join("out") };

        assert_eq!(run_prove(&args, &config()).unwrap(), 0);
        let publics: PublicInputVector = read_json(&args.out_dir.join(PUBLIC_FILE), "publics").unwrap();
        assert_eq!(publics.len(), PublicSignal::ORDER.len());
        assert_eq!(publics.get(PublicSignal::Outcome.index()), Some(FieldElement::one()));
        assert!(args.out_dir.join(PROOF_FILE).exists());
    }

    #[test]
    fn violation_exits_two_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pk = setup(dir.path());
        let input = dir.path().join("input.json");
        std::fs::write(&input, input_json(999, 1)).unwrap();
        let args = ProveArgs { pk, input, out_dir: dir.path().join("out") };

        assert_eq!(run_prove(&args, &config()).unwrap(), EXIT_NO_WITNESS);
        assert!(!args.out_dir.join(PROOF_FILE).exists());
    }

    #[test]
    fn malformed_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pk = setup(dir.path());
        let input = dir.path().join("input.json");
        std::fs::write(&input, r#"{"doctorId": "123"}"#).unwrap();
        let args = ProveArgs { pk, input, out_dir: dir.path().join("out") };
        let err = run_prove(&args, &config()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid witness input"));
    }
}
