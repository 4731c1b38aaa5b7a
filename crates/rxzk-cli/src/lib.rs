//! # rxzk-cli: Command-Line Interface
//!
//! Provides the `rxzk` binary.
//!
//! ## Subcommands
//!
//! - `rxzk setup`: mock key pair for the prescription circuit.
//! - `rxzk prove`: witness construction and proof generation.
//! - `rxzk verify`: proof verification against a public input file.
//! - `rxzk inspect`: circuit shape summary.
//! - `rxzk scenarios`: the standard security scenario catalog.
//!
//! ## Exit Codes
//!
//! `0` on success, `1` on a verification mismatch, a failed scenario or any
//! error, `2` when the input has no satisfying assignment.
//!
//! ```bash
//! rxzk setup --out-dir keys
//! rxzk prove --pk keys/proving_key.json --input input.json --out-dir out
//! rxzk verify --vk keys/verification_key.json --proof out/proof.json --public out/public.json
//! rxzk scenarios --sequential --json
//! ```

pub mod config;
pub mod inspect;
pub mod prove;
pub mod scenarios;
pub mod setup;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

/// File name of the proving key written by `setup`.
pub const PROVING_KEY_FILE: &str = "proving_key.json";
/// File name of the verification key written by `setup`.
pub const VERIFICATION_KEY_FILE: &str = "verification_key.json";
/// File name of the proof written by `prove`.
pub const PROOF_FILE: &str = "proof.json";
/// File name of the public input vector written by `prove`.
pub const PUBLIC_FILE: &str = "public.json";

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what}: {}", path.display()))
}

/// Serialize `value` as pretty JSON into `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {what}"))?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write {what}: {}", path.display()))
}
