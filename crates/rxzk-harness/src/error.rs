//! Harness errors.
//!
//! Scenario-level outcomes (violations, mismatches, even backend failures
//! inside one scenario) are recorded in the report. Only failures that
//! invalidate the whole run surface here.

use thiserror::Error;

use rxzk_core::CanonicalizationError;
use rxzk_zkp::{SetupError, SynthesisError};

/// Error that aborts a harness run.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Key generation failed or was refused by policy.
    #[error("setup failure: {0}")]
    Setup(#[from] SetupError),

    /// The circuit shape could not be synthesized.
    #[error("circuit synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Two scenarios share a name, so probes cannot reference them.
    #[error("duplicate scenario name {0:?}")]
    DuplicateScenario(String),

    /// The report could not be canonicalized for digesting.
    #[error("report canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The report could not be serialized.
    #[error("report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
