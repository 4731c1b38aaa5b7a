//! # Proof Backend Policy
//!
//! The mock backend's certificates are recomputable by anyone holding the
//! verification key, so accepting them is only meaningful in development.
//! [`ProofPolicy`] is checked before key generation; a rejection surfaces as
//! a setup failure.
//!
//! ## Configuration
//!
//! 1. `RXZK_PROOF_POLICY` environment variable (`production` | `development`)
//! 2. Otherwise release builds default to `Production` and debug builds to
//!    `Development`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the compile-time policy default.
pub const POLICY_ENV_VAR: &str = "RXZK_PROOF_POLICY";

/// Policy refusals and unparseable policy settings.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Mock backend rejected in production mode.
    #[error("backend {backend} rejected: production mode requires a real proof backend")]
    MockProofRejected {
        /// The rejected backend.
        backend: String,
    },

    /// A backend name that is not recognised.
    #[error("unknown proof backend {0:?} (expected \"mock\" or \"groth16\")")]
    UnknownBackend(String),

    /// A policy name that is not recognised.
    #[error("unknown proof policy {0:?} (expected \"production\" or \"development\")")]
    UnknownMode(String),
}

/// The kind of backend that produced a key or proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofBackend {
    /// Transparent SHA-256 certificates. No cryptographic security.
    Mock,
    /// Groth16 over BN254.
    Groth16,
}

impl ProofBackend {
    /// Whether this backend provides real soundness and zero knowledge.
    pub fn is_real(self) -> bool {
        matches!(self, ProofBackend::Groth16)
    }

    /// Protocol name recorded in artifacts.
    pub fn name(self) -> &'static str {
        match self {
            ProofBackend::Mock => "mock-sha256",
            ProofBackend::Groth16 => "groth16",
        }
    }
}

impl std::fmt::Display for ProofBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ProofBackend {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" | "mock-sha256" => Ok(Self::Mock),
            "groth16" => Ok(Self::Groth16),
            _ => Err(PolicyError::UnknownBackend(s.to_string())),
        }
    }
}

/// Proof policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Reject the mock backend unconditionally.
    Production,
    /// Accept every backend.
    Development,
}

impl std::str::FromStr for PolicyMode {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(PolicyError::UnknownMode(s.to_string())),
        }
    }
}

/// Runtime policy deciding whether a backend may be used.
#[derive(Debug, Clone)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    /// A policy with the given mode.
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    /// Rejects the mock backend.
    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    /// Accepts every backend.
    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Policy from `RXZK_PROOF_POLICY`, falling back to the build profile.
    pub fn from_environment() -> Self {
        Self::from_env_value(std::env::var(POLICY_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        if let Some(raw) = value {
            match raw.parse::<PolicyMode>() {
                Ok(mode) => return Self::new(mode),
                Err(_) => tracing::warn!(
                    value = raw,
                    "ignoring unrecognised {POLICY_ENV_VAR}; using the build default"
                ),
            }
        }
        if cfg!(not(debug_assertions)) {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Check whether `backend` is acceptable under this policy.
    pub fn validate(&self, backend: ProofBackend) -> Result<(), PolicyError> {
        match self.mode {
            PolicyMode::Production if !backend.is_real() => Err(PolicyError::MockProofRejected {
                backend: backend.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_rejects_mock() {
        let err = ProofPolicy::production()
            .validate(ProofBackend::Mock)
            .unwrap_err();
        assert!(err.to_string().contains("mock-sha256"));
        assert!(ProofPolicy::production().validate(ProofBackend::Groth16).is_ok());
    }

    #[test]
    fn development_accepts_everything() {
        let policy = ProofPolicy::development();
        assert!(policy.validate(ProofBackend::Mock).is_ok());
        assert!(policy.validate(ProofBackend::Groth16).is_ok());
    }

    #[test]
    fn env_value_overrides_build_default() {
        assert_eq!(
            ProofPolicy::from_env_value(Some("production")).mode(),
            PolicyMode::Production
        );
        assert_eq!(
            ProofPolicy::from_env_value(Some("DEV")).mode(),
            PolicyMode::Development
        );
    }

    #[test]
    fn unrecognised_env_value_uses_build_default() {
        let expected = if cfg!(debug_assertions) {
            PolicyMode::Development
        } else {
            PolicyMode::Production
        };
        assert_eq!(ProofPolicy::from_env_value(Some("maybe")).mode(), expected);
        assert_eq!(ProofPolicy::from_env_value(Some("production!")).mode(), expected);
        assert_eq!(ProofPolicy::from_env_value(None).mode(), expected);
    }

    #[test]
    fn backend_parsing() {
        assert_eq!("mock".parse::<ProofBackend>().unwrap(), ProofBackend::Mock);
        assert_eq!("Groth16".parse::<ProofBackend>().unwrap(), ProofBackend::Groth16);
        assert!("plonk".parse::<ProofBackend>().is_err());
        assert!(!ProofBackend::Mock.is_real());
    }
}
