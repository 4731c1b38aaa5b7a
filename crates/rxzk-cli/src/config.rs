//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! backend: mock          # mock | groth16
//! policy: development    # production | development
//! parallel: true
//! report_path: reports/scenarios.json
//! ```
//!
//! Every field is optional. A relative `report_path` is resolved against
//! the directory holding the configuration file. `RXZK_PROOF_POLICY`, when
//! set, overrides `policy`; with neither, the build profile decides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rxzk_zkp::policy::POLICY_ENV_VAR;
use rxzk_zkp::{PolicyMode, ProofBackend, ProofPolicy};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Backend for `scenarios`. Key files are always mock artifacts.
    pub backend: ProofBackend,
    /// Policy mode; `None` defers to the environment and build profile.
    pub policy: Option<PolicyMode>,
    /// Run fresh scenarios on the rayon pool.
    pub parallel: bool,
    /// Where `scenarios` writes its JSON report.
    pub report_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend: ProofBackend::Mock,
            policy: None,
            parallel: true,
            report_path: None,
        }
    }
}

impl CliConfig {
    /// Load from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        if let (Some(report), Some(base)) = (config.report_path.take(), path.parent()) {
            config.report_path = Some(crate::resolve_path(&report, base));
        }
        tracing::debug!(config = %path.display(), backend = %config.backend, "loaded configuration");
        Ok(config)
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// The effective proof policy, reading `RXZK_PROOF_POLICY`.
    pub fn proof_policy(&self) -> Result<ProofPolicy> {
        self.policy_with_override(std::env::var(POLICY_ENV_VAR).ok().as_deref())
    }

    fn policy_with_override(&self, env_value: Option<&str>) -> Result<ProofPolicy> {
        if let Some(value) = env_value {
            let mode: PolicyMode = value
                .parse()
                .with_context(|| format!("invalid {POLICY_ENV_VAR}"))?;
            return Ok(ProofPolicy::new(mode));
        }
        Ok(match self.policy {
            Some(mode) => ProofPolicy::new(mode),
            None => ProofPolicy::from_environment(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CliConfig::default();
        assert_eq!(config.backend, ProofBackend::Mock);
        assert!(config.parallel);
        assert!(config.policy.is_none());
        assert!(config.report_path.is_none());
        assert_eq!(CliConfig::from_yaml("").unwrap(), config);
        assert_eq!(CliConfig::load(None).unwrap(), config);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = CliConfig::from_yaml("parallel: false\npolicy: production\n").unwrap();
        assert!(!config.parallel);
        assert_eq!(config.policy, Some(PolicyMode::Production));
        assert_eq!(config.backend, ProofBackend::Mock);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(CliConfig::from_yaml("backnd: mock\n").is_err());
        assert!(CliConfig::from_yaml("backend: plonk\n").is_err());
    }

    #[test]
    fn report_path_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rxzk.yaml");
        std::fs::write(&path, "report_path: out/report.json\n").unwrap();
        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.report_path, Some(dir.path().join("out/report.json")));
    }

    #[test]
    fn environment_overrides_configured_policy() {
        let config = CliConfig {
            policy: Some(PolicyMode::Development),
            ..CliConfig::default()
        };
        let policy = config.policy_with_override(Some("production")).unwrap();
        assert_eq!(policy.mode(), PolicyMode::Production);
        let policy = config.policy_with_override(None).unwrap();
        assert_eq!(policy.mode(), PolicyMode::Development);
        assert!(config.policy_with_override(Some("staging")).is_err());
    }
}
