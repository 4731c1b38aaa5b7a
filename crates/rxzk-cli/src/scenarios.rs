//! # Scenarios Subcommand
//!
//! Runs the standard scenario catalog against the selected backend, prints
//! the report and optionally persists it. Exit 0 iff every scenario's
//! observation matched its expectation.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use rxzk_harness::{standard_catalog, ScenarioReport, ScenarioRunner};
use rxzk_zkp::{MockProofSystem, ProofBackend, ProofPolicy, ProofSystem};

use crate::config::CliConfig;
use crate::write_json;

/// Arguments for `rxzk scenarios`.
#[derive(Args, Debug)]
pub struct ScenariosArgs {
    /// Proof backend (overrides the configured one).
    #[arg(long)]
    pub backend: Option<ProofBackend>,
    /// Run fresh scenarios one after another instead of on the thread pool.
    #[arg(long)]
    pub sequential: bool,
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the scenarios subcommand.
pub fn run_scenarios(args: &ScenariosArgs, config: &CliConfig) -> Result<u8> {
    let backend = args.backend.unwrap_or(config.backend);
    let policy = config.proof_policy()?;
    let parallel = config.parallel && !args.sequential;

    let report = match backend {
        ProofBackend::Mock => run_catalog(MockProofSystem::new(), policy, parallel)?,
        ProofBackend::Groth16 => run_groth16(policy, parallel)?,
    };

    if args.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print!("{}", report.render_text());
    }
    if let Some(path) = &config.report_path {
        persist(&report, path)?;
    }
    Ok(if report.all_passed { 0 } else { 1 })
}

fn run_catalog<S: ProofSystem>(system: S, policy: ProofPolicy, parallel: bool) -> Result<ScenarioReport> {
    ScenarioRunner::new(system, policy)
        .parallel(parallel)
        .run(&standard_catalog())
        .context("scenario run aborted")
}

#[cfg(feature = "groth16")]
fn run_groth16(policy: ProofPolicy, parallel: bool) -> Result<ScenarioReport> {
    run_catalog(rxzk_zkp::Groth16ProofSystem, policy, parallel)
}

#[cfg(not(feature = "groth16"))]
fn run_groth16(_policy: ProofPolicy, _parallel: bool) -> Result<ScenarioReport> {
    anyhow::bail!("rxzk was built without the groth16 feature")
}

fn persist(report: &ScenarioReport, path: &Path) -> Result<()> {
    write_json(path, report, "scenario report")?;
    tracing::info!(path = %path.display(), digest = %report.digest, "wrote scenario report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxzk_zkp::PolicyMode;

    fn config(policy: PolicyMode) -> CliConfig {
        CliConfig {
            policy: Some(policy),
            ..CliConfig::default()
        }
    }

    fn args(backend: Option<ProofBackend>) -> ScenariosArgs {
        ScenariosArgs {
            backend,
            sequential: true,
            json: false,
        }
    }

    #[test]
    fn mock_catalog_passes_and_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("scenarios.json");
        let config = CliConfig {
            report_path: Some(path.clone()),
            ..config(PolicyMode::Development)
        };
        assert_eq!(run_scenarios(&args(None), &config).unwrap(), 0);

        let report: ScenarioReport = crate::read_json(&path, "report").unwrap();
        assert!(report.all_passed);
        assert_eq!(report.records.len(), standard_catalog().len());
        assert_eq!(report.backend, ProofBackend::Mock.name());
    }

    #[test]
    fn production_policy_aborts_mock_run() {
        let err = run_scenarios(&args(Some(ProofBackend::Mock)), &config(PolicyMode::Production))
            .unwrap_err();
        assert!(format!("{err:#}").contains("scenario run aborted"));
    }

    #[cfg(not(feature = "groth16"))]
    #[test]
    fn groth16_requires_the_feature() {
        assert!(run_scenarios(&args(Some(ProofBackend::Groth16)), &config(PolicyMode::Development)).is_err());
    }
}
