//! # Scenario Runner
//!
//! Drives a catalog through one backend:
//!
//! 1. Policy check and a single key generation for the circuit shape.
//! 2. Fresh scenarios, independently (in parallel on the rayon pool when
//!    enabled). Each produces its own record; accepted scenarios also hand
//!    back their `(proof, public vector)` artifact.
//! 3. Binding probes, after every fresh scenario, each against a copy of
//!    its source artifact.
//! 4. Records merged in catalog order into a [`ScenarioReport`].
//!
//! A setup failure aborts the run. Everything else (a violation, a
//! mismatch, even a backend error inside one scenario) is recorded and
//! compared against the scenario's expectation.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rayon::prelude::*;

use rxzk_core::PublicInputVector;
use rxzk_zkp::{
    build_witness, synthesize_shape, PrescriptionCheck, PrescriptionCircuit, ProofPolicy,
    ProofSystem, SetupError, WitnessError,
};

use crate::error::HarnessError;
use crate::report::{ScenarioRecord, ScenarioReport};
use crate::scenario::{Observation, Scenario, ScenarioKind};

/// A proof and the public vector it was produced for.
type Artifact<P> = (P, PublicInputVector);

/// Runs scenarios against one backend.
#[derive(Debug)]
pub struct ScenarioRunner<S: ProofSystem> {
    system: S,
    policy: ProofPolicy,
    parallel: bool,
}

impl<S: ProofSystem> ScenarioRunner<S> {
    /// A runner with parallel fresh scenarios.
    pub fn new(system: S, policy: ProofPolicy) -> Self {
        Self {
            system,
            policy,
            parallel: true,
        }
    }

    /// Enable or disable parallel execution of fresh scenarios.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run `scenarios` and return the report.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Setup`] when the policy refuses the backend or key
    /// generation fails; [`HarnessError::DuplicateScenario`] when two
    /// scenarios share a name.
    pub fn run(&self, scenarios: &[Scenario]) -> Result<ScenarioReport, HarnessError> {
        let mut seen = HashSet::new();
        if let Some(dup) = scenarios.iter().find(|s| !seen.insert(s.name.as_str())) {
            return Err(HarnessError::DuplicateScenario(dup.name.clone()));
        }

        let backend = self.system.backend();
        self.policy.validate(backend).map_err(SetupError::from)?;
        let shape = synthesize_shape(&PrescriptionCircuit::blank())?;
        let (pk, vk) = self.system.setup(&shape)?;
        tracing::info!(
            backend = %backend,
            scenarios = scenarios.len(),
            parallel = self.parallel,
            "running scenario catalog"
        );

        let fresh: Vec<(usize, &Scenario)> = scenarios
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_probe())
            .collect();
        let fresh_results: Vec<(usize, ScenarioRecord, Option<Artifact<S::Proof>>)> =
            if self.parallel {
                fresh
                    .par_iter()
                    .map(|(i, s)| self.run_fresh(*i, s, &pk, &vk))
                    .collect()
            } else {
                fresh
                    .iter()
                    .map(|(i, s)| self.run_fresh(*i, s, &pk, &vk))
                    .collect()
            };

        let mut slots: Vec<Option<ScenarioRecord>> = vec![None; scenarios.len()];
        let mut artifacts: HashMap<&str, Artifact<S::Proof>> = HashMap::new();
        for (index, record, artifact) in fresh_results {
            if let Some(artifact) = artifact {
                artifacts.insert(scenarios[index].name.as_str(), artifact);
            }
            slots[index] = Some(record);
        }

        for (index, scenario) in scenarios.iter().enumerate().filter(|(_, s)| s.is_probe()) {
            slots[index] = Some(self.run_probe(scenario, &vk, &artifacts));
        }

        let records: Vec<ScenarioRecord> = slots.into_iter().flatten().collect();
        let report = ScenarioReport::new(backend.name(), records)?;
        tracing::info!(
            all_passed = report.all_passed,
            failures = report.failures().count(),
            digest = %report.digest,
            "scenario catalog finished"
        );
        Ok(report)
    }

    fn run_fresh(
        &self,
        index: usize,
        scenario: &Scenario,
        pk: &S::ProvingKey,
        vk: &S::VerifyingKey,
    ) -> (usize, ScenarioRecord, Option<Artifact<S::Proof>>) {
        let started = Instant::now();
        let (observed, artifact) = match &scenario.kind {
            ScenarioKind::Fresh(input) => self.prove_and_verify(input, pk, vk),
            _ => (Observation::error("not a fresh scenario"), None),
        };
        let record = self.finish(scenario, observed, started);
        let artifact = artifact.filter(|_| record.observed == Observation::Accepted);
        (index, record, artifact)
    }

    fn prove_and_verify(
        &self,
        input: &rxzk_core::WitnessInput,
        pk: &S::ProvingKey,
        vk: &S::VerifyingKey,
    ) -> (Observation, Option<Artifact<S::Proof>>) {
        let circuit = match PrescriptionCircuit::from_input(input) {
            Ok(c) => c,
            Err(e) => return (Observation::error(e.to_string()), None),
        };
        let witness = match build_witness(&circuit) {
            Ok(w) => w,
            Err(WitnessError::ConstraintViolation { label, .. }) => {
                let check = PrescriptionCheck::from_label(&label);
                return (Observation::WitnessRejected { check, label }, None);
            }
            Err(e) => return (Observation::error(e.to_string()), None),
        };
        let (proof, publics) = match self.system.prove(pk, &witness) {
            Ok(p) => p,
            Err(e) => return (Observation::error(e.to_string()), None),
        };
        match self.system.verify(vk, &publics, &proof) {
            Ok(true) => (Observation::Accepted, Some((proof, publics))),
            Ok(false) => (Observation::VerificationRejected, None),
            Err(e) => (Observation::error(e.to_string()), None),
        }
    }

    fn run_probe(
        &self,
        scenario: &Scenario,
        vk: &S::VerifyingKey,
        artifacts: &HashMap<&str, Artifact<S::Proof>>,
    ) -> ScenarioRecord {
        let started = Instant::now();
        let observed = match scenario.kind.source().map(|s| (s, artifacts.get(s))) {
            Some((_, Some((proof, publics)))) => self.probe(&scenario.kind, vk, proof, publics),
            Some((source, None)) => {
                Observation::error(format!("source scenario {source:?} produced no proof"))
            }
            None => Observation::error("not a binding probe"),
        };
        self.finish(scenario, observed, started)
    }

    fn probe(
        &self,
        kind: &ScenarioKind,
        vk: &S::VerifyingKey,
        proof: &S::Proof,
        publics: &PublicInputVector,
    ) -> Observation {
        let outcome = match kind {
            ScenarioKind::Replay {
                coordinate,
                replacement,
                ..
            } => publics
                .with_coordinate(coordinate.index(), *replacement)
                .map_err(|e| e.to_string())
                .and_then(|tampered| {
                    self.system
                        .verify(vk, &tampered, proof)
                        .map_err(|e| e.to_string())
                }),
            ScenarioKind::KeySubstitution { constant, .. } => self
                .system
                .perturb_verifying_key(vk, *constant)
                .and_then(|altered| self.system.verify(&altered, publics, proof))
                .map_err(|e| e.to_string()),
            ScenarioKind::Fresh(_) => Err("not a binding probe".to_string()),
        };
        match outcome {
            Ok(true) => Observation::Accepted,
            Ok(false) => Observation::VerificationRejected,
            Err(message) => Observation::Error { message },
        }
    }

    fn finish(&self, scenario: &Scenario, observed: Observation, started: Instant) -> ScenarioRecord {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let record = ScenarioRecord::new(
            scenario.name.clone(),
            scenario.property,
            scenario.expectation,
            observed,
            elapsed_ms,
        );
        if record.passed {
            tracing::debug!(scenario = %record.name, observed = %record.observed, elapsed_ms, "scenario passed");
        } else {
            tracing::warn!(
                scenario = %record.name,
                expected = %record.expected,
                observed = %record.observed,
                "scenario diverged from expectation"
            );
        }
        record
    }
}
