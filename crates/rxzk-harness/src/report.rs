//! # Scenario Report
//!
//! The explicit, returned result of one harness run. Records are assembled
//! per scenario and merged once at the end; nothing is logged into shared
//! state during the run.
//!
//! The report digest covers only the verdict of each record (name,
//! property, expectation, observation, pass flag). Timing and run identity
//! are excluded, so two runs of the same catalog that observe the same
//! behavior produce the same digest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rxzk_core::{sha256_hex, CanonicalBytes};

use crate::error::HarnessError;
use crate::scenario::{Expectation, Observation, SecurityProperty};

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub name: String,
    pub property: SecurityProperty,
    pub expected: Expectation,
    pub observed: Observation,
    pub passed: bool,
    pub elapsed_ms: u64,
}

impl ScenarioRecord {
    /// A record whose pass flag is derived from `observed`.
    pub fn new(
        name: impl Into<String>,
        property: SecurityProperty,
        expected: Expectation,
        observed: Observation,
        elapsed_ms: u64,
    ) -> Self {
        let passed = observed.satisfies(expected);
        Self {
            name: name.into(),
            property,
            expected,
            observed,
            passed,
            elapsed_ms,
        }
    }
}

#[derive(Serialize)]
struct Verdict<'a> {
    name: &'a str,
    property: SecurityProperty,
    expected: Expectation,
    observed: &'a Observation,
    passed: bool,
}

/// Pass count for one security property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub property: SecurityProperty,
    pub total: usize,
    pub passed: usize,
}

/// Aggregated outcome of a harness run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub run_id: Uuid,
    pub backend: String,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ScenarioRecord>,
    pub summary: Vec<PropertySummary>,
    pub all_passed: bool,
    /// SHA-256 over the canonical verdict list.
    pub digest: String,
}

impl ScenarioReport {
    /// Assemble a report from records already in catalog order.
    pub fn new(backend: impl Into<String>, records: Vec<ScenarioRecord>) -> Result<Self, HarnessError> {
        let summary = SecurityProperty::ALL
            .iter()
            .filter_map(|property| {
                let matching: Vec<_> = records.iter().filter(|r| r.property == *property).collect();
                (!matching.is_empty()).then(|| PropertySummary {
                    property: *property,
                    total: matching.len(),
                    passed: matching.iter().filter(|r| r.passed).count(),
                })
            })
            .collect();
        let verdicts: Vec<Verdict<'_>> = records
            .iter()
            .map(|r| Verdict {
                name: &r.name,
                property: r.property,
                expected: r.expected,
                observed: &r.observed,
                passed: r.passed,
            })
            .collect();
        let digest = sha256_hex(&CanonicalBytes::new(&verdicts)?);
        Ok(Self {
            run_id: Uuid::new_v4(),
            backend: backend.into(),
            generated_at: Utc::now(),
            all_passed: records.iter().all(|r| r.passed),
            records,
            summary,
            digest,
        })
    }

    /// Record by scenario name.
    pub fn record(&self, name: &str) -> Option<&ScenarioRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Records that diverged from their expectation.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter().filter(|r| !r.passed)
    }

    /// Pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text table for terminals.
    pub fn render_text(&self) -> String {
        let width = self
            .records
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0);
        let mut out = format!(
            "run {} · backend {} · {}\n\n",
            self.run_id,
            self.backend,
            self.generated_at.to_rfc3339()
        );
        for r in &self.records {
            out.push_str(&format!(
                "{} {:<width$}  {:<18} expected {:<20} observed {}\n",
                if r.passed { "PASS" } else { "FAIL" },
                r.name,
                r.property.as_str(),
                r.expected.to_string(),
                r.observed,
            ));
        }
        out.push('\n');
        for s in &self.summary {
            out.push_str(&format!("{:<18} {}/{}\n", s.property.as_str(), s.passed, s.total));
        }
        let total = self.records.len();
        let passed = total - self.failures().count();
        out.push_str(&format!("\n{passed}/{total} scenarios passed · digest {}\n", self.digest));
        out
    }
}
