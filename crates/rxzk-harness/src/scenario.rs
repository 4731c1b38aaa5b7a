//! # Scenario Model
//!
//! A [`Scenario`] is a named statement about the pipeline together with
//! the outcome it must produce. Fresh scenarios carry a full signal
//! assignment; binding probes reuse the proof of an earlier fresh scenario.

use serde::{Deserialize, Serialize};

use rxzk_core::{FieldElement, WitnessInput};
use rxzk_zkp::{PrescriptionCheck, PublicSignal};

/// The security property a scenario evidences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityProperty {
    /// True statements have proofs that verify.
    Completeness,
    /// False statements about hard checks have no witness.
    Soundness,
    /// The declared outcome must equal the computed one.
    OutcomeIntegrity,
    /// A proof does not verify for any other public input vector.
    ReplayBinding,
    /// A proof does not verify under any other verification key.
    KeyBinding,
}

impl SecurityProperty {
    /// Report order.
    pub const ALL: [SecurityProperty; 5] = [
        SecurityProperty::Completeness,
        SecurityProperty::Soundness,
        SecurityProperty::OutcomeIntegrity,
        SecurityProperty::ReplayBinding,
        SecurityProperty::KeyBinding,
    ];

    /// Kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Soundness => "soundness",
            Self::OutcomeIntegrity => "outcome-integrity",
            Self::ReplayBinding => "replay-binding",
            Self::KeyBinding => "key-binding",
        }
    }
}

impl std::fmt::Display for SecurityProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a scenario must observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// A witness exists, the proof verifies.
    Accept,
    /// No satisfying assignment exists.
    RejectWitness,
    /// The proof exists but verification returns false.
    RejectVerification,
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::RejectWitness => "reject-witness",
            Self::RejectVerification => "reject-verification",
        })
    }
}

/// What a scenario actually observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    /// Witness built, proof verified.
    Accepted,
    /// Witness construction found an unsatisfied constraint.
    WitnessRejected {
        /// The check owning the constraint, when the label maps to one.
        check: Option<PrescriptionCheck>,
        /// Namespaced constraint label.
        label: String,
    },
    /// Verification returned false.
    VerificationRejected,
    /// The scenario could not be evaluated (malformed input, backend
    /// failure, missing source proof). Never satisfies an expectation.
    Error {
        /// What went wrong.
        message: String,
    },
}

impl Observation {
    /// Whether this observation is the one `expectation` asks for.
    pub fn satisfies(&self, expectation: Expectation) -> bool {
        matches!(
            (self, expectation),
            (Self::Accepted, Expectation::Accept)
                | (Self::WitnessRejected { .. }, Expectation::RejectWitness)
                | (Self::VerificationRejected, Expectation::RejectVerification)
        )
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::WitnessRejected {
                check: Some(check), ..
            } => write!(f, "witness rejected ({check})"),
            Self::WitnessRejected { label, .. } => write!(f, "witness rejected ({label})"),
            Self::VerificationRejected => f.write_str("verification rejected"),
            Self::Error { message } => write!(f, "error: {message}"),
        }
    }
}

/// How a scenario is driven.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioKind {
    /// Build a witness from this assignment, prove, verify.
    Fresh(WitnessInput),
    /// Re-verify the proof of `source` against a copy of its public vector
    /// with `coordinate` replaced.
    Replay {
        source: String,
        coordinate: PublicSignal,
        replacement: FieldElement,
    },
    /// Re-verify the proof of `source` under a verification key whose
    /// `constant`-th public-input commitment was altered.
    KeySubstitution { source: String, constant: usize },
}

impl ScenarioKind {
    /// The fresh scenario a probe depends on.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Fresh(_) => None,
            Self::Replay { source, .. } | Self::KeySubstitution { source, .. } => Some(source),
        }
    }
}

/// A named scenario and its expected outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub property: SecurityProperty,
    pub expectation: Expectation,
    pub kind: ScenarioKind,
}

impl Scenario {
    /// A fresh witness/prove/verify scenario.
    pub fn fresh(
        name: impl Into<String>,
        property: SecurityProperty,
        expectation: Expectation,
        input: WitnessInput,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            property,
            expectation,
            kind: ScenarioKind::Fresh(input),
        }
    }

    /// A replay probe; always expects verification to fail.
    pub fn replay(
        name: impl Into<String>,
        source: impl Into<String>,
        coordinate: PublicSignal,
        replacement: FieldElement,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            property: SecurityProperty::ReplayBinding,
            expectation: Expectation::RejectVerification,
            kind: ScenarioKind::Replay {
                source: source.into(),
                coordinate,
                replacement,
            },
        }
    }

    /// A key-substitution probe; always expects verification to fail.
    pub fn key_substitution(
        name: impl Into<String>,
        source: impl Into<String>,
        constant: usize,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            property: SecurityProperty::KeyBinding,
            expectation: Expectation::RejectVerification,
            kind: ScenarioKind::KeySubstitution {
                source: source.into(),
                constant,
            },
        }
    }

    /// Attach a human-readable description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this scenario reuses another scenario's proof.
    pub fn is_probe(&self) -> bool {
        self.kind.source().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_matching() {
        let rejected = Observation::WitnessRejected {
            check: Some(PrescriptionCheck::TrustedSource),
            label: "trusted_source/matches_public_hash".into(),
        };
        assert!(rejected.satisfies(Expectation::RejectWitness));
        assert!(!rejected.satisfies(Expectation::Accept));
        assert!(Observation::Accepted.satisfies(Expectation::Accept));
        assert!(Observation::VerificationRejected.satisfies(Expectation::RejectVerification));
        for e in [Expectation::Accept, Expectation::RejectWitness, Expectation::RejectVerification] {
            assert!(!Observation::error("boom").satisfies(e));
        }
    }

    #[test]
    fn observation_serializes_tagged() {
        let json = serde_json::to_value(Observation::WitnessRejected {
            check: Some(PrescriptionCheck::OutcomeBinding),
            label: "outcome/declared_matches_computed".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "witness_rejected");
        assert_eq!(json["check"], "outcome_binding");
    }

    #[test]
    fn probes_name_their_source() {
        let probe = Scenario::key_substitution("k", "valid", 0);
        assert!(probe.is_probe());
        assert_eq!(probe.kind.source(), Some("valid"));
        assert_eq!(probe.property, SecurityProperty::KeyBinding);
        let fresh = Scenario::fresh("f", SecurityProperty::Completeness, Expectation::Accept, WitnessInput::new());
        assert!(!fresh.is_probe());
    }

    #[test]
    fn property_names() {
        assert_eq!(SecurityProperty::OutcomeIntegrity.to_string(), "outcome-integrity");
        assert_eq!(
            serde_json::to_string(&SecurityProperty::ReplayBinding).unwrap(),
            "\"replay-binding\""
        );
    }
}
