//! # Standard Scenario Catalog
//!
//! The reference scenarios: one honest prescription, every single-fact
//! deviation from it, the freshness and comparator-range boundaries, and
//! binding probes against the honest proofs.
//!
//! Public commitments are always computed for the *registered* credential
//! (`doctorId = 123`, `doctorSecret = 456`) and source (`sourceId = 1`), so
//! a scenario that changes a private value keeps the public hash fixed.

use rxzk_core::FieldElement;
use rxzk_zkp::{PrescriptionAssignment, PublicSignal, COMPARATOR_BITS};

use crate::scenario::{Expectation, Scenario, SecurityProperty};

pub const DOCTOR_ID: u64 = 123;
pub const DOCTOR_SECRET: u64 = 456;
pub const SOURCE_ID: u64 = 1;
pub const ACTION: u64 = 1;
pub const DATA_AGE: u64 = 30;
pub const DELTA_MAX: u64 = 60;
pub const ALLERGY_CLASS: u64 = 2;
pub const MEDICATION_CLASS: u64 = 5;

/// Name of the honest accept scenario most probes reuse.
pub const VALID: &str = "valid-prescription";
/// Name of the honest reject scenario probed for outcome replay.
pub const HONEST_CONTRAINDICATION: &str = "contraindication-honest-reject";

fn fe(v: u64) -> FieldElement {
    FieldElement::from_u64(v)
}

/// The honest, accepted assignment every other scenario deviates from.
pub fn baseline() -> PrescriptionAssignment {
    PrescriptionAssignment {
        doctor_credential_hash: rxzk_crypto::commit(&[fe(DOCTOR_ID), fe(DOCTOR_SECRET)]),
        trusted_source_hash: rxzk_crypto::commit(&[fe(SOURCE_ID)]),
        required_action: fe(ACTION),
        delta_max: fe(DELTA_MAX),
        outcome: FieldElement::one(),
        doctor_id: fe(DOCTOR_ID),
        doctor_secret: fe(DOCTOR_SECRET),
        authorized_action: fe(ACTION),
        source_id: fe(SOURCE_ID),
        data_age: fe(DATA_AGE),
        allergy_class_id: fe(ALLERGY_CLASS),
        medication_class_id: fe(MEDICATION_CLASS),
    }
}

fn variant<F>(declared: u64, edit: F) -> PrescriptionAssignment
where
    F: FnOnce(&mut PrescriptionAssignment),
{
    let mut a = baseline();
    a.outcome = fe(declared);
    edit(&mut a);
    a
}

fn fresh(
    name: &str,
    property: SecurityProperty,
    expectation: Expectation,
    assignment: PrescriptionAssignment,
    description: &str,
) -> Scenario {
    Scenario::fresh(name, property, expectation, assignment.to_input()).describe(description)
}

/// A public vector coordinate value guaranteed to differ from `original`.
fn tampered(signal: PublicSignal, original: FieldElement) -> FieldElement {
    match signal {
        PublicSignal::Outcome => FieldElement::one() - original,
        _ => original + FieldElement::one(),
    }
}

/// The standard catalog, in report order.
pub fn standard_catalog() -> Vec<Scenario> {
    use Expectation::*;
    use SecurityProperty::*;

    let range_limit = FieldElement::pow2(COMPARATOR_BITS);

    let mut scenarios = vec![
        fresh(VALID, Completeness, Accept, baseline(),
            "registered doctor, trusted source, fresh data, no contraindication, outcome 1"),
        fresh("wrong-doctor-secret", Soundness, RejectWitness,
            variant(1, |a| a.doctor_secret = fe(999)),
            "doctorSecret 999 does not open the registered credential"),
        fresh("untrusted-source", Soundness, RejectWitness,
            variant(1, |a| a.source_id = fe(99)),
            "sourceId 99 while the public commitment is for source 1"),
        fresh("unauthorized-action-declared-accept", Soundness, RejectWitness,
            variant(1, |a| a.authorized_action = fe(ACTION + 1)),
            "authorization mismatch cannot be proven as an accept"),
        fresh("unauthorized-action-declared-reject", Soundness, RejectWitness,
            variant(0, |a| a.authorized_action = fe(ACTION + 1)),
            "authorization mismatch cannot be proven as a reject either"),
        fresh("stale-data-declared-accept", OutcomeIntegrity, RejectWitness,
            variant(1, |a| {
                a.data_age = fe(100);
                a.delta_max = fe(90);
            }),
            "dataAge 100 >= deltaMax 90 yet outcome 1 is declared"),
        fresh("stale-data-honest-reject", Completeness, Accept,
            variant(0, |a| {
                a.data_age = fe(100);
                a.delta_max = fe(90);
            }),
            "stale data with outcome 0 is a provable reject"),
        fresh(HONEST_CONTRAINDICATION, Completeness, Accept,
            variant(0, |a| {
                a.allergy_class_id = fe(ALLERGY_CLASS);
                a.medication_class_id = fe(ALLERGY_CLASS);
            }),
            "allergy class equals medication class, outcome 0"),
        fresh("contraindication-declared-accept", OutcomeIntegrity, RejectWitness,
            variant(1, |a| {
                a.allergy_class_id = fe(ALLERGY_CLASS);
                a.medication_class_id = fe(ALLERGY_CLASS);
            }),
            "allergy class equals medication class yet outcome 1 is declared"),
        fresh("valid-declared-reject", OutcomeIntegrity, RejectWitness,
            variant(0, |_| {}),
            "every check passes but outcome 0 is declared"),
        fresh("freshness-boundary-just-fresh", Completeness, Accept,
            variant(1, |a| a.data_age = fe(DELTA_MAX - 1)),
            "dataAge = deltaMax - 1 is fresh"),
        fresh("freshness-boundary-equal-declared-accept", OutcomeIntegrity, RejectWitness,
            variant(1, |a| a.data_age = fe(DELTA_MAX)),
            "dataAge = deltaMax is not fresh (strict inequality)"),
        fresh("freshness-boundary-equal-honest-reject", Completeness, Accept,
            variant(0, |a| a.data_age = fe(DELTA_MAX)),
            "dataAge = deltaMax with outcome 0 is a provable reject"),
        fresh("comparator-range-data-age", Soundness, RejectWitness,
            variant(0, |a| a.data_age = range_limit),
            "dataAge = 2^32 is outside the comparator range"),
        fresh("comparator-range-delta-max", Soundness, RejectWitness,
            variant(1, |a| a.delta_max = range_limit),
            "deltaMax = 2^32 would wrap an unchecked comparator into fresh"),
    ];

    let valid_publics = baseline().public_inputs();
    for signal in PublicSignal::ORDER {
        let original = valid_publics.as_slice()[signal.index()];
        scenarios.push(
            Scenario::replay(format!("replay-{}", signal.name()), VALID, signal, tampered(signal, original))
                .describe(format!("valid proof re-verified with {} altered", signal.name())),
        );
    }
    scenarios.push(
        Scenario::replay(
            "replay-honest-reject-as-accept",
            HONEST_CONTRAINDICATION,
            PublicSignal::Outcome,
            FieldElement::one(),
        )
        .describe("honest reject proof re-verified with outcome flipped to 1"),
    );

    let last_constant = PublicSignal::ORDER.len();
    scenarios.push(
        Scenario::key_substitution("key-substitution-constant-term", VALID, 0)
            .describe("valid proof under a key with IC[0] altered"),
    );
    scenarios.push(
        Scenario::key_substitution("key-substitution-outcome-term", VALID, last_constant)
            .describe("valid proof under a key with the outcome commitment altered"),
    );

    scenarios
}
