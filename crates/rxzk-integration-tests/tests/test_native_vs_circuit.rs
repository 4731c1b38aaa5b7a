//! # Native Evaluation vs. Circuit
//!
//! Property tests tying the constraint system to the plain-Rust reading of
//! the prescription rules: a witness exists exactly when the native
//! evaluation is satisfiable, and a violation is attributed to the same
//! check the native evaluation fails first.

use proptest::prelude::*;
use rxzk_core::FieldElement;
use rxzk_harness::baseline;
use rxzk_zkp::{
    build_witness, PrescriptionAssignment, PrescriptionCheck, PrescriptionCircuit, WitnessError,
    COMPARATOR_BITS,
};

fn fe(v: u64) -> FieldElement {
    FieldElement::from_u64(v)
}

fn arb_age() -> impl Strategy<Value = FieldElement> {
    prop_oneof![
        8 => (0u64..200).prop_map(fe),
        1 => (0u64..4).prop_map(|k| FieldElement::pow2(COMPARATOR_BITS) + fe(k)),
    ]
}

prop_compose! {
    fn arb_assignment()(
        wrong_secret in proptest::bool::weighted(0.15),
        source_id in prop_oneof![6 => Just(1u64), 1 => 2u64..5],
        authorized in prop_oneof![6 => Just(1u64), 1 => 2u64..5],
        data_age in arb_age(),
        delta_max in arb_age(),
        allergy in 0u64..4,
        medication in 0u64..4,
        outcome in 0u64..2,
    ) -> PrescriptionAssignment {
        let mut a = baseline();
        if wrong_secret {
            a.doctor_secret = fe(999);
        }
        a.source_id = fe(source_id);
        a.authorized_action = fe(authorized);
        a.data_age = data_age;
        a.delta_max = delta_max;
        a.allergy_class_id = fe(allergy);
        a.medication_class_id = fe(medication);
        a.outcome = fe(outcome);
        a
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn witness_exists_iff_native_checks_pass(assignment in arb_assignment()) {
        let native = assignment.evaluate();
        match build_witness(&PrescriptionCircuit::new(assignment.clone())) {
            Ok(witness) => {
                prop_assert!(native.is_satisfiable());
                prop_assert_eq!(witness.public_inputs(), &assignment.public_inputs());
            }
            Err(WitnessError::ConstraintViolation { label, .. }) => {
                prop_assert_eq!(PrescriptionCheck::from_label(&label), native.first_failure(), "{}", label);
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn honest_outcome_is_always_provable(
        data_age in 0u64..200,
        delta_max in 0u64..200,
        allergy in 0u64..4,
        medication in 0u64..4,
    ) {
        let mut a = baseline();
        a.data_age = fe(data_age);
        a.delta_max = fe(delta_max);
        a.allergy_class_id = fe(allergy);
        a.medication_class_id = fe(medication);
        a.outcome = FieldElement::from(data_age < delta_max && allergy != medication);
        prop_assert!(build_witness(&PrescriptionCircuit::new(a)).is_ok());
    }
}
