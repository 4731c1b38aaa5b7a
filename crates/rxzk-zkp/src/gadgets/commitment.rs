//! In-circuit MiMC-7 commitment.
//!
//! Mirrors [`rxzk_crypto::commit`] exactly: the same round constants, the
//! same Miyaguchi–Preneel chaining. Each round raises `t = state + k + c_i`
//! to the seventh power with four multiplications (`t²`, `t⁴`, `t⁶`, `t⁷`).

use rxzk_core::FieldElement;
use rxzk_crypto::round_constants;

use super::{mul, Num};
use crate::r1cs::{ConstraintSystem, SynthesisError};

/// Constraints emitted per absorbed element.
pub fn constraints_per_block() -> usize {
    4 * round_constants().len()
}

/// `E_k(x)` inside the circuit.
pub fn mimc7_encrypt(
    cs: &mut ConstraintSystem,
    x: &Num,
    k: &Num,
) -> Result<Num, SynthesisError> {
    let mut state = x.clone();
    for (i, c) in round_constants().iter().enumerate() {
        state = cs.namespace(&format!("round{i}"), |cs| {
            let t = state.add(k).add(&Num::constant(*c));
            let t2 = mul(cs, "t2", &t, &t)?;
            let t4 = mul(cs, "t4", &t2, &t2)?;
            let t6 = mul(cs, "t6", &t4, &t2)?;
            mul(cs, "t7", &t6, &t)
        })?;
    }
    Ok(state.add(k))
}

/// Commit to `inputs` in order.
pub fn mimc_commit(cs: &mut ConstraintSystem, inputs: &[Num]) -> Result<Num, SynthesisError> {
    let mut h = Num::constant(FieldElement::zero());
    for (j, x) in inputs.iter().enumerate() {
        let encrypted = cs.namespace(&format!("block{j}"), |cs| mimc7_encrypt(cs, x, &h))?;
        h = h.add(x).add(&encrypted);
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gadgets::alloc_hint;
    use crate::r1cs::SynthesisMode;
    use proptest::prelude::*;

    #[test]
    fn matches_native_commitment() {
        let id = FieldElement::from_u64(123);
        let secret = FieldElement::from_u64(456);

        let mut cs = ConstraintSystem::new(SynthesisMode::Witness);
        let a = alloc_hint(&mut cs, "id", Some(id)).unwrap();
        let b = alloc_hint(&mut cs, "secret", Some(secret)).unwrap();
        let h = mimc_commit(&mut cs, &[a, b]).unwrap();

        assert_eq!(h.value(), Some(rxzk_crypto::commit(&[id, secret])));
        assert!(cs.which_is_unsatisfied().is_none());
        assert_eq!(cs.num_constraints(), 2 * constraints_per_block());
    }

    #[test]
    fn labels_are_namespaced_by_block_and_round() {
        let mut cs = ConstraintSystem::new(SynthesisMode::Setup);
        let x = alloc_hint(&mut cs, "x", None).unwrap();
        mimc_commit(&mut cs, &[x]).unwrap();
        let shape = cs.finish("mimc").unwrap().shape;
        assert_eq!(shape.constraints()[0].label, "block0/round0/t2");
        assert_eq!(
            shape.constraints().last().map(|c| c.label.as_str()),
            Some("block0/round90/t7")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn gadget_agrees_with_native_on_any_inputs(
            raw in prop::collection::vec(any::<[u8; 32]>(), 1..=4)
        ) {
            let inputs: Vec<FieldElement> = raw
                .iter()
                .map(|bytes| FieldElement::from_le_bytes_mod_order(bytes))
                .collect();

            let mut cs = ConstraintSystem::new(SynthesisMode::Witness);
            let nums = inputs
                .iter()
                .enumerate()
                .map(|(i, x)| alloc_hint(&mut cs, &format!("x{i}"), Some(*x)))
                .collect::<Result<Vec<_>, _>>()
                .unwrap();
            let h = mimc_commit(&mut cs, &nums).unwrap();

            prop_assert_eq!(h.value(), Some(rxzk_crypto::commit(&inputs)));
            prop_assert!(cs.which_is_unsatisfied().is_none());
            prop_assert_eq!(cs.num_constraints(), inputs.len() * constraints_per_block());
        }
    }
}
