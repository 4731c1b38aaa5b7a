//! # MiMC-7 Commitments
//!
//! The one-way commitment used for the doctor credential and the trusted
//! data source. Each round is a single power map `t ↦ t^7`, four rank-1
//! constraints inside the circuit.
//!
//! ## Construction
//!
//! ```text
//! E_k(x):   t_0 = x + k
//!           t_i = (t_{i-1})^7 + k + c_i        for i in 1..ROUNDS
//!           E_k(x) = (t_{ROUNDS-1})^7 + k
//!
//! commit(x_1..x_n):  h_0 = 0
//!                    h_j = h_{j-1} + x_j + E_{h_{j-1}}(x_j)
//! ```
//!
//! `c_0` is fixed to zero. The remaining constants are
//! `SHA256(MIMC_SEED || i_be32)` read little-endian and reduced mod `p`.
//!
//! The in-circuit gadget in `rxzk-zkp` reads the same constants through
//! [`round_constants()`] and must agree with [`commit`] exactly.

use std::sync::OnceLock;

use rxzk_core::{FieldElement, Sha256Accumulator};

/// Number of cipher rounds.
pub const MIMC_ROUNDS: usize = 91;

/// Exponent of the round power map. `gcd(7, p - 1) = 1` on BN254.
pub const MIMC_EXPONENT: u64 = 7;

/// Domain-separation seed for round-constant derivation.
pub const MIMC_SEED: &[u8] = b"rxzk.mimc7.bn254.round-constants.v1";

static ROUND_CONSTANTS: OnceLock<Vec<FieldElement>> = OnceLock::new();

/// The `MIMC_ROUNDS` round constants, `c_0 = 0`.
pub fn round_constants() -> &'static [FieldElement] {
    ROUND_CONSTANTS.get_or_init(|| {
        (0..MIMC_ROUNDS)
            .map(|i| {
                if i == 0 {
                    return FieldElement::zero();
                }
                let mut acc = Sha256Accumulator::new();
                acc.update(MIMC_SEED).update(&(i as u32).to_be_bytes());
                FieldElement::from_le_bytes_mod_order(&acc.finalize_bytes())
            })
            .collect()
    })
}

/// Encrypt `x` under key `k`.
pub fn mimc7_encrypt(x: FieldElement, k: FieldElement) -> FieldElement {
    let constants = round_constants();
    let mut state = x;
    for c in constants {
        state = (state + k + *c).pow(MIMC_EXPONENT);
    }
    state + k
}

/// Commit to a sequence of field elements.
pub fn commit(inputs: &[FieldElement]) -> FieldElement {
    inputs.iter().fold(FieldElement::zero(), |h, x| {
        h + *x + mimc7_encrypt(*x, h)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_fixed_and_distinct() {
        let c = round_constants();
        assert_eq!(c.len(), MIMC_ROUNDS);
        assert!(c[0].is_zero());
        assert!(c[1..].iter().all(|x| !x.is_zero()));
        let unique: std::collections::HashSet<_> = c.iter().collect();
        assert_eq!(unique.len(), MIMC_ROUNDS);
        assert!(std::ptr::eq(round_constants(), c));
    }

    #[test]
    fn commit_is_deterministic() {
        let a = commit(&[FieldElement::from_u64(123), FieldElement::from_u64(456)]);
        let b = commit(&[FieldElement::from_u64(123), FieldElement::from_u64(456)]);
        assert_eq!(a, b);
    }

    #[test]
    fn commit_separates_secrets() {
        let honest = commit(&[FieldElement::from_u64(123), FieldElement::from_u64(456)]);
        let forged = commit(&[FieldElement::from_u64(123), FieldElement::from_u64(999)]);
        assert_ne!(honest, forged);
    }

    #[test]
    fn commit_is_order_sensitive() {
        let a = commit(&[FieldElement::from_u64(1), FieldElement::from_u64(2)]);
        let b = commit(&[FieldElement::from_u64(2), FieldElement::from_u64(1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn single_block_matches_definition() {
        let x = FieldElement::from_u64(1);
        assert_eq!(commit(&[x]), x + mimc7_encrypt(x, FieldElement::zero()));
    }

    #[test]
    fn empty_commit_is_zero() {
        assert!(commit(&[]).is_zero());
    }
}
