// SPDX-License-Identifier: Apache-2.0

//! Simulation-based equivalence checking between two networks with matching
//! interfaces. Exhaustive (and therefore a proof) up to
//! `MAX_EXHAUSTIVE_INPUTS` inputs; random-pattern testing beyond that.

use std::time::Instant;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::aig::Aig;
use crate::aig_sim::{exhaustive_truth_tables, random_simulate, MAX_EXHAUSTIVE_INPUTS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivOptions {
    /// Number of 64-pattern words simulated when exhaustive checking is not
    /// possible.
    pub random_rounds: usize,
    pub seed: u64,
}

impl Default for EquivOptions {
    fn default() -> Self {
        Self {
            random_rounds: 256,
            seed: 0,
        }
    }
}

pub fn check_equivalence(lhs: &Aig, rhs: &Aig, options: &EquivOptions) -> Result<(), String> {
    if lhs.num_pis() != rhs.num_pis() {
        return Err(format!(
            "input count mismatch: {} vs {}",
            lhs.num_pis(),
            rhs.num_pis()
        ));
    }
    if lhs.num_pos() != rhs.num_pos() {
        return Err(format!(
            "output count mismatch: {} vs {}",
            lhs.num_pos(),
            rhs.num_pos()
        ));
    }

    let start = Instant::now();
    let result = if lhs.num_pis() <= MAX_EXHAUSTIVE_INPUTS {
        let lhs_tables = exhaustive_truth_tables(lhs);
        let rhs_tables = exhaustive_truth_tables(rhs);
        compare_words(&lhs_tables, &rhs_tables, "exhaustive row block")
    } else {
        let mut lhs_rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);
        let mut rhs_rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);
        let lhs_rounds = random_simulate(lhs, options.random_rounds, &mut lhs_rng);
        let rhs_rounds = random_simulate(rhs, options.random_rounds, &mut rhs_rng);
        // Rounds are indexed [round][output]; compare output-major.
        let transpose = |rounds: &[Vec<u64>]| -> Vec<Vec<u64>> {
            (0..lhs.num_pos())
                .map(|o| rounds.iter().map(|round| round[o]).collect())
                .collect()
        };
        compare_words(&transpose(&lhs_rounds), &transpose(&rhs_rounds), "random round")
    };
    log::debug!(
        "check_equivalence: {} inputs, {} outputs, {} in {:?}",
        lhs.num_pis(),
        lhs.num_pos(),
        if result.is_ok() { "equivalent" } else { "different" },
        start.elapsed()
    );
    result
}

fn compare_words(lhs: &[Vec<u64>], rhs: &[Vec<u64>], unit: &str) -> Result<(), String> {
    for (output, (l, r)) in lhs.iter().zip(rhs).enumerate() {
        for (index, (lw, rw)) in l.iter().zip(r).enumerate() {
            if lw != rw {
                let lane = (lw ^ rw).trailing_zeros();
                return Err(format!(
                    "output {} differs in {} {} (lane {}): {:#018x} vs {:#018x}",
                    output, unit, index, lane, lw, rw
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor_pair() -> (Aig, Aig) {
        let mut lhs = Aig::new();
        let a = lhs.create_pi();
        let b = lhs.create_pi();
        let f = lhs.create_xor(a, b);
        lhs.create_po(f);

        // (a | b) & !(a & b)
        let mut rhs = Aig::new();
        let a = rhs.create_pi();
        let b = rhs.create_pi();
        let or = rhs.create_or(a, b);
        let and = rhs.create_and(a, b);
        let f = rhs.create_and(or, !and);
        rhs.create_po(f);
        (lhs, rhs)
    }

    #[test]
    fn test_equivalent_forms_of_xor() {
        let (lhs, rhs) = xor_pair();
        assert_eq!(check_equivalence(&lhs, &rhs, &EquivOptions::default()), Ok(()));
    }

    #[test]
    fn test_detects_difference() {
        let (lhs, mut rhs) = xor_pair();
        let a = rhs.pi_at(0);
        let b = rhs.pi_at(1);
        let g = rhs.create_and(a.into(), b.into());
        let old = rhs.po_at(0).node;
        rhs.replace_in_outputs(old, g);
        let err = check_equivalence(&lhs, &rhs, &EquivOptions::default()).unwrap_err();
        assert!(err.contains("output 0 differs"), "{}", err);
    }

    #[test]
    fn test_interface_mismatch() {
        let (lhs, mut rhs) = xor_pair();
        rhs.create_pi();
        let err = check_equivalence(&lhs, &rhs, &EquivOptions::default()).unwrap_err();
        assert!(err.contains("input count mismatch"), "{}", err);
    }

    #[test]
    fn test_random_mode_for_wide_networks() {
        let mut lhs = Aig::new();
        let inputs: Vec<_> = (0..20).map(|_| lhs.create_pi()).collect();
        let mut acc = inputs[0];
        for input in &inputs[1..] {
            acc = lhs.create_or(acc, *input);
        }
        lhs.create_po(acc);
        let rhs = lhs.clone();
        let options = EquivOptions {
            random_rounds: 8,
            seed: 3,
        };
        assert_eq!(check_equivalence(&lhs, &rhs, &options), Ok(()));
    }
}
