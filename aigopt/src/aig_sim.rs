// SPDX-License-Identifier: Apache-2.0

//! Word-parallel simulation: every `u64` carries 64 independent input
//! patterns, one per bit lane.

use rand::Rng;

use crate::aig::topo::output_cone;
use crate::aig::{Aig, Signal};

/// Networks with at most this many inputs can be simulated exhaustively.
pub const MAX_EXHAUSTIVE_INPUTS: usize = 16;

fn signal_word(values: &[u64], signal: Signal) -> u64 {
    let value = values[signal.node.id];
    if signal.complemented {
        !value
    } else {
        value
    }
}

/// Simulates 64 patterns at once. `inputs[i]` holds the lanes of primary
/// input `i`; the result holds one word per primary output.
pub fn simulate_words(aig: &Aig, inputs: &[u64]) -> Vec<u64> {
    assert_eq!(
        inputs.len(),
        aig.num_pis(),
        "simulate_words: expected one word per primary input"
    );
    let mut values = vec![0u64; aig.size()];
    for (input, word) in aig.inputs().iter().zip(inputs) {
        values[input.id] = *word;
    }
    for node in output_cone(aig) {
        if let Some([a, b]) = aig.fanins(node) {
            values[node.id] = signal_word(&values, a) & signal_word(&values, b);
        }
    }
    aig.outputs()
        .iter()
        .map(|output| signal_word(&values, *output))
        .collect()
}

/// Evaluates a single input assignment.
pub fn eval_bools(aig: &Aig, inputs: &[bool]) -> Vec<bool> {
    let words: Vec<u64> = inputs.iter().map(|b| if *b { 1 } else { 0 }).collect();
    simulate_words(aig, &words)
        .into_iter()
        .map(|word| word & 1 == 1)
        .collect()
}

/// Lane pattern for input `input` in word `word` of an exhaustive
/// enumeration where row `r` assigns bit `i` of `r` to input `i`.
fn exhaustive_pattern(input: usize, word: usize) -> u64 {
    const LOW_PATTERNS: [u64; 6] = [
        0xAAAA_AAAA_AAAA_AAAA,
        0xCCCC_CCCC_CCCC_CCCC,
        0xF0F0_F0F0_F0F0_F0F0,
        0xFF00_FF00_FF00_FF00,
        0xFFFF_0000_FFFF_0000,
        0xFFFF_FFFF_0000_0000,
    ];
    if input < LOW_PATTERNS.len() {
        LOW_PATTERNS[input]
    } else if (word >> (input - LOW_PATTERNS.len())) & 1 == 1 {
        u64::MAX
    } else {
        0
    }
}

/// Full truth table of every output, 64 rows per word, unused lanes of the
/// last word cleared. Panics above `MAX_EXHAUSTIVE_INPUTS` inputs.
pub fn exhaustive_truth_tables(aig: &Aig) -> Vec<Vec<u64>> {
    let num_inputs = aig.num_pis();
    assert!(
        num_inputs <= MAX_EXHAUSTIVE_INPUTS,
        "exhaustive_truth_tables: {} inputs exceeds limit of {}",
        num_inputs,
        MAX_EXHAUSTIVE_INPUTS
    );
    let rows = 1usize << num_inputs;
    let words = rows.div_ceil(64);
    let mut tables: Vec<Vec<u64>> = vec![Vec::with_capacity(words); aig.num_pos()];
    for word in 0..words {
        let inputs: Vec<u64> = (0..num_inputs)
            .map(|input| exhaustive_pattern(input, word))
            .collect();
        let remaining = rows - word * 64;
        let mask = if remaining >= 64 {
            u64::MAX
        } else {
            (1u64 << remaining) - 1
        };
        for (table, output) in tables.iter_mut().zip(simulate_words(aig, &inputs)) {
            table.push(output & mask);
        }
    }
    tables
}

/// Simulates `rounds` words of random patterns drawn from `rng`; returns the
/// output words of each round. Two networks with the same input count see the
/// same patterns when given identically seeded generators.
pub fn random_simulate<R: Rng>(aig: &Aig, rounds: usize, rng: &mut R) -> Vec<Vec<u64>> {
    (0..rounds)
        .map(|_| {
            let inputs: Vec<u64> = (0..aig.num_pis()).map(|_| rng.gen::<u64>()).collect();
            simulate_words(aig, &inputs)
        })
        .collect()
}
