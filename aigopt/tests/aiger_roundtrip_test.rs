// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use test_case::test_case;

use aigopt::aig::summary_stats::get_summary_stats;
use aigopt::aig_serdes::{emit_aiger, load_aiger, load_aiger_from_path};
use aigopt::check_equivalence::{check_equivalence, EquivOptions};
use aigopt::test_utils::{random_aig, RandomAigOptions};
use aigopt::aig_algebraic_rewriting;

/// out = ((((x0 & x1) & x2) & x3) & x4) & x5, written out of order.
const CHAIN6: &str = "aag 11 6 0 1 5
2
4
6
8
10
12
22
22 20 12
14 2 4
16 14 6
18 16 8
20 18 10
i0 x0
o0 out
c
six-input chain
";

#[test]
fn test_rewrite_loaded_chain_and_emit() {
    let _ = env_logger::builder().is_test(true).try_init();
    let original = load_aiger(CHAIN6).unwrap();
    assert_eq!(get_summary_stats(&original).depth, 5);

    let mut aig = original.clone();
    let stats = aig_algebraic_rewriting(&mut aig);
    assert!(stats.depth_after < 5, "{:?}", stats);

    let text = emit_aiger(&aig).unwrap();
    assert!(text.starts_with("aag 11 6 0 1 5\n"), "{}", text);
    let reloaded = load_aiger(&text).unwrap();
    assert_eq!(get_summary_stats(&reloaded).depth, stats.depth_after);
    assert_eq!(
        check_equivalence(&original, &reloaded, &EquivOptions::default()),
        Ok(())
    );
}

#[test_case(1, 6, 48)]
#[test_case(2, 9, 100)]
#[test_case(3, 12, 180)]
fn test_emit_load_preserves_function_and_shape(seed: u64, inputs: usize, gates: usize) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let aig = random_aig(
        &mut rng,
        &RandomAigOptions {
            inputs,
            gates,
            outputs: 4,
            complement_probability: 0.4,
        },
    );
    let reloaded = load_aiger(&emit_aiger(&aig).unwrap()).unwrap();
    let before = get_summary_stats(&aig);
    let after = get_summary_stats(&reloaded);
    assert_eq!(after.gates, before.gates);
    assert_eq!(after.depth, before.depth);
    assert_eq!(after.fanout_histogram, before.fanout_histogram);
    assert_eq!(
        check_equivalence(&aig, &reloaded, &EquivOptions::default()),
        Ok(())
    );
}

#[test]
fn test_load_from_tempfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain6.aag");
    std::fs::write(&path, CHAIN6).unwrap();
    let aig = load_aiger_from_path(&path).unwrap();
    assert_eq!(aig.num_pis(), 6);
    assert_eq!(aig.num_gates(), 5);
}
