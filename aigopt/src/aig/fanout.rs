// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use crate::aig::network::Aig;
use crate::aig::signal::NodeRef;

/// Recounts, for every node index, how many live gate fan-ins and primary
/// outputs refer to it. Dead nodes always count zero.
pub fn compute_fanout_counts(aig: &Aig) -> Vec<usize> {
    let mut counts = vec![0usize; aig.size()];
    for gate in aig.gates() {
        if let Some(fanins) = aig.fanins(gate) {
            for fanin in fanins {
                counts[fanin.node.id] += 1;
            }
        }
    }
    for output in aig.outputs() {
        counts[output.node.id] += 1;
    }
    counts
}

/// Verifies that the stored fanout counters match a fresh recount for every
/// live node.
pub fn check_fanout_consistency(aig: &Aig) -> Result<(), String> {
    let counts = compute_fanout_counts(aig);
    let mut mismatches = Vec::new();
    for (id, expected) in counts.iter().enumerate() {
        let node = NodeRef::new(id);
        if aig.is_dead(node) {
            if *expected != 0 {
                mismatches.push(format!("{} is dead but still referenced {} times", node, expected));
            }
            continue;
        }
        let stored = aig.fanout_size(node);
        if stored != *expected {
            mismatches.push(format!(
                "{} stores fanout {} but is referenced {} times",
                node, stored, expected
            ));
        }
    }
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "fanout accounting mismatch: {}",
            mismatches.join("; ")
        ))
    }
}

/// Histogram from fanout count to number of live nodes with that fanout.
///
/// The constant node is excluded; primary inputs and gates are counted, with
/// output references included in their fanout.
pub fn fanout_histogram(aig: &Aig) -> BTreeMap<usize, usize> {
    let mut histogram = BTreeMap::new();
    for node in aig.inputs().iter().copied().chain(aig.gates()) {
        *histogram.entry(aig.fanout_size(node)).or_insert(0) += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_simple_graph;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_match_after_construction() {
        let g = setup_simple_graph();
        check_fanout_consistency(&g.aig).unwrap();
        let counts = compute_fanout_counts(&g.aig);
        assert_eq!(counts[g.i1.node.id], 2);
        assert_eq!(counts[g.o.node.id], 1);
    }

    #[test]
    fn test_histogram_simple_graph() {
        let g = setup_simple_graph();
        // i0: 1, i1: 2, i2: 2, i3: 1, a: 1, b: 1, c: 1, o: 1 (output)
        let expected: BTreeMap<usize, usize> = [(1, 6), (2, 2)].into_iter().collect();
        assert_eq!(fanout_histogram(&g.aig), expected);
    }

    #[test]
    fn test_manual_refcount_drift_is_detected() {
        let mut g = setup_simple_graph();
        g.aig.incr_fanout_size(g.a.node);
        let err = check_fanout_consistency(&g.aig).unwrap_err();
        assert!(err.contains("stores fanout 2"), "{}", err);
        g.aig.decr_fanout_size(g.a.node);
        check_fanout_consistency(&g.aig).unwrap();
    }
}
