// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aig::fanout::fanout_histogram;
use crate::aig::network::Aig;
use crate::depth_view::{compute_levels, output_depth};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SummaryStats {
    pub pis: usize,
    pub pos: usize,
    /// Live AND gates.
    pub gates: usize,
    /// Arena size, dead slots included.
    pub size: usize,
    pub depth: usize,
    pub fanout_histogram: BTreeMap<usize, usize>,
}

pub fn get_summary_stats(aig: &Aig) -> SummaryStats {
    let levels = compute_levels(aig);
    SummaryStats {
        pis: aig.num_pis(),
        pos: aig.num_pos(),
        gates: aig.num_gates(),
        size: aig.size(),
        depth: output_depth(aig, &levels),
        fanout_histogram: fanout_histogram(aig),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_simple_graph;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_stats_simple_graph() {
        let g = setup_simple_graph();
        let stats = get_summary_stats(&g.aig);
        assert_eq!(
            stats,
            SummaryStats {
                pis: 4,
                pos: 2,
                gates: 4,
                size: 9,
                depth: 2,
                fanout_histogram: [(1, 6), (2, 2)].into_iter().collect(),
            }
        );
    }

    #[test]
    fn test_summary_stats_serializes() {
        let g = setup_simple_graph();
        let json = serde_json::to_string(&get_summary_stats(&g.aig)).unwrap();
        assert!(json.contains("\"depth\":2"), "{}", json);
        assert!(json.contains("\"fanout_histogram\":{\"1\":6,\"2\":2}"), "{}", json);
    }

    #[test]
    fn test_empty_network() {
        let aig = Aig::new();
        let stats = get_summary_stats(&aig);
        assert_eq!(stats.depth, 0);
        assert_eq!(stats.size, 1);
        assert!(stats.fanout_histogram.is_empty());
    }
}
