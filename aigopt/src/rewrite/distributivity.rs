// SPDX-License-Identifier: Apache-2.0

//! Factors a shared operand out of two single-fanout products:
//!
//! * `AND(AND(s, a), AND(s, b))   -> AND(s, AND(a, b))`
//! * `AND(!AND(s, a), !AND(s, b)) -> !AND(s, OR(a, b))`

use crate::aig::{NodeRef, Signal};
use crate::depth_view::DepthView;
use crate::rewrite::rule::{commit_rewrite, live_fanins, RewriteRule, RuleKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct Distributivity;

/// Finds an operand that appears with the same polarity in both fan-in
/// lists. Returns `(shared, rest_of_x, rest_of_y)`.
///
/// All four pairings are tried; a pairing whose nodes agree but whose
/// polarities differ does not stop the search.
fn find_shared(x: [Signal; 2], y: [Signal; 2]) -> Option<(Signal, Signal, Signal)> {
    for (i, j) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        if x[i] == y[j] {
            return Some((x[i], x[1 - i], y[1 - j]));
        }
    }
    None
}

impl RewriteRule for Distributivity {
    fn kind(&self) -> RuleKind {
        RuleKind::Distributivity
    }

    fn try_rewrite(&self, view: &mut DepthView, node: NodeRef) -> bool {
        let Some([x, y]) = live_fanins(view, node) else {
            return false;
        };
        if view.fanout_size(x.node) != 1 || view.fanout_size(y.node) != 1 {
            return false;
        }
        let (Some(x_fanins), Some(y_fanins)) = (live_fanins(view, x.node), live_fanins(view, y.node))
        else {
            return false;
        };
        if x.complemented != y.complemented {
            log::trace!("distr: {} has mixed operand polarity", node);
            return false;
        }
        let Some((shared, x_rest, y_rest)) = find_shared(x_fanins, y_fanins) else {
            log::trace!("distr: {} operands share no term", node);
            return false;
        };

        let level = view.level(node);
        let size_before = view.size();
        let aig = view.network_mut();
        let replacement = if x.complemented {
            let either = aig.create_nand(!x_rest, !y_rest);
            !aig.create_and(shared, either)
        } else {
            let both = aig.create_and(x_rest, y_rest);
            aig.create_and(shared, both)
        };
        let rewritten = commit_rewrite(view, node, replacement, size_before);
        if rewritten {
            log::debug!(
                "distr: {} -> {} (shared {}, level was {})",
                node,
                replacement,
                shared,
                level
            );
        }
        rewritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::fanout::check_fanout_consistency;
    use crate::aig::Aig;
    use crate::aig_sim::exhaustive_truth_tables;
    use crate::test_utils::setup_distributivity_graph;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_factors_shared_operand() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut g = setup_distributivity_graph();
        let before = exhaustive_truth_tables(&g.aig);
        let mut view = DepthView::new(&mut g.aig);
        assert!(Distributivity.try_rewrite(&mut view, g.n.node));
        view.update_levels();

        for gate in [g.n, g.x, g.y] {
            assert!(view.is_dead(gate.node), "{} should be retired", gate);
            assert_eq!(view.fanout_size(gate.node), 0);
        }
        let out = view.po_at(0);
        assert!(!out.complemented);
        let [lo, hi] = view.fanins(out.node).unwrap();
        assert_eq!(lo, g.c);
        assert_eq!(view.fanins(hi.node), Some([g.a, g.b]));
        assert_eq!(view.num_gates(), 2);
        check_fanout_consistency(&view).unwrap();
        assert_eq!(exhaustive_truth_tables(&g.aig), before);
    }

    #[test]
    fn test_factors_complemented_products() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let s = aig.create_pi();
        let x = aig.create_and(a, !s);
        let y = aig.create_and(!s, b);
        let n = aig.create_and(!x, !y);
        aig.create_po(n);
        let before = exhaustive_truth_tables(&aig);
        let mut view = DepthView::new(&mut aig);
        assert!(Distributivity.try_rewrite(&mut view, n.node));
        assert!(view.po_at(0).complemented);
        assert_eq!(view.num_gates(), 2);
        assert_eq!(exhaustive_truth_tables(&aig), before);
    }

    #[test]
    fn test_rejects_shared_intermediate() {
        let mut g = setup_distributivity_graph();
        g.aig.create_po(g.x);
        let mut view = DepthView::new(&mut g.aig);
        assert!(!Distributivity.try_rewrite(&mut view, g.n.node));
    }

    #[test]
    fn test_rejects_mixed_polarity() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let c = aig.create_pi();
        let x = aig.create_and(a, c);
        let y = aig.create_and(b, c);
        let n = aig.create_and(x, !y);
        aig.create_po(n);
        let mut view = DepthView::new(&mut aig);
        assert!(!Distributivity.try_rewrite(&mut view, n.node));
    }

    #[test]
    fn test_rejects_shared_node_with_opposite_polarity() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let c = aig.create_pi();
        let x = aig.create_and(a, c);
        let y = aig.create_and(b, !c);
        let n = aig.create_and(x, y);
        aig.create_po(n);
        let mut view = DepthView::new(&mut aig);
        assert!(!Distributivity.try_rewrite(&mut view, n.node));
    }

    #[test]
    fn test_finds_second_shared_operand() {
        // s appears with opposite polarities, r with the same one.
        let mut aig = Aig::new();
        let s = aig.create_pi();
        let r = aig.create_pi();
        let x = aig.create_and(s, r);
        let y = aig.create_and(!s, r);
        let n = aig.create_and(!x, !y);
        aig.create_po(n);
        let before = exhaustive_truth_tables(&aig);
        let mut view = DepthView::new(&mut aig);
        assert!(Distributivity.try_rewrite(&mut view, n.node));
        assert_eq!(exhaustive_truth_tables(&aig), before);
    }

    /// Every polarity assignment of `AND(x, y)` over `x = AND(a, c)`,
    /// `y = AND(b, c')`: the rule fires exactly when `c` and `c'` agree and
    /// the outer polarities agree, and always preserves the function.
    #[test]
    fn test_exhaustive_polarity_assignments() {
        for bits in 0u32..64 {
            let bit = |i: u32| bits & (1 << i) != 0;
            let mut aig = Aig::new();
            let a = aig.create_pi();
            let b = aig.create_pi();
            let c = aig.create_pi();
            let x = aig.create_and(a.complement_if(bit(0)), c.complement_if(bit(1)));
            let y = aig.create_and(b.complement_if(bit(2)), c.complement_if(bit(3)));
            let n = aig.create_and(x.complement_if(bit(4)), y.complement_if(bit(5)));
            aig.create_po(n);
            let before = exhaustive_truth_tables(&aig);
            let gates_before = aig.num_gates();
            let expect_match = bit(1) == bit(3) && bit(4) == bit(5);

            let mut view = DepthView::new(&mut aig);
            let depth_before = view.depth();
            let fired = Distributivity.try_rewrite(&mut view, n.node);
            assert_eq!(fired, expect_match, "polarity bits {:06b}", bits);
            view.update_levels();
            assert!(view.depth() <= depth_before);
            if fired {
                assert!(view.num_gates() < gates_before);
            }
            check_fanout_consistency(&aig).unwrap();
            assert_eq!(exhaustive_truth_tables(&aig), before, "bits {:06b}", bits);
        }
    }
}
