// SPDX-License-Identifier: Apache-2.0

//! `AND(p, AND(a, b)) -> AND(AND(p, b), a)` when `a` carries the critical path
//! and `p` is shallow, pulling `a` one level closer to the output.

use crate::aig::NodeRef;
use crate::depth_view::DepthView;
use crate::rewrite::rule::{commit_rewrite, live_fanins, RewriteRule, RuleKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct Associativity;

impl RewriteRule for Associativity {
    fn kind(&self) -> RuleKind {
        RuleKind::Associativity
    }

    fn try_rewrite(&self, view: &mut DepthView, node: NodeRef) -> bool {
        let Some([f0, f1]) = live_fanins(view, node) else {
            return false;
        };
        if !view.is_on_critical_path(node) {
            return false;
        }
        if view.is_pi(f0.node) && view.is_pi(f1.node) {
            return false;
        }

        // q: the operand more than one level deeper than p, taken
        // uncomplemented so its AND structure can be opened up.
        let (l0, l1) = (view.level(f0.node), view.level(f1.node));
        let (p, q) = if l0 > l1 + 1 && !f0.complemented {
            (f1, f0)
        } else if l1 > l0 + 1 && !f1.complemented {
            (f0, f1)
        } else {
            log::trace!("assoc: {} operands not skewed enough ({}, {})", node, l0, l1);
            return false;
        };

        let Some([g0, g1]) = live_fanins(view, q.node) else {
            return false;
        };
        let (a, b) = match (
            view.is_on_critical_path(g0.node),
            view.is_on_critical_path(g1.node),
        ) {
            (true, false) => (g0, g1),
            (false, true) => (g1, g0),
            _ => {
                log::trace!("assoc: {} needs exactly one critical operand under {}", node, q);
                return false;
            }
        };

        let level = view.level(node);
        let predicted = 1 + std::cmp::max(
            1 + std::cmp::max(view.level(p.node), view.level(b.node)),
            view.level(a.node),
        );
        if predicted >= level {
            log::trace!("assoc: {} would not get shallower ({} -> {})", node, level, predicted);
            return false;
        }

        let size_before = view.size();
        let aig = view.network_mut();
        let pb = aig.create_and(p, b);
        let replacement = aig.create_and(pb, a);
        let rewritten = commit_rewrite(view, node, replacement, size_before);
        if rewritten {
            log::debug!(
                "assoc: {} -> {} (level {} -> {})",
                node,
                replacement,
                level,
                predicted
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
    use crate::test_utils::setup_associativity_graph;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reassociates_critical_operand() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut g = setup_associativity_graph();
        let mut view = DepthView::new(&mut g.aig);
        assert_eq!(view.level(g.n.node), 3);

        assert!(Associativity.try_rewrite(&mut view, g.n.node));
        view.update_levels();

        let out = view.po_at(0);
        assert_eq!(view.level(out.node), 2);
        assert_eq!(view.depth(), 2);
        assert!(view.is_dead(g.n.node));
        assert!(view.is_dead(g.q.node));
        let [lo, hi] = view.fanins(out.node).unwrap();
        assert_eq!(lo, g.a);
        assert_eq!(view.fanins(hi.node), Some([g.p, g.b]));
        check_fanout_consistency(&view).unwrap();
    }

    #[test]
    fn test_rejects_complemented_deep_operand() {
        let mut aig = Aig::new();
        let i0 = aig.create_pi();
        let i1 = aig.create_pi();
        let p = aig.create_pi();
        let b = aig.create_pi();
        let a = aig.create_and(i0, i1);
        let q = aig.create_and(a, b);
        let n = aig.create_and(p, !q);
        aig.create_po(n);
        let mut view = DepthView::new(&mut aig);
        let generation = view.generation();
        assert!(!Associativity.try_rewrite(&mut view, n.node));
        assert_eq!(view.generation(), generation);
    }

    #[test]
    fn test_rejects_off_critical_path() {
        let mut g = setup_associativity_graph();
        // A deeper unrelated output takes the critical path away from n.
        let i2 = g.aig.create_pi();
        let i3 = g.aig.create_pi();
        let mut deep = g.aig.create_and(i2, i3);
        for _ in 0..3 {
            deep = g.aig.create_and(deep, i2.negate());
            deep = !deep;
        }
        g.aig.create_po(deep);
        let mut view = DepthView::new(&mut g.aig);
        assert!(view.depth() > 3);
        assert!(!view.is_on_critical_path(g.n.node));
        assert!(!Associativity.try_rewrite(&mut view, g.n.node));
    }

    #[test]
    fn test_rejects_when_both_inner_operands_critical() {
        let mut aig = Aig::new();
        let i: Vec<_> = (0..5).map(|_| aig.create_pi()).collect();
        let p = i[0];
        let a = aig.create_and(i[1], i[2]);
        let b = aig.create_and(i[3], i[4]);
        let q = aig.create_and(a, b);
        let n = aig.create_and(p, q);
        aig.create_po(n);
        let mut view = DepthView::new(&mut aig);
        assert!(!Associativity.try_rewrite(&mut view, n.node));
    }

    #[test]
    fn test_rejects_small_level_gap() {
        let mut aig = Aig::new();
        let i: Vec<_> = (0..3).map(|_| aig.create_pi()).collect();
        let q = aig.create_and(i[1], i[2]);
        let n = aig.create_and(i[0], q);
        aig.create_po(n);
        let mut view = DepthView::new(&mut aig);
        assert!(!Associativity.try_rewrite(&mut view, n.node));
        // Inputs and the constant are never candidates.
        assert!(!Associativity.try_rewrite(&mut view, i[0].node));
        assert!(!Associativity.try_rewrite(&mut view, NodeRef::CONSTANT));
    }

    #[test]
    fn test_dead_node_is_no_match() {
        let mut g = setup_associativity_graph();
        let mut view = DepthView::new(&mut g.aig);
        assert!(Associativity.try_rewrite(&mut view, g.n.node));
        view.update_levels();
        assert!(!Associativity.try_rewrite(&mut view, g.n.node));
        assert!(!Associativity.try_rewrite(&mut view, g.q.node));
    }
}
