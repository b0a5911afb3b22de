// SPDX-License-Identifier: Apache-2.0

//! Three-level redistribution for strongly skewed trees:
//!
//! ```text
//! n = AND(!AND(!AND(b, a), c), d)   with level(z) - level(d) > 3
//!   = (a & b & d) | (!c & d)
//!   -> !AND(!AND(AND(a, d), b), !AND(!c, d))
//! ```
//!
//! The shallow operand `d` is pushed down next to `a`, so the deep operand
//! `b` ends up two levels below the root instead of three.

use crate::aig::{NodeRef, Signal};
use crate::depth_view::DepthView;
use crate::rewrite::rule::{commit_rewrite, live_fanins, RewriteRule, RuleKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct Distributivity3;

/// Splits a fan-in pair into (deeper, other); on a tie the second operand
/// counts as the deeper one.
fn deeper_first(view: &DepthView, [f0, f1]: [Signal; 2]) -> (Signal, Signal) {
    if view.level(f0.node) > view.level(f1.node) {
        (f0, f1)
    } else {
        (f1, f0)
    }
}

impl RewriteRule for Distributivity3 {
    fn kind(&self) -> RuleKind {
        RuleKind::Distributivity3
    }

    fn try_rewrite(&self, view: &mut DepthView, node: NodeRef) -> bool {
        let Some(n_fanins) = live_fanins(view, node) else {
            return false;
        };
        let (z, d) = deeper_first(view, n_fanins);
        if !z.complemented || view.level(z.node) <= view.level(d.node) + 3 {
            return false;
        }

        let Some(z_fanins) = live_fanins(view, z.node) else {
            return false;
        };
        let (w, c) = deeper_first(view, z_fanins);
        if !w.complemented || view.level(w.node) <= view.level(c.node) {
            log::trace!("distr3: {} second level does not match", node);
            return false;
        }

        let Some(w_fanins) = live_fanins(view, w.node) else {
            return false;
        };
        let (b, a) = deeper_first(view, w_fanins);
        if view.level(b.node) <= view.level(a.node) {
            log::trace!("distr3: {} third level does not match", node);
            return false;
        }

        let level = view.level(node);
        let size_before = view.size();
        let aig = view.network_mut();
        let nw = aig.create_and(a, d);
        let nz = aig.create_and(nw, b);
        let nf = aig.create_and(!c, d);
        let nn = aig.create_and(!nz, !nf);
        let replacement = !nn;
        let rewritten = commit_rewrite(view, node, replacement, size_before);
        if rewritten {
            log::debug!("distr3: {} -> {} (level was {})", node, replacement, level);
        }
        rewritten
    }
}
