// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Debug};

use crate::aig::{NodeRef, Signal};
use crate::depth_view::DepthView;

/// The algebraic rewrite families, in the priority order the engine tries
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Associativity,
    Distributivity,
    Distributivity3,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Associativity => write!(f, "assoc"),
            RuleKind::Distributivity => write!(f, "distr"),
            RuleKind::Distributivity3 => write!(f, "distr3"),
        }
    }
}

/// A local, depth-driven rewrite anchored at one gate.
pub trait RewriteRule: Debug {
    fn kind(&self) -> RuleKind;

    /// Attempts to rewrite the subgraph rooted at `node`.
    ///
    /// Returns `true` if the network was changed, in which case `node` has
    /// been substituted and the view's levels are stale. A `false` return
    /// leaves the network untouched. The node may already be dead or no longer
    /// have the expected shape; that is reported as no match.
    fn try_rewrite(&self, view: &mut DepthView, node: NodeRef) -> bool;
}

/// Fan-ins of `node` if it is a live AND gate.
pub(crate) fn live_fanins(view: &DepthView, node: NodeRef) -> Option<[Signal; 2]> {
    if view.is_dead(node) {
        return None;
    }
    view.fanins(node)
}

/// Replaces `node` by `replacement` and retires any gate allocated since the
/// arena had `size_before` slots that ended up without consumers.
///
/// Returns whether `node` was actually substituted; a replacement that is
/// `node` itself (a structural hash hit on the matched gate) is not progress.
pub(crate) fn commit_rewrite(
    view: &mut DepthView,
    node: NodeRef,
    replacement: Signal,
    size_before: usize,
) -> bool {
    let aig = view.network_mut();
    let substituted = replacement.node != node;
    if substituted {
        aig.substitute_node(node, replacement);
    }
    for id in (size_before..aig.size()).rev() {
        let fresh = NodeRef::new(id);
        if aig.is_and(fresh) && !aig.is_dead(fresh) && aig.fanout_size(fresh) == 0 {
            aig.take_out_node(fresh);
        }
    }
    substituted
}
