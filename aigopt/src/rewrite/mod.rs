// SPDX-License-Identifier: Apache-2.0

//! Depth-driven algebraic rewriting of an `Aig` to a fixpoint.
//!
//! Each pass snapshots the live gates and offers every one of them to the
//! enabled rules in priority order (associativity, distributivity,
//! three-level distributivity). The first rule that rewrites a gate wins and
//! levels are recomputed before the next gate is examined. Passes repeat until
//! one completes without any rewrite.
//!
//! Basic example usage:
//! ```
//! use aigopt::aig::Aig;
//! use aigopt::aig_algebraic_rewriting;
//!
//! let mut aig = Aig::new();
//! let p = aig.create_pi();
//! let a0 = aig.create_pi();
//! let a1 = aig.create_pi();
//! let b = aig.create_pi();
//! let a = aig.create_and(a0, a1);
//! let q = aig.create_and(a, b);
//! let n = aig.create_and(p, q);
//! aig.create_po(n);
//!
//! let stats = aig_algebraic_rewriting(&mut aig);
//! assert_eq!(stats.depth_before, 3);
//! assert_eq!(stats.depth_after, 2);
//! ```

pub mod associativity;
pub mod distributivity;
pub mod distributivity3;
pub mod rule;

use serde::Serialize;

use crate::aig::topo::debug_assert_no_cycles;
use crate::aig::{Aig, NodeRef};
use crate::depth_view::DepthView;

pub use crate::rewrite::associativity::Associativity;
pub use crate::rewrite::distributivity::Distributivity;
pub use crate::rewrite::distributivity3::Distributivity3;
pub use crate::rewrite::rule::{RewriteRule, RuleKind};

/// Selects which rules run and bounds the number of passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    pub associativity: bool,
    pub distributivity: bool,
    pub distributivity3: bool,
    /// Stop after this many passes even if a fixpoint was not reached.
    pub max_passes: Option<usize>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            associativity: true,
            distributivity: true,
            distributivity3: true,
            max_passes: None,
        }
    }
}

impl RewriteOptions {
    /// All rules disabled; useful as a base for enabling a single rule.
    pub fn none() -> Self {
        Self {
            associativity: false,
            distributivity: false,
            distributivity3: false,
            max_passes: None,
        }
    }

    pub fn only(kind: RuleKind) -> Self {
        let mut options = Self::none();
        match kind {
            RuleKind::Associativity => options.associativity = true,
            RuleKind::Distributivity => options.distributivity = true,
            RuleKind::Distributivity3 => options.distributivity3 = true,
        }
        options
    }

    /// The enabled rules in the order the engine tries them.
    pub fn rules(&self) -> Vec<Box<dyn RewriteRule>> {
        let mut rules: Vec<Box<dyn RewriteRule>> = Vec::new();
        if self.associativity {
            rules.push(Box::new(Associativity));
        }
        if self.distributivity {
            rules.push(Box::new(Distributivity));
        }
        if self.distributivity3 {
            rules.push(Box::new(Distributivity3));
        }
        rules
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub passes: usize,
    pub associativity: usize,
    pub distributivity: usize,
    pub distributivity3: usize,
    pub depth_before: usize,
    pub depth_after: usize,
    pub gates_before: usize,
    pub gates_after: usize,
    /// False when `max_passes` cut the loop short.
    pub reached_fixpoint: bool,
}

impl RewriteStats {
    pub fn total_rewrites(&self) -> usize {
        self.associativity + self.distributivity + self.distributivity3
    }

    pub fn rewrites_for(&self, kind: RuleKind) -> usize {
        match kind {
            RuleKind::Associativity => self.associativity,
            RuleKind::Distributivity => self.distributivity,
            RuleKind::Distributivity3 => self.distributivity3,
        }
    }

    fn record(&mut self, kind: RuleKind) {
        match kind {
            RuleKind::Associativity => self.associativity += 1,
            RuleKind::Distributivity => self.distributivity += 1,
            RuleKind::Distributivity3 => self.distributivity3 += 1,
        }
    }
}

/// Runs every rule to a fixpoint. The network stays functionally equivalent
/// and its depth never increases.
pub fn aig_algebraic_rewriting(aig: &mut Aig) -> RewriteStats {
    aig_algebraic_rewriting_with_options(aig, &RewriteOptions::default())
}

pub fn aig_algebraic_rewriting_with_options(aig: &mut Aig, options: &RewriteOptions) -> RewriteStats {
    let rules = options.rules();
    let mut view = DepthView::new(aig);
    let mut stats = RewriteStats {
        depth_before: view.depth(),
        gates_before: view.num_gates(),
        ..Default::default()
    };
    log::info!(
        "aig_algebraic_rewriting: start depth {} gates {} rules [{}]",
        stats.depth_before,
        stats.gates_before,
        rules
            .iter()
            .map(|rule| rule.kind().to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );

    loop {
        if let Some(limit) = options.max_passes {
            if stats.passes >= limit {
                log::warn!(
                    "aig_algebraic_rewriting: stopping after {} passes without reaching a fixpoint",
                    stats.passes
                );
                break;
            }
        }
        stats.passes += 1;
        let rewrites = run_pass(&mut view, &rules, &mut stats);
        log::info!(
            "aig_algebraic_rewriting: pass {} applied {} rewrites; depth {} gates {}",
            stats.passes,
            rewrites,
            view.depth(),
            view.num_gates()
        );
        if rewrites == 0 {
            stats.reached_fixpoint = true;
            break;
        }
    }

    stats.depth_after = view.depth();
    stats.gates_after = view.num_gates();
    debug_assert_no_cycles(&view, "aig_algebraic_rewriting");
    view.check_invariants_with_debug_assert();
    log::info!(
        "aig_algebraic_rewriting: done after {} passes; depth {} -> {}, gates {} -> {}, rewrites {}",
        stats.passes,
        stats.depth_before,
        stats.depth_after,
        stats.gates_before,
        stats.gates_after,
        stats.total_rewrites()
    );
    stats
}

/// One scan over the gates that were live when the pass started. Returns the
/// number of accepted rewrites.
fn run_pass(view: &mut DepthView, rules: &[Box<dyn RewriteRule>], stats: &mut RewriteStats) -> usize {
    let candidates: Vec<NodeRef> = view.gates().collect();
    let mut rewrites = 0;
    for node in candidates {
        if view.is_dead(node) {
            continue;
        }
        for rule in rules {
            let generation = view.generation();
            let rewritten = rule.try_rewrite(view, node);
            if view.generation() != generation {
                view.update_levels();
            }
            if rewritten {
                stats.record(rule.kind());
                rewrites += 1;
                break;
            }
        }
    }
    rewrites
}
