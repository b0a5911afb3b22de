// SPDX-License-Identifier: Apache-2.0

//! Level and critical-path annotations layered over a mutable `Aig`.
//!
//! The view owns no structure: it borrows the network mutably for its whole
//! lifetime and keeps a snapshot of derived data that is refreshed explicitly
//! with `update_levels()`. Reading the snapshot after the network changed
//! without refreshing is a logic error and aborts in debug builds.

use std::ops::Deref;

use bitvec::prelude::*;

use crate::aig::topo::topo_order;
use crate::aig::{Aig, NodeRef, Signal};

/// Level of every node index: 0 for the constant, inputs and dead slots,
/// `1 + max(fan-in levels)` for live gates.
pub fn compute_levels(aig: &Aig) -> Vec<usize> {
    levels_along(aig, &topo_order(aig))
}

fn levels_along(aig: &Aig, order: &[NodeRef]) -> Vec<usize> {
    let mut levels = vec![0usize; aig.size()];
    for node in order {
        if let Some([a, b]) = aig.fanins(*node) {
            levels[node.id] = 1 + std::cmp::max(levels[a.node.id], levels[b.node.id]);
        }
    }
    levels
}

/// Maximum level among nodes driving an output; 0 when there are no outputs.
pub fn output_depth(aig: &Aig, levels: &[usize]) -> usize {
    aig.outputs()
        .iter()
        .map(|output| levels[output.node.id])
        .max()
        .unwrap_or(0)
}

pub struct DepthView<'a> {
    aig: &'a mut Aig,
    levels: Vec<usize>,
    critical: BitVec,
    depth: usize,
    generation: u64,
}

impl<'a> DepthView<'a> {
    pub fn new(aig: &'a mut Aig) -> Self {
        let mut view = DepthView {
            aig,
            levels: Vec::new(),
            critical: BitVec::new(),
            depth: 0,
            generation: 0,
        };
        view.update_levels();
        view
    }

    /// Mutable access to the underlying network. Any mutation made through it
    /// must be followed by `update_levels()` before the next level query.
    pub fn network_mut(&mut self) -> &mut Aig {
        &mut *self.aig
    }

    /// Recomputes levels in topological order, then marks the zero-slack
    /// nodes with a reverse pass from the outputs.
    pub fn update_levels(&mut self) {
        let order = topo_order(self.aig);
        let size = self.aig.size();
        let levels = levels_along(self.aig, &order);
        let depth = output_depth(self.aig, &levels);

        // height: longest gate path from a node to any output it reaches.
        let mut height = vec![0usize; size];
        let mut reaches_output: BitVec = bitvec![0; size];
        for output in self.aig.outputs() {
            reaches_output.set(output.node.id, true);
        }
        for node in order.iter().rev() {
            if !reaches_output[node.id] {
                continue;
            }
            if let Some([a, b]) = self.aig.fanins(*node) {
                for fanin in [a, b] {
                    reaches_output.set(fanin.node.id, true);
                    height[fanin.node.id] =
                        std::cmp::max(height[fanin.node.id], height[node.id] + 1);
                }
            }
        }
        let mut critical: BitVec = bitvec![0; size];
        for node in &order {
            if reaches_output[node.id] && levels[node.id] + height[node.id] == depth {
                critical.set(node.id, true);
            }
        }

        log::trace!(
            "update_levels: {} live nodes, depth {}, {} critical",
            order.len(),
            depth,
            critical.count_ones()
        );
        self.levels = levels;
        self.critical = critical;
        self.depth = depth;
        self.generation = self.aig.generation();
    }

    /// True if the network changed since the last `update_levels()`.
    pub fn is_stale(&self) -> bool {
        self.generation != self.aig.generation()
    }

    fn assert_fresh(&self, context: &str) {
        debug_assert!(
            !self.is_stale(),
            "DepthView::{} read after the network was mutated (snapshot generation {}, network generation {}); call update_levels() first",
            context,
            self.generation,
            self.aig.generation()
        );
    }

    pub fn level(&self, node: NodeRef) -> usize {
        self.assert_fresh("level");
        self.levels[node.id]
    }

    pub fn level_of_signal(&self, signal: Signal) -> usize {
        self.level(signal.node)
    }

    pub fn is_on_critical_path(&self, node: NodeRef) -> bool {
        self.assert_fresh("is_on_critical_path");
        self.critical[node.id]
    }

    pub fn depth(&self) -> usize {
        self.assert_fresh("depth");
        self.depth
    }
}

impl Deref for DepthView<'_> {
    type Target = Aig;

    fn deref(&self) -> &Aig {
        &*self.aig
    }
}
