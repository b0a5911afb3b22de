// SPDX-License-Identifier: Apache-2.0

//! `Aig` is the mutable and-inverter graph: an arena of node slots with
//! two-input AND semantics, structural hashing, and per-node fanout counts.
//!
//! Nodes keep their index for life. Retired ("dead") nodes stay in the arena
//! and are skipped by gate iteration, so indices collected before a mutation
//! remain meaningful afterwards (they may just refer to a dead slot).
//!
//! Basic example usage:
//! ```
//! use aigopt::aig::Aig;
//!
//! let mut aig = Aig::new();
//! let a = aig.create_pi();
//! let b = aig.create_pi();
//! let f = aig.create_and(a, !b);
//! aig.create_po(f);
//! assert_eq!(aig.num_gates(), 1);
//! // Structural hashing: the same gate is never created twice.
//! assert_eq!(aig.create_and(!b, a), f);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;

use crate::aig::events::{Listener, ListenerId, Listeners, NetworkEvent};
use crate::aig::signal::{NodeRef, Signal};
use crate::aig::strash::{self, AndForm, StrashKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Constant,
    Input {
        /// Position of this node in the primary input list.
        index: usize,
    },
    And {
        a: Signal,
        b: Signal,
    },
}

#[derive(Debug, Clone)]
pub struct NodeSlot {
    pub kind: NodeKind,
    pub(crate) fanout: u32,
    pub(crate) dead: bool,
    value: u32,
    visited: u32,
    color: u32,
}

impl NodeSlot {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            fanout: 0,
            dead: false,
            value: 0,
            visited: 0,
            color: 0,
        }
    }

    pub fn fanins(&self) -> Option<[Signal; 2]> {
        match self.kind {
            NodeKind::And { a, b } => Some([a, b]),
            NodeKind::Constant | NodeKind::Input { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct Aig {
    pub(crate) nodes: Vec<NodeSlot>,
    pub(crate) strash: HashMap<StrashKey, NodeRef>,
    pub(crate) inputs: Vec<NodeRef>,
    pub(crate) outputs: Vec<Signal>,
    pub(crate) live_gates: usize,
    pub(crate) generation: u64,
    trav_color: u32,
    listeners: Listeners,
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones the structure; listeners are bound to the original instance and are
/// not carried over.
impl Clone for Aig {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            strash: self.strash.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            live_gates: self.live_gates,
            generation: self.generation,
            trav_color: self.trav_color,
            listeners: Listeners::default(),
        }
    }
}

impl Aig {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeSlot::new(NodeKind::Constant)],
            strash: HashMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            live_gates: 0,
            generation: 0,
            trav_color: 0,
            listeners: Listeners::default(),
        }
    }

    // -- Construction -------------------------------------------------------

    pub fn get_constant(&self, value: bool) -> Signal {
        if value {
            strash::constant_true()
        } else {
            strash::constant_false()
        }
    }

    pub fn create_pi(&mut self) -> Signal {
        let node = NodeRef::new(self.nodes.len());
        self.nodes.push(NodeSlot::new(NodeKind::Input {
            index: self.inputs.len(),
        }));
        self.inputs.push(node);
        self.generation += 1;
        self.notify(&NetworkEvent::Added(node));
        node.into()
    }

    /// Appends a primary output driven by `signal`; returns its position.
    pub fn create_po(&mut self, signal: Signal) -> usize {
        self.validate_live(signal.node, "create_po");
        self.incr_fanout_size(signal.node);
        self.outputs.push(signal);
        self.generation += 1;
        let index = self.outputs.len() - 1;
        self.notify(&NetworkEvent::OutputAdded(index));
        index
    }

    pub fn create_and(&mut self, f: Signal, g: Signal) -> Signal {
        self.validate_live(f.node, "create_and");
        self.validate_live(g.node, "create_and");
        let key = match strash::normalize_and(f, g) {
            AndForm::Folded(signal) => return signal,
            AndForm::Gate(key) => key,
        };
        if let Some(existing) = self.strash.get(&key) {
            return (*existing).into();
        }
        let node = NodeRef::new(self.nodes.len());
        self.nodes.push(NodeSlot::new(NodeKind::And {
            a: key.lhs,
            b: key.rhs,
        }));
        self.incr_fanout_size(key.lhs.node);
        self.incr_fanout_size(key.rhs.node);
        self.strash.insert(key, node);
        self.live_gates += 1;
        self.generation += 1;
        self.notify(&NetworkEvent::Added(node));
        node.into()
    }

    pub fn create_not(&self, f: Signal) -> Signal {
        !f
    }

    pub fn create_nand(&mut self, f: Signal, g: Signal) -> Signal {
        !self.create_and(f, g)
    }

    pub fn create_or(&mut self, f: Signal, g: Signal) -> Signal {
        !self.create_and(!f, !g)
    }

    pub fn create_nor(&mut self, f: Signal, g: Signal) -> Signal {
        self.create_and(!f, !g)
    }

    pub fn create_xor(&mut self, f: Signal, g: Signal) -> Signal {
        let f_and_not_g = self.create_and(f, !g);
        let not_f_and_g = self.create_and(!f, g);
        self.create_or(f_and_not_g, not_f_and_g)
    }

    pub fn create_xnor(&mut self, f: Signal, g: Signal) -> Signal {
        !self.create_xor(f, g)
    }

    // -- Structural queries -------------------------------------------------

    pub fn get_node(&self, signal: Signal) -> NodeRef {
        signal.node
    }

    pub fn is_complemented(&self, signal: Signal) -> bool {
        signal.complemented
    }

    pub fn make_signal(&self, node: NodeRef) -> Signal {
        node.into()
    }

    pub fn node_to_index(&self, node: NodeRef) -> usize {
        node.id
    }

    pub fn index_to_node(&self, index: usize) -> NodeRef {
        NodeRef::new(index)
    }

    pub fn kind(&self, node: NodeRef) -> &NodeKind {
        &self.nodes[node.id].kind
    }

    pub fn is_constant(&self, node: NodeRef) -> bool {
        matches!(self.nodes[node.id].kind, NodeKind::Constant)
    }

    pub fn is_pi(&self, node: NodeRef) -> bool {
        matches!(self.nodes[node.id].kind, NodeKind::Input { .. })
    }

    pub fn is_and(&self, node: NodeRef) -> bool {
        matches!(self.nodes[node.id].kind, NodeKind::And { .. })
    }

    pub fn is_dead(&self, node: NodeRef) -> bool {
        self.nodes[node.id].dead
    }

    /// Returns the fan-in signals of an AND gate, `None` for constants and
    /// primary inputs.
    pub fn fanins(&self, node: NodeRef) -> Option<[Signal; 2]> {
        self.nodes[node.id].fanins()
    }

    pub fn fanin_size(&self, node: NodeRef) -> usize {
        if self.is_and(node) {
            2
        } else {
            0
        }
    }

    /// Total number of slots, dead ones included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live AND gates.
    pub fn num_gates(&self) -> usize {
        self.live_gates
    }

    pub fn num_pis(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_pos(&self) -> usize {
        self.outputs.len()
    }

    pub fn pi_at(&self, index: usize) -> NodeRef {
        self.inputs[index]
    }

    pub fn po_at(&self, index: usize) -> Signal {
        self.outputs[index]
    }

    pub fn inputs(&self) -> &[NodeRef] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }

    /// Bumped on every mutation that can change node levels.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -- Fanout accounting --------------------------------------------------

    pub fn fanout_size(&self, node: NodeRef) -> usize {
        self.nodes[node.id].fanout as usize
    }

    pub fn incr_fanout_size(&mut self, node: NodeRef) -> usize {
        let slot = &mut self.nodes[node.id];
        slot.fanout += 1;
        slot.fanout as usize
    }

    /// Decrements the fanout counter and returns the new value. Underflow is a
    /// caller bug.
    pub fn decr_fanout_size(&mut self, node: NodeRef) -> usize {
        let slot = &mut self.nodes[node.id];
        assert!(
            slot.fanout > 0,
            "decr_fanout_size: fanout underflow on {}",
            node
        );
        slot.fanout -= 1;
        slot.fanout as usize
    }

    // -- Traversal ----------------------------------------------------------

    /// Live AND gates in index order.
    pub fn gates(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.nodes.iter().enumerate().filter_map(|(id, slot)| {
            if !slot.dead && matches!(slot.kind, NodeKind::And { .. }) {
                Some(NodeRef::new(id))
            } else {
                None
            }
        })
    }

    /// Visits every live node (constant, inputs and gates).
    pub fn foreach_node<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(NodeRef) -> ControlFlow<()>,
    {
        for (id, slot) in self.nodes.iter().enumerate() {
            if slot.dead {
                continue;
            }
            f(NodeRef::new(id))?;
        }
        ControlFlow::Continue(())
    }

    pub fn foreach_gate<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(NodeRef) -> ControlFlow<()>,
    {
        for gate in self.gates() {
            f(gate)?;
        }
        ControlFlow::Continue(())
    }

    pub fn foreach_pi<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(NodeRef) -> ControlFlow<()>,
    {
        for input in &self.inputs {
            f(*input)?;
        }
        ControlFlow::Continue(())
    }

    pub fn foreach_po<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Signal) -> ControlFlow<()>,
    {
        for output in &self.outputs {
            f(*output)?;
        }
        ControlFlow::Continue(())
    }

    /// Visits the fan-ins of `node` in creation order; constants and inputs
    /// have none.
    pub fn foreach_fanin<F>(&self, node: NodeRef, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Signal) -> ControlFlow<()>,
    {
        if let Some(fanins) = self.fanins(node) {
            for fanin in fanins {
                f(fanin)?;
            }
        }
        ControlFlow::Continue(())
    }

    // -- Scratch fields -----------------------------------------------------

    pub fn value(&self, node: NodeRef) -> u32 {
        self.nodes[node.id].value
    }

    pub fn set_value(&mut self, node: NodeRef, value: u32) {
        self.nodes[node.id].value = value;
    }

    pub fn incr_value(&mut self, node: NodeRef) -> u32 {
        let slot = &mut self.nodes[node.id];
        slot.value += 1;
        slot.value
    }

    pub fn decr_value(&mut self, node: NodeRef) -> u32 {
        let slot = &mut self.nodes[node.id];
        slot.value = slot.value.saturating_sub(1);
        slot.value
    }

    pub fn clear_values(&mut self) {
        for slot in self.nodes.iter_mut() {
            slot.value = 0;
        }
    }

    pub fn visited(&self, node: NodeRef) -> u32 {
        self.nodes[node.id].visited
    }

    pub fn set_visited(&mut self, node: NodeRef, visited: u32) {
        self.nodes[node.id].visited = visited;
    }

    pub fn clear_visited(&mut self) {
        for slot in self.nodes.iter_mut() {
            slot.visited = 0;
        }
    }

    pub fn color(&self, node: NodeRef) -> u32 {
        self.nodes[node.id].color
    }

    pub fn set_color(&mut self, node: NodeRef, color: u32) {
        self.nodes[node.id].color = color;
    }

    /// Returns a fresh traversal color no node currently carries.
    pub fn new_color(&mut self) -> u32 {
        self.trav_color += 1;
        self.trav_color
    }

    pub fn current_color(&self) -> u32 {
        self.trav_color
    }

    // -- Events -------------------------------------------------------------

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub(crate) fn notify(&mut self, event: &NetworkEvent) {
        if !self.listeners.is_empty() {
            self.listeners.notify(event);
        }
    }

    // -- Invariants ---------------------------------------------------------

    pub(crate) fn validate_live(&self, node: NodeRef, context: &str) {
        debug_assert!(
            node.id < self.nodes.len(),
            "{}: {} out of bounds (size = {})",
            context,
            node,
            self.nodes.len()
        );
        debug_assert!(
            !self.nodes[node.id].dead,
            "{}: {} refers to a dead node",
            context,
            node
        );
    }

    /// Checks internal invariants, panicking if any are violated. Does nothing
    /// in release builds.
    /// - Fan-ins of live gates and every output refer to live, in-bounds
    ///   nodes.
    /// - Every live gate is registered in the structural hash under its own
    ///   fan-ins, and the table holds nothing else.
    pub fn check_invariants_with_debug_assert(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let size = self.nodes.len();
        let mut live_gates = 0;
        for (id, slot) in self.nodes.iter().enumerate() {
            if slot.dead {
                continue;
            }
            if let NodeKind::And { a, b } = slot.kind {
                live_gates += 1;
                for fanin in [a, b] {
                    assert!(
                        fanin.node.id < size,
                        "gate %{}: fan-in {} out of bounds (size = {})",
                        id,
                        fanin,
                        size
                    );
                    assert!(
                        !self.nodes[fanin.node.id].dead,
                        "gate %{}: fan-in {} is dead",
                        id,
                        fanin
                    );
                }
                assert!(a < b, "gate %{}: fan-ins not in canonical order", id);
                let key = StrashKey { lhs: a, rhs: b };
                assert_eq!(
                    self.strash.get(&key),
                    Some(&NodeRef::new(id)),
                    "gate %{} missing from structural hash",
                    id
                );
            }
        }
        assert_eq!(
            live_gates, self.live_gates,
            "live gate counter out of sync"
        );
        assert_eq!(
            self.strash.len(),
            live_gates,
            "structural hash holds entries for dead gates"
        );
        for (i, output) in self.outputs.iter().enumerate() {
            assert!(
                output.node.id < size && !self.nodes[output.node.id].dead,
                "output {} refers to invalid node {}",
                i,
                output
            );
        }
    }
}

/// Textual dump: live gates in topological order followed by outputs.
impl fmt::Display for Aig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input_str = self
            .inputs
            .iter()
            .map(|input| input.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        writeln!(f, "aig({}) {{", input_str)?;
        for node in crate::aig::topo::topo_order(self) {
            if let NodeKind::And { a, b } = self.nodes[node.id].kind {
                writeln!(f, "  {} = and({}, {})", node, a, b)?;
            }
        }
        for (i, output) in self.outputs.iter().enumerate() {
            writeln!(f, "  o{} = {}", i, output)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_and_deduplicates() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let f = aig.create_and(a, !b);
        let size = aig.size();
        assert_eq!(aig.create_and(!b, a), f);
        assert_eq!(aig.create_and(a, !b), f);
        assert_eq!(aig.size(), size);
        assert_eq!(aig.num_gates(), 1);
        assert_eq!(aig.fanout_size(a.node), 1);
        assert_eq!(aig.fanout_size(b.node), 1);
        aig.check_invariants_with_debug_assert();
    }

    #[test]
    fn test_trivial_fold_does_not_allocate() {
        let mut aig = Aig::new();
        let x = aig.create_pi();
        let size = aig.size();
        assert_eq!(aig.create_and(x, !x), aig.get_constant(false));
        assert_eq!(aig.create_and(x, x), x);
        assert_eq!(aig.create_and(x, aig.get_constant(true)), x);
        assert_eq!(aig.create_and(aig.get_constant(false), x), aig.get_constant(false));
        assert_eq!(aig.size(), size);
        assert_eq!(aig.fanout_size(x.node), 0);
    }

    #[test]
    fn test_kinds_and_counts() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let f = aig.create_or(a, b);
        aig.create_po(f);
        aig.create_po(f);
        assert!(aig.is_constant(NodeRef::CONSTANT));
        assert!(aig.is_pi(a.node));
        assert!(aig.is_and(f.node));
        assert!(f.complemented);
        assert_eq!(aig.num_pis(), 2);
        assert_eq!(aig.num_pos(), 2);
        assert_eq!(aig.fanout_size(f.node), 2);
        assert_eq!(aig.fanin_size(f.node), 2);
        assert_eq!(aig.fanin_size(a.node), 0);
        assert_eq!(aig.pi_at(1), b.node);
        assert_eq!(aig.po_at(0), f);
    }

    #[test]
    fn test_xor_dedups_with_reordered_operands() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let x0 = aig.create_xor(a, b);
        let gates = aig.num_gates();
        let x1 = aig.create_xor(b, a);
        assert_eq!(x0, x1);
        assert_eq!(aig.num_gates(), gates);
        assert_eq!(aig.create_xnor(a, b), !x0);
        assert_eq!(aig.create_nor(a, b), !aig.create_or(a, b));
    }

    #[test]
    fn test_foreach_early_termination() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let c = aig.create_pi();
        let ab = aig.create_and(a, b);
        let _bc = aig.create_and(b, c);
        let mut seen = Vec::new();
        let flow = aig.foreach_gate(|g| {
            seen.push(g);
            ControlFlow::Break(())
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, vec![ab.node]);

        let mut fanins = Vec::new();
        let _ = aig.foreach_fanin(ab.node, |s| {
            fanins.push(s);
            ControlFlow::Continue(())
        });
        assert_eq!(fanins, vec![a, b]);

        let mut nodes = 0;
        let _ = aig.foreach_node(|_| {
            nodes += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(nodes, 6);
    }

    #[test]
    fn test_scratch_fields_and_colors() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        aig.set_value(a.node, 3);
        assert_eq!(aig.incr_value(a.node), 4);
        assert_eq!(aig.decr_value(a.node), 3);
        aig.clear_values();
        assert_eq!(aig.value(a.node), 0);
        aig.set_visited(a.node, 9);
        assert_eq!(aig.visited(a.node), 9);
        aig.clear_visited();
        assert_eq!(aig.visited(a.node), 0);
        let color = aig.new_color();
        aig.set_color(a.node, color);
        assert_eq!(aig.color(a.node), aig.current_color());
        assert!(aig.new_color() > color);
    }

    #[test]
    fn test_listeners_observe_creation() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let added: Rc<RefCell<Vec<NodeRef>>> = Rc::new(RefCell::new(Vec::new()));
        let mut aig = Aig::new();
        let sink = Rc::clone(&added);
        let id = aig.subscribe(Box::new(move |event| {
            if let NetworkEvent::Added(node) = event {
                sink.borrow_mut().push(*node);
            }
        }));
        let a = aig.create_pi();
        let b = aig.create_pi();
        let ab = aig.create_and(a, b);
        // A structural hash hit allocates nothing and notifies nothing.
        aig.create_and(b, a);
        assert!(aig.unsubscribe(id));
        aig.create_and(a, !b);
        assert_eq!(*added.borrow(), vec![a.node, b.node, ab.node]);
    }

    #[test]
    fn test_clone_drops_listeners_keeps_structure() {
        let mut aig = Aig::new();
        aig.subscribe(Box::new(|_| {}));
        let a = aig.create_pi();
        let b = aig.create_pi();
        let f = aig.create_and(a, b);
        aig.create_po(f);
        let copy = aig.clone();
        assert_eq!(copy.to_string(), aig.to_string());
        assert_eq!(copy.num_gates(), 1);
    }

    #[test]
    #[should_panic(expected = "fanout underflow")]
    fn test_fanout_underflow_panics() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        aig.decr_fanout_size(a.node);
    }

    #[test]
    fn test_display() {
        let mut aig = Aig::new();
        let a = aig.create_pi();
        let b = aig.create_pi();
        let f = aig.create_and(a, !b);
        aig.create_po(!f);
        assert_eq!(
            aig.to_string(),
            "aig(%1, %2) {\n  %3 = and(%1, not(%2))\n  o0 = not(%3)\n}"
        );
    }
}
