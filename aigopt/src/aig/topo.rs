// SPDX-License-Identifier: Apache-2.0

//! Topological ordering of live nodes.
//!
//! Index order is a valid topological order for a freshly built network, but
//! substitution can rewire a gate to a higher-indexed replacement, so every
//! consumer of level or simulation data goes through these helpers instead.

use std::collections::VecDeque;

use crate::aig::network::Aig;
use crate::aig::signal::NodeRef;

/// Returns (topological order, None) if the live graph is acyclic, or
/// (partial order, Some(not_visited_nodes)) if a cycle is detected.
pub fn topo_order_and_cycle_check(aig: &Aig) -> (Vec<NodeRef>, Option<Vec<NodeRef>>) {
    let size = aig.size();
    let mut indegree = vec![0usize; size];
    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); size];
    let mut live = 0usize;
    for (id, slot) in aig.nodes.iter().enumerate() {
        if slot.dead {
            continue;
        }
        live += 1;
        if let Some([a, b]) = slot.fanins() {
            indegree[id] = 2;
            consumers[a.node.id].push(id);
            consumers[b.node.id].push(id);
        }
    }
    let mut queue: VecDeque<usize> = (0..size)
        .filter(|id| !aig.nodes[*id].dead && indegree[*id] == 0)
        .collect();
    let mut topo: Vec<NodeRef> = Vec::with_capacity(live);
    while let Some(id) = queue.pop_front() {
        topo.push(NodeRef::new(id));
        for &consumer in &consumers[id] {
            indegree[consumer] -= 1;
            if indegree[consumer] == 0 {
                queue.push_back(consumer);
            }
        }
    }
    if topo.len() != live {
        let mut seen = vec![false; size];
        for node in &topo {
            seen[node.id] = true;
        }
        let not_visited = (0..size)
            .filter(|id| !aig.nodes[*id].dead && !seen[*id])
            .map(NodeRef::new)
            .collect();
        (topo, Some(not_visited))
    } else {
        (topo, None)
    }
}

/// Live nodes with fan-ins before consumers. Panics if the graph is cyclic.
pub fn topo_order(aig: &Aig) -> Vec<NodeRef> {
    let (order, cycle) = topo_order_and_cycle_check(aig);
    if let Some(not_visited) = cycle {
        panic!(
            "Cycle detected in AIG: topological sort visited {} nodes; not visited: {:?}",
            order.len(),
            not_visited
        );
    }
    order
}

pub fn debug_assert_no_cycles(aig: &Aig, context: &str) {
    if !cfg!(debug_assertions) {
        return;
    }
    let (order, cycle) = topo_order_and_cycle_check(aig);
    if let Some(not_visited) = cycle {
        log::error!(
            "[{}] Cycle detected! Not visited: {:?}",
            context,
            not_visited
        );
        for node in &not_visited {
            log::error!("[{}] Node {}: {:?}", context, node, aig.kind(*node));
        }
        panic!(
            "Cycle detected in graph (context: {}): topological sort visited {} nodes, {} left. See logs for details.",
            context,
            order.len(),
            not_visited.len()
        );
    }
}

/// Nodes in the transitive fan-in of the primary outputs, in topological
/// order. Inputs and the constant are included only when reached.
pub fn output_cone(aig: &Aig) -> Vec<NodeRef> {
    let mut in_cone = vec![false; aig.size()];
    let mut worklist: Vec<NodeRef> = aig.outputs().iter().map(|o| o.node).collect();
    while let Some(node) = worklist.pop() {
        if in_cone[node.id] {
            continue;
        }
        in_cone[node.id] = true;
        if let Some([a, b]) = aig.fanins(node) {
            worklist.push(a.node);
            worklist.push(b.node);
        }
    }
    topo_order(aig)
        .into_iter()
        .filter(|node| in_cone[node.id])
        .collect()
}
