// SPDX-License-Identifier: Apache-2.0

//! Network-wide substitution of a node by an equivalent signal, and the
//! dead-node cleanup that follows it.

use std::collections::{HashMap, VecDeque};

use crate::aig::events::NetworkEvent;
use crate::aig::network::{Aig, NodeKind};
use crate::aig::signal::{NodeRef, Signal};
use crate::aig::strash::{self, AndForm, StrashKey};

impl Aig {
    /// Redirects every use of `old` (gate fan-ins and primary outputs) to
    /// `new`, then retires `old` and whatever part of its fan-in cone is left
    /// without consumers.
    ///
    /// Rewiring a consumer can make it trivially reducible or structurally
    /// identical to an existing gate; such consumers are substituted in turn.
    pub fn substitute_node(&mut self, old: NodeRef, new: Signal) {
        self.validate_live(old, "substitute_node");
        self.validate_live(new.node, "substitute_node");
        let mut old_to_new: HashMap<NodeRef, Signal> = HashMap::new();
        let mut pending: VecDeque<(NodeRef, Signal)> = VecDeque::new();

        // Queued replacements are pinned so that no cleanup cascade can retire
        // them before they are wired in.
        self.incr_fanout_size(new.node);
        pending.push_back((old, new));
        let (root, root_new) = (old, new);
        let mut steps = 0usize;

        while let Some((old, queued)) = pending.pop_front() {
            steps += 1;
            let new = resolve(&old_to_new, queued);
            if !self.is_dead(old) && new.node != old {
                debug_assert!(
                    !self.is_dead(new.node),
                    "substitute_node: replacement {} for {} is dead",
                    new,
                    old
                );
                let consumers: Vec<NodeRef> = self
                    .gates()
                    .filter(|gate| {
                        self.nodes[gate.id]
                            .fanins()
                            .is_some_and(|fanins| fanins.iter().any(|f| f.node == old))
                    })
                    .collect();
                for consumer in consumers {
                    if let Some(follow_up) = self.replace_in_node(consumer, old, new) {
                        self.incr_fanout_size(follow_up.1.node);
                        pending.push_back(follow_up);
                    }
                }
                self.replace_in_outputs(old, new);
                old_to_new.insert(old, new);
                if self.fanout_size(old) == 0 {
                    self.take_out_node(old);
                }
            }
            self.unpin(queued.node);
        }
        log::trace!(
            "substitute_node: {} -> {} took {} step(s)",
            root,
            root_new,
            steps
        );
    }

    /// Rewrites the fan-in of `node` that refers to `old` so that it refers
    /// to `new` instead, composing polarities.
    ///
    /// Returns `Some((node, replacement))` without touching `node` when the
    /// rewired gate folds to a trivial case or already exists in the
    /// structural hash; the caller is expected to substitute `node` by
    /// `replacement`. Returns `None` when `node` was rewired in place or does
    /// not consume `old`.
    pub fn replace_in_node(
        &mut self,
        node: NodeRef,
        old: NodeRef,
        new: Signal,
    ) -> Option<(NodeRef, Signal)> {
        let [a, b] = self.fanins(node)?;
        let (kept, replaced) = if a.node == old {
            (b, a)
        } else if b.node == old {
            (a, b)
        } else {
            return None;
        };
        let replacement = new.complement_if(replaced.complemented);

        let key = match strash::normalize_and(kept, replacement) {
            AndForm::Folded(signal) => return Some((node, signal)),
            AndForm::Gate(key) => key,
        };
        if let Some(existing) = self.strash.get(&key) {
            if *existing != node {
                return Some((node, (*existing).into()));
            }
        }

        let old_key = StrashKey { lhs: a, rhs: b };
        if self.strash.get(&old_key) == Some(&node) {
            self.strash.remove(&old_key);
        }
        self.nodes[node.id].kind = NodeKind::And {
            a: key.lhs,
            b: key.rhs,
        };
        self.strash.insert(key, node);
        self.decr_fanout_size(old);
        self.incr_fanout_size(replacement.node);
        self.generation += 1;
        self.notify(&NetworkEvent::Modified {
            node,
            old_fanins: [a, b],
        });
        None
    }

    /// Rewires every primary output driven by `old`; returns how many were
    /// changed.
    pub fn replace_in_outputs(&mut self, old: NodeRef, new: Signal) -> usize {
        let mut replaced = 0;
        for i in 0..self.outputs.len() {
            let output = self.outputs[i];
            if output.node != old {
                continue;
            }
            self.outputs[i] = new.complement_if(output.complemented);
            self.decr_fanout_size(old);
            self.incr_fanout_size(new.node);
            replaced += 1;
            self.notify(&NetworkEvent::OutputModified { index: i, old: output });
        }
        if replaced > 0 {
            self.generation += 1;
        }
        replaced
    }

    /// Retires `node` and, transitively, every fan-in whose fanout drops to
    /// zero as a result. The constant and primary inputs are never retired.
    pub fn take_out_node(&mut self, node: NodeRef) {
        if !self.is_and(node) || self.is_dead(node) {
            return;
        }
        let mut worklist = vec![node];
        while let Some(current) = worklist.pop() {
            let slot = &mut self.nodes[current.id];
            if slot.dead {
                continue;
            }
            slot.dead = true;
            let Some([a, b]) = slot.fanins() else {
                continue;
            };
            let key = StrashKey { lhs: a, rhs: b };
            if self.strash.get(&key) == Some(&current) {
                self.strash.remove(&key);
            }
            self.live_gates -= 1;
            self.generation += 1;
            self.notify(&NetworkEvent::Deleted(current));
            for fanin in [a, b] {
                if self.decr_fanout_size(fanin.node) == 0 && self.is_and(fanin.node) {
                    worklist.push(fanin.node);
                }
            }
        }
    }

    /// Drops one pin reference and retires the node if that left it unused.
    fn unpin(&mut self, node: NodeRef) {
        if self.decr_fanout_size(node) == 0 {
            self.take_out_node(node);
        }
    }
}

/// Follows earlier substitutions so a replacement never names a node that has
/// itself been substituted away.
fn resolve(old_to_new: &HashMap<NodeRef, Signal>, mut signal: Signal) -> Signal {
    while let Some(next) = old_to_new.get(&signal.node) {
        signal = next.complement_if(signal.complemented);
    }
    signal
}
