// SPDX-License-Identifier: Apache-2.0

//! Mutation notifications for external bookkeeping (name maps, overlay
//! views) that must stay in sync with an `Aig`.

use std::fmt;

use crate::aig::signal::{NodeRef, Signal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// A node (primary input or AND gate) was allocated.
    Added(NodeRef),
    /// A gate's fan-ins were rewritten in place during substitution.
    Modified {
        node: NodeRef,
        old_fanins: [Signal; 2],
    },
    /// A gate was retired.
    Deleted(NodeRef),
    /// A primary output was appended at this index.
    OutputAdded(usize),
    /// Primary output `index` was rewired away from `old`.
    OutputModified { index: usize, old: Signal },
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ListenerId(pub(crate) usize);

pub type Listener = Box<dyn FnMut(&NetworkEvent)>;

/// Ordered observer list; callbacks run synchronously in subscription order.
#[derive(Default)]
pub struct Listeners {
    next_id: usize,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, event: &NetworkEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
