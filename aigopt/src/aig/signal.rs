// SPDX-License-Identifier: Apache-2.0

//! Primitive addressing for the AIG: a `NodeRef` is an index into node
//! storage and a `Signal` is a node together with an edge polarity.

use std::fmt;
use std::ops::Not;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeRef {
    pub id: usize,
}

impl NodeRef {
    pub const CONSTANT: NodeRef = NodeRef { id: 0 };

    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.id)
    }
}

/// An edge in the AIG. Ordering is by node id first and then polarity
/// (asserted before complemented); structural hashing relies on this being a
/// total order.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Signal {
    pub node: NodeRef,
    pub complemented: bool,
}

impl Signal {
    pub fn new(node: NodeRef, complemented: bool) -> Self {
        Self { node, complemented }
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            node: self.node,
            complemented: !self.complemented,
        }
    }

    /// Applies an extra inversion when `complement` is set.
    #[must_use]
    pub fn complement_if(&self, complement: bool) -> Self {
        Self {
            node: self.node,
            complemented: self.complemented ^ complement,
        }
    }

    pub fn non_complemented(&self) -> Option<NodeRef> {
        if self.complemented {
            None
        } else {
            Some(self.node)
        }
    }

    /// AIGER-style literal: `2 * id + complemented`.
    pub fn to_literal(&self) -> usize {
        (self.node.id << 1) | usize::from(self.complemented)
    }

    pub fn from_literal(literal: usize) -> Self {
        Self {
            node: NodeRef { id: literal >> 1 },
            complemented: literal & 1 == 1,
        }
    }
}

impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Signal {
        self.negate()
    }
}

impl From<NodeRef> for Signal {
    fn from(node: NodeRef) -> Self {
        Signal {
            node,
            complemented: false,
        }
    }
}

impl From<&NodeRef> for Signal {
    fn from(node: &NodeRef) -> Self {
        Signal {
            node: *node,
            complemented: false,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complemented {
            write!(f, "not({})", self.node)
        } else {
            write!(f, "{}", self.node)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate_is_involution() {
        let s = Signal::from(NodeRef::new(7));
        assert!(!s.complemented);
        assert!((!s).complemented);
        assert_eq!(!!s, s);
        assert_eq!(s.negate().node, s.node);
    }

    #[test]
    fn test_ordering_is_node_then_polarity() {
        let a = Signal::new(NodeRef::new(3), true);
        let b = Signal::new(NodeRef::new(4), false);
        let c = Signal::new(NodeRef::new(4), true);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_literal_conversion() {
        let s = Signal::new(NodeRef::new(5), true);
        assert_eq!(s.to_literal(), 11);
        assert_eq!(Signal::from_literal(11), s);
        assert_eq!(Signal::from_literal(10), !s);
    }

    #[test]
    fn test_display() {
        let s = Signal::new(NodeRef::new(2), true);
        assert_eq!(format!("{}", s), "not(%2)");
        assert_eq!(format!("{}", !s), "%2");
    }
}
