// SPDX-License-Identifier: Apache-2.0

//! Canonical form of a two-input AND used for structural hashing.
//!
//! Every gate constructor goes through `normalize_and` so that `AND(a, b)` and
//! `AND(b, a)` map to the same key and trivially-reducible gates never reach
//! the hash table.

use crate::aig::signal::{NodeRef, Signal};

/// Ordered fan-in pair of an AND gate; `lhs <= rhs` always holds.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct StrashKey {
    pub lhs: Signal,
    pub rhs: Signal,
}

impl StrashKey {
    pub fn fanins(&self) -> [Signal; 2] {
        [self.lhs, self.rhs]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndForm {
    /// The AND reduces to an already-existing signal.
    Folded(Signal),
    /// A genuine gate is required; look it up or create it under this key.
    Gate(StrashKey),
}

pub fn constant_false() -> Signal {
    Signal::new(NodeRef::CONSTANT, false)
}

pub fn constant_true() -> Signal {
    Signal::new(NodeRef::CONSTANT, true)
}

/// Applies trivial-case folding and then orders the operands.
///
/// * `AND(x, 0) = 0`
/// * `AND(x, 1) = x`
/// * `AND(x, x) = x`
/// * `AND(x, !x) = 0`
pub fn normalize_and(f: Signal, g: Signal) -> AndForm {
    let (lhs, rhs) = if f <= g { (f, g) } else { (g, f) };
    // Node 0 sorts first, so a constant operand is always `lhs`.
    if lhs.node == NodeRef::CONSTANT {
        return if lhs.complemented {
            AndForm::Folded(rhs)
        } else {
            AndForm::Folded(constant_false())
        };
    }
    if lhs.node == rhs.node {
        return if lhs.complemented == rhs.complemented {
            AndForm::Folded(lhs)
        } else {
            AndForm::Folded(constant_false())
        };
    }
    AndForm::Gate(StrashKey { lhs, rhs })
}
