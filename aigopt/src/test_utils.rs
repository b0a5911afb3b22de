// SPDX-License-Identifier: Apache-2.0

//! Canned graphs and a random network generator shared by unit tests,
//! integration tests and the driver.

use rand::Rng;

use crate::aig::{Aig, Signal};

pub struct TestGraph {
    pub aig: Aig,
    pub i0: Signal,
    pub i1: Signal,
    pub i2: Signal,
    pub i3: Signal,
    pub a: Signal,
    pub b: Signal,
    pub c: Signal,
    pub o: Signal,
}

/// Creates a common graph structure for testing.
/// Graph:
/// i0 --\
///       AND(a) --\
/// i1 --|          \
///       AND(b) -- AND(o) [output]
/// i2 --|
///       AND(c) [output]
/// i3 --/
pub fn setup_simple_graph() -> TestGraph {
    let mut aig = Aig::new();
    let i0 = aig.create_pi();
    let i1 = aig.create_pi();
    let i2 = aig.create_pi();
    let i3 = aig.create_pi();

    let a = aig.create_and(i0, i1);
    let b = aig.create_and(i1, i2);
    let c = aig.create_and(i2, i3);

    let o = aig.create_and(a, b);
    aig.create_po(o);
    aig.create_po(c);

    TestGraph {
        aig,
        i0,
        i1,
        i2,
        i3,
        a,
        b,
        c,
        o,
    }
}

pub struct AssociativityGraph {
    pub aig: Aig,
    pub i0: Signal,
    pub i1: Signal,
    pub p: Signal,
    pub b: Signal,
    pub a: Signal,
    pub q: Signal,
    pub n: Signal,
}

/// `n = AND(p, AND(AND(i0, i1), b))`: the critical path runs through `a`,
/// while `p` and `b` are shallow.
pub fn setup_associativity_graph() -> AssociativityGraph {
    let mut aig = Aig::new();
    let i0 = aig.create_pi();
    let i1 = aig.create_pi();
    let p = aig.create_pi();
    let b = aig.create_pi();
    let a = aig.create_and(i0, i1);
    let q = aig.create_and(a, b);
    let n = aig.create_and(p, q);
    aig.create_po(n);
    AssociativityGraph {
        aig,
        i0,
        i1,
        p,
        b,
        a,
        q,
        n,
    }
}

pub struct DistributivityGraph {
    pub aig: Aig,
    pub a: Signal,
    pub b: Signal,
    pub c: Signal,
    pub x: Signal,
    pub y: Signal,
    pub n: Signal,
}

/// `n = AND(AND(a, c), AND(b, c))` with single-fanout inner gates.
pub fn setup_distributivity_graph() -> DistributivityGraph {
    let mut aig = Aig::new();
    let a = aig.create_pi();
    let b = aig.create_pi();
    let c = aig.create_pi();
    let x = aig.create_and(a, c);
    let y = aig.create_and(b, c);
    let n = aig.create_and(x, y);
    aig.create_po(n);
    DistributivityGraph {
        aig,
        a,
        b,
        c,
        x,
        y,
        n,
    }
}

pub struct Distributivity3Graph {
    pub aig: Aig,
    pub a: Signal,
    pub b: Signal,
    pub c: Signal,
    pub d: Signal,
    pub w: Signal,
    pub z: Signal,
    pub n: Signal,
}

/// `n = AND(!AND(!AND(b, a), c), d)` where `b` is a level-3 chain and the
/// other operands are inputs, so the root sits at level 6.
pub fn setup_distributivity3_graph() -> Distributivity3Graph {
    let mut aig = Aig::new();
    let chain_inputs: Vec<Signal> = (0..4).map(|_| aig.create_pi()).collect();
    let b = chain_of_ands(&mut aig, &chain_inputs);
    let a = aig.create_pi();
    let c = aig.create_pi();
    let d = aig.create_pi();
    let w = aig.create_and(b, a);
    let z = aig.create_and(!w, c);
    let n = aig.create_and(!z, d);
    aig.create_po(n);
    Distributivity3Graph {
        aig,
        a,
        b,
        c,
        d,
        w,
        z,
        n,
    }
}

/// Left-leaning chain `AND(AND(AND(s0, s1), s2), ...)`. Returns constant true
/// for an empty slice.
pub fn chain_of_ands(aig: &mut Aig, signals: &[Signal]) -> Signal {
    let Some((first, rest)) = signals.split_first() else {
        return aig.get_constant(true);
    };
    rest.iter()
        .fold(*first, |acc, signal| aig.create_and(acc, *signal))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomAigOptions {
    pub inputs: usize,
    /// Number of AND construction attempts; folding and structural hashing
    /// can make the final gate count smaller.
    pub gates: usize,
    pub outputs: usize,
    pub complement_probability: f64,
}

impl Default for RandomAigOptions {
    fn default() -> Self {
        Self {
            inputs: 8,
            gates: 64,
            outputs: 4,
            complement_probability: 0.5,
        }
    }
}

/// Operands are drawn from everything built so far; one of the two comes
/// from the most recent signals so the result has some depth. The first
/// output is always the last signal built.
pub fn random_aig<R: Rng>(rng: &mut R, options: &RandomAigOptions) -> Aig {
    const RECENT_WINDOW: usize = 8;
    let mut aig = Aig::new();
    let mut pool: Vec<Signal> = (0..options.inputs).map(|_| aig.create_pi()).collect();
    if pool.is_empty() {
        pool.push(aig.get_constant(false));
    }
    let p = options.complement_probability.clamp(0.0, 1.0);
    for _ in 0..options.gates {
        let recent_start = pool.len().saturating_sub(RECENT_WINDOW);
        let lhs = pool[rng.gen_range(recent_start..pool.len())];
        let rhs = pool[rng.gen_range(0..pool.len())];
        let lhs = lhs.complement_if(rng.gen_bool(p));
        let rhs = rhs.complement_if(rng.gen_bool(p));
        let gate = aig.create_and(lhs, rhs);
        if aig.is_and(gate.node) && !pool.iter().any(|s| s.node == gate.node) {
            pool.push(gate.node.into());
        }
    }
    for i in 0..options.outputs {
        let signal = if i == 0 {
            pool[pool.len() - 1]
        } else {
            pool[rng.gen_range(0..pool.len())]
        };
        aig.create_po(signal.complement_if(rng.gen_bool(p)));
    }
    aig
}
