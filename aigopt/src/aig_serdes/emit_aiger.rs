// SPDX-License-Identifier: Apache-2.0

//! Emits an `Aig` as ASCII AIGER ("aag").
//!
//! Variables are renumbered densely: the constant is variable 0, inputs take
//! 1..=I in input order and live gates follow in topological order, so every
//! AND line only references variables defined above it. Dead slots are not
//! emitted.

use std::fmt::Write;

use crate::aig::topo::topo_order_and_cycle_check;
use crate::aig::{Aig, NodeKind, Signal};

pub fn emit_aiger(aig: &Aig) -> Result<String, String> {
    let (order, cycle) = topo_order_and_cycle_check(aig);
    if let Some(not_visited) = cycle {
        return Err(format!(
            "cannot emit cyclic network; nodes on or behind a cycle: {:?}",
            not_visited
        ));
    }

    let mut var_of: Vec<Option<usize>> = vec![None; aig.size()];
    var_of[0] = Some(0);
    for (i, input) in aig.inputs().iter().enumerate() {
        var_of[input.id] = Some(i + 1);
    }
    let mut gates: Vec<(usize, Signal, Signal)> = Vec::new();
    let mut next_var = aig.num_pis() + 1;
    for node in order {
        if let NodeKind::And { a, b } = aig.kind(node) {
            var_of[node.id] = Some(next_var);
            gates.push((next_var, *a, *b));
            next_var += 1;
        }
    }

    let literal = |signal: Signal| -> Result<usize, String> {
        var_of[signal.node.id]
            .map(|var| (var << 1) | usize::from(signal.complemented))
            .ok_or_else(|| format!("signal {} refers to a node that is not live", signal))
    };

    let num_inputs = aig.num_pis();
    let num_ands = gates.len();
    let mut out = String::new();
    // Header: aag M I L O A
    writeln!(
        out,
        "aag {} {} 0 {} {}",
        num_inputs + num_ands,
        num_inputs,
        aig.num_pos(),
        num_ands
    )
    .map_err(|e| e.to_string())?;
    for var in 1..=num_inputs {
        writeln!(out, "{}", var << 1).map_err(|e| e.to_string())?;
    }
    for output in aig.outputs() {
        writeln!(out, "{}", literal(*output)?).map_err(|e| e.to_string())?;
    }
    for (var, a, b) in gates {
        let (la, lb) = (literal(a)?, literal(b)?);
        // Conventional ordering: lhs > rhs0 >= rhs1.
        let (rhs0, rhs1) = if la >= lb { (la, lb) } else { (lb, la) };
        writeln!(out, "{} {} {}", var << 1, rhs0, rhs1).map_err(|e| e.to_string())?;
    }
    writeln!(out, "c").map_err(|e| e.to_string())?;
    writeln!(out, "emitted by aigopt").map_err(|e| e.to_string())?;
    Ok(out)
}
