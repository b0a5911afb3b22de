// SPDX-License-Identifier: Apache-2.0

//! Loads an ASCII AIGER ("aag") file into an `Aig`.
//!
//! Only combinational files (L == 0) are accepted. AND definitions may appear
//! in any order as long as they form a DAG. The symbol table is validated but
//! names are not retained, and the comment section is ignored.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::aig::{Aig, Signal};

pub fn load_aiger_from_path(path: &Path) -> Result<Aig, String> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    load_aiger(&src)
}

fn next_non_empty_line<'a>(iter: &mut std::str::Lines<'a>) -> Option<&'a str> {
    iter.by_ref().find(|line| !line.trim().is_empty())
}

/// Header counts are untrusted; vectors sized from them grow past this.
const MAX_PREALLOC: u32 = 1 << 16;

#[derive(Debug)]
struct AndLine {
    lhs_var: u32,
    rhs0_lit: u32,
    rhs1_lit: u32,
}

pub fn load_aiger(src: &str) -> Result<Aig, String> {
    let mut lines = src.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| "empty AIGER input".to_string())?;
    let header_tokens: Vec<&str> = header_line.split_whitespace().collect();
    if header_tokens.len() != 6 {
        return Err(format!(
            "expected 6 tokens in AIGER header, got {} (\"{}\")",
            header_tokens.len(),
            header_line
        ));
    }
    if header_tokens[0] != "aag" {
        return Err(format!(
            "only ASCII-AIGER (aag) is supported; got '{}'",
            header_tokens[0]
        ));
    }

    let parse_u32 = |s: &str, field: &str| -> Result<u32, String> {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid {} value '{}': {}", field, s, e))
    };

    let m = parse_u32(header_tokens[1], "M")?;
    let i = parse_u32(header_tokens[2], "I")?;
    let l = parse_u32(header_tokens[3], "L")?;
    let o = parse_u32(header_tokens[4], "O")?;
    let a = parse_u32(header_tokens[5], "A")?;

    if l != 0 {
        return Err("latch count (L) must be zero; sequential AIGER is not supported".to_string());
    }
    if u64::from(i) + u64::from(a) > u64::from(m) {
        return Err(format!(
            "header declares I + A = {} > M = {}",
            u64::from(i) + u64::from(a),
            m
        ));
    }

    let mut aig = Aig::new();
    let mut var_to_signal: HashMap<u32, Signal> = HashMap::new();
    var_to_signal.insert(0, aig.get_constant(false));

    for _ in 0..i {
        let line = next_non_empty_line(&mut lines)
            .ok_or_else(|| format!("expected {} input lines but found fewer", i))?;
        let lit = parse_u32(line, "input literal")?;
        if lit & 1 != 0 {
            return Err(format!(
                "input literal must be positive, got negated literal {}",
                lit
            ));
        }
        let var = lit >> 1;
        if var == 0 {
            return Err("input literal refers to constant false (0)".to_string());
        }
        if var > m {
            return Err(format!("input variable {} exceeds M = {}", var, m));
        }
        if var_to_signal.contains_key(&var) {
            return Err(format!("duplicate input variable index {}", var));
        }
        var_to_signal.insert(var, aig.create_pi());
    }

    let mut output_literals: Vec<u32> = Vec::with_capacity(o.min(MAX_PREALLOC) as usize);
    for _ in 0..o {
        let line = next_non_empty_line(&mut lines)
            .ok_or_else(|| format!("expected {} output lines but found fewer", o))?;
        output_literals.push(parse_u32(line, "output literal")?);
    }

    let mut and_lines: Vec<AndLine> = Vec::with_capacity(a.min(MAX_PREALLOC) as usize);
    let mut and_defined: HashSet<u32> = HashSet::new();
    for _ in 0..a {
        let line = next_non_empty_line(&mut lines)
            .ok_or_else(|| format!("expected {} AND lines but found fewer", a))?;
        let toks: Vec<&str> = line.split_whitespace().collect();
        if toks.len() != 3 {
            return Err(format!("AND line should have 3 fields, got '{}'", line));
        }
        let lhs = parse_u32(toks[0], "AND lhs")?;
        let rhs0_lit = parse_u32(toks[1], "AND rhs")?;
        let rhs1_lit = parse_u32(toks[2], "AND rhs")?;
        if lhs & 1 != 0 {
            return Err(format!("AND lhs literal {} must be positive (even)", lhs));
        }
        let lhs_var = lhs >> 1;
        if lhs_var == 0 || lhs_var > m {
            return Err(format!("AND lhs variable {} out of range 1..={}", lhs_var, m));
        }
        if var_to_signal.contains_key(&lhs_var) || !and_defined.insert(lhs_var) {
            return Err(format!("variable {} already defined", lhs_var));
        }
        and_lines.push(AndLine {
            lhs_var,
            rhs0_lit,
            rhs1_lit,
        });
    }

    validate_symbols(lines, i, o)?;

    let lit_to_signal = |lit: u32, var_map: &HashMap<u32, Signal>| -> Option<Signal> {
        var_map
            .get(&(lit >> 1))
            .map(|signal| signal.complement_if(lit & 1 == 1))
    };

    // Materialise AND gates once both operands are known; repeat until every
    // line is placed or no progress is possible.
    let mut pending: Vec<&AndLine> = and_lines.iter().collect();
    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for al in pending {
            match (
                lit_to_signal(al.rhs0_lit, &var_to_signal),
                lit_to_signal(al.rhs1_lit, &var_to_signal),
            ) {
                (Some(rhs0), Some(rhs1)) => {
                    let and = aig.create_and(rhs0, rhs1);
                    var_to_signal.insert(al.lhs_var, and);
                }
                _ => deferred.push(al),
            }
        }
        if deferred.len() == before {
            let first = deferred[0];
            return Err(format!(
                "AND definition of variable {} references an undefined variable or sits on a cycle ({} {})",
                first.lhs_var, first.rhs0_lit, first.rhs1_lit
            ));
        }
        pending = deferred;
    }

    for lit in output_literals {
        let signal = lit_to_signal(lit, &var_to_signal).ok_or_else(|| {
            format!(
                "output references undefined variable {} (literal {})",
                lit >> 1,
                lit
            )
        })?;
        aig.create_po(signal);
    }

    aig.check_invariants_with_debug_assert();
    log::debug!(
        "load_aiger: {} inputs, {} outputs, {} AND lines -> {} gates",
        i,
        o,
        a,
        aig.num_gates()
    );
    Ok(aig)
}

/// Checks the optional symbol table (`i<idx> <name>`, `o<idx> <name>`) up to
/// the comment section.
fn validate_symbols(lines: std::str::Lines<'_>, inputs: u32, outputs: u32) -> Result<(), String> {
    for line in lines {
        if line.starts_with('c') {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let mut chars = line.chars();
        let kind = chars.next();
        let rest = chars.as_str();
        let limit = match kind {
            Some('i') => inputs,
            Some('o') => outputs,
            Some('l') => {
                return Err(format!("latch symbol '{}' in combinational file", line));
            }
            _ => return Err(format!("unexpected line after definitions: '{}'", line)),
        };
        let mut parts = rest.splitn(2, ' ');
        let idx: u32 = parts
            .next()
            .unwrap_or("")
            .parse()
            .map_err(|e| format!("invalid symbol index in '{}': {}", line, e))?;
        if idx >= limit {
            return Err(format!("symbol '{}' index out of range (limit {})", line, limit));
        }
        if parts.next().map_or(true, |name| name.trim().is_empty()) {
            return Err(format!("malformed symbol '{}': missing name", line));
        }
    }
    Ok(())
}
