// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use aigopt::aig::Aig;
use aigopt::aig_serdes::{emit_aiger, load_aiger_from_path};
use serde::Serialize;

pub fn load_aig(path: &Path) -> anyhow::Result<Aig> {
    load_aiger_from_path(path)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("loading AIGER file {}", path.display()))
}

/// Writes the network as ASCII AIGER to `path`, or to stdout when no path is
/// given.
pub fn write_aig(aig: &Aig, path: Option<&Path>) -> anyhow::Result<()> {
    let text = emit_aiger(aig).map_err(|e| anyhow::anyhow!(e))?;
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("writing AIGER file {}", path.display())),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing JSON to {}", path.display()))
}

pub fn format_fanout_histogram(hist: &BTreeMap<usize, usize>) -> String {
    let entries: Vec<String> = hist
        .iter()
        .map(|(fanout, count)| format!("{}:{}", fanout, count))
        .collect();
    format!("{{{}}}", entries.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_fanout_histogram() {
        let hist: BTreeMap<usize, usize> = [(1, 6), (2, 2)].into_iter().collect();
        assert_eq!(format_fanout_histogram(&hist), "{1:6,2:2}");
        assert_eq!(format_fanout_histogram(&BTreeMap::new()), "{}");
    }
}
