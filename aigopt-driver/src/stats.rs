// SPDX-License-Identifier: Apache-2.0

//! Reads an AIGER file and reports structural statistics.

use std::path::Path;

use aigopt::aig::summary_stats::get_summary_stats;
use anyhow::Context;
use clap::ArgMatches;

use crate::common::{format_fanout_histogram, load_aig, write_json};

pub fn handle_stats(matches: &ArgMatches) -> anyhow::Result<()> {
    let input_file = matches
        .get_one::<String>("aig_input_file")
        .context("missing input file")?;
    let aig = load_aig(Path::new(input_file))?;
    let stats = get_summary_stats(&aig);
    println!(
        "aig stats: pis={} pos={} gates={} depth={} fanout_hist={}",
        stats.pis,
        stats.pos,
        stats.gates,
        stats.depth,
        format_fanout_histogram(&stats.fanout_histogram)
    );
    if let Some(path) = matches.get_one::<String>("output_json") {
        write_json(&stats, Path::new(path))?;
    }
    Ok(())
}
