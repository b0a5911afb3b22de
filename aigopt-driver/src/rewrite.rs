// SPDX-License-Identifier: Apache-2.0

//! `rewrite` subcommand: loads an AIGER file, runs algebraic depth rewriting
//! to a fixpoint and writes the result.

use std::path::Path;

use aigopt::aig::summary_stats::{get_summary_stats, SummaryStats};
use aigopt::check_equivalence::{check_equivalence, EquivOptions};
use aigopt::{aig_algebraic_rewriting_with_options, RewriteOptions, RewriteStats};
use anyhow::Context;
use clap::ArgMatches;
use serde::Serialize;

use crate::common::{load_aig, write_aig, write_json};
use crate::driver_config::{resolve_bool, DriverConfig};

#[derive(Debug, Serialize)]
struct RewriteOutput {
    input: String,
    rewrite: RewriteStats,
    after: SummaryStats,
    equivalence_checked: bool,
}

fn rewrite_options(matches: &ArgMatches, config: &DriverConfig) -> RewriteOptions {
    let rewrite = config.rewrite();
    RewriteOptions {
        associativity: resolve_bool(matches, "associativity", rewrite.associativity, true),
        distributivity: resolve_bool(matches, "distributivity", rewrite.distributivity, true),
        distributivity3: resolve_bool(matches, "distributivity3", rewrite.distributivity3, true),
        max_passes: matches
            .get_one::<usize>("max_passes")
            .copied()
            .or(rewrite.max_passes),
    }
}

pub fn handle_rewrite(matches: &ArgMatches, config: &DriverConfig) -> anyhow::Result<()> {
    let input_file = matches
        .get_one::<String>("aig_input_file")
        .context("missing input file")?;
    let output = matches.get_one::<String>("output").map(Path::new);
    let output_json = matches.get_one::<String>("output_json").map(Path::new);
    let options = rewrite_options(matches, config);
    let rewrite_config = config.rewrite();
    let check = resolve_bool(
        matches,
        "check_equivalence",
        rewrite_config.check_equivalence,
        false,
    );

    let mut aig = load_aig(Path::new(input_file))?;
    let original = if check { Some(aig.clone()) } else { None };
    log::info!("rewrite: {} with {:?}", input_file, options);

    let stats = aig_algebraic_rewriting_with_options(&mut aig, &options);

    if let Some(original) = &original {
        let equiv_options = EquivOptions {
            random_rounds: rewrite_config
                .equiv_random_rounds
                .unwrap_or(EquivOptions::default().random_rounds),
            seed: rewrite_config.equiv_seed.unwrap_or_default(),
        };
        check_equivalence(original, &aig, &equiv_options)
            .map_err(|e| anyhow::anyhow!(e))
            .context("rewritten network is not equivalent to the input")?;
        log::info!("rewrite: equivalence check passed");
    }

    write_aig(&aig, output)?;
    if output.is_some() {
        println!(
            "rewrite: depth {} -> {} gates {} -> {} passes {} (assoc {}, distr {}, distr3 {})",
            stats.depth_before,
            stats.depth_after,
            stats.gates_before,
            stats.gates_after,
            stats.passes,
            stats.associativity,
            stats.distributivity,
            stats.distributivity3
        );
    }

    if let Some(path) = output_json {
        let out = RewriteOutput {
            input: input_file.clone(),
            after: get_summary_stats(&aig),
            rewrite: stats,
            equivalence_checked: original.is_some(),
        };
        write_json(&out, path)?;
    }
    Ok(())
}
