// SPDX-License-Identifier: Apache-2.0

mod common;
mod driver_config;
mod random;
mod report_cli_error;
mod rewrite;
mod stats;

use std::path::Path;

use clap::{value_parser, Arg, ArgAction};

use driver_config::{load_config, DriverConfig};
use report_cli_error::report_cli_error_and_exit;

trait AppExt {
    fn add_aig_input_arg(self) -> Self;
    fn add_output_json_arg(self) -> Self;
    fn add_bool_arg(self, id: &'static str, long: &'static str, help: &'static str) -> Self;
}

impl AppExt for clap::Command {
    fn add_aig_input_arg(self) -> Self {
        self.arg(
            Arg::new("aig_input_file")
                .help("The input ASCII AIGER (.aag) file")
                .required(true)
                .index(1),
        )
    }

    fn add_output_json_arg(self) -> Self {
        self.arg(
            Arg::new("output_json")
                .long("output-json")
                .value_name("PATH")
                .help("Write statistics as JSON to this path")
                .action(ArgAction::Set),
        )
    }

    /// Boolean flags take an explicit `true`/`false` value so a config file
    /// default can be overridden in either direction.
    fn add_bool_arg(self, id: &'static str, long: &'static str, help: &'static str) -> Self {
        self.arg(
            Arg::new(id)
                .long(long)
                .value_name("BOOL")
                .action(ArgAction::Set)
                .value_parser(["true", "false"])
                .num_args(1)
                .help(help),
        )
    }
}

fn build_cli() -> clap::Command {
    clap::Command::new("aigopt-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Depth-driven algebraic rewriting of and-inverter graphs")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("TOML")
                .help("Path to an aigopt.toml file with rewrite defaults")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand_required(true)
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("rewrite")
                .about("Rewrites an AIG to reduce depth")
                .add_aig_input_arg()
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("PATH")
                        .help("Where to write the rewritten AIG; stdout if omitted")
                        .action(ArgAction::Set),
                )
                .add_bool_arg("associativity", "associativity", "Enable the associativity rule")
                .add_bool_arg("distributivity", "distributivity", "Enable the distributivity rule")
                .add_bool_arg(
                    "distributivity3",
                    "distributivity3",
                    "Enable the three-level distributivity rule",
                )
                .arg(
                    Arg::new("max_passes")
                        .long("max-passes")
                        .value_name("N")
                        .help("Stop after this many passes even without a fixpoint")
                        .value_parser(value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .add_bool_arg(
                    "check_equivalence",
                    "check-equivalence",
                    "Verify the result against the input by simulation",
                )
                .add_output_json_arg(),
        )
        .subcommand(
            clap::Command::new("stats")
                .about("Prints structural statistics for an AIG")
                .add_aig_input_arg()
                .add_output_json_arg(),
        )
        .subcommand(
            clap::Command::new("random")
                .about("Generates a seeded random AIG")
                .arg(
                    Arg::new("inputs")
                        .long("inputs")
                        .value_name("N")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("gates")
                        .long("gates")
                        .value_name("N")
                        .required(true)
                        .help("Number of AND construction attempts")
                        .value_parser(value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("outputs")
                        .long("outputs")
                        .value_name("N")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_name("S")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("complement_probability")
                        .long("complement-probability")
                        .value_name("P")
                        .value_parser(value_parser!(f64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("PATH")
                        .help("Where to write the AIG; stdout if omitted")
                        .action(ArgAction::Set),
                ),
        )
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "aigopt-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = build_cli().get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            if !Path::new(path).exists() {
                report_cli_error_and_exit("config file does not exist", None, vec![("path", path)]);
            }
            load_config(Path::new(path)).unwrap_or_else(|e| {
                report_cli_error_and_exit(&format!("{:#}", e), None, vec![("path", path)])
            })
        }
        None => DriverConfig::default(),
    };

    let (name, result) = match matches.subcommand() {
        Some(("version", _)) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Some(("rewrite", sub)) => ("rewrite", rewrite::handle_rewrite(sub, &config)),
        Some(("stats", sub)) => ("stats", stats::handle_stats(sub)),
        Some(("random", sub)) => ("random", random::handle_random(sub)),
        _ => report_cli_error_and_exit("unrecognized subcommand", None, vec![]),
    };
    if let Err(e) = result {
        report_cli_error_and_exit(&format!("{:#}", e), Some(name), vec![]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_bool_flags_require_explicit_value() {
        let cli = build_cli();
        let ok = cli
            .clone()
            .try_get_matches_from(["aigopt-driver", "rewrite", "in.aag", "--associativity", "false"]);
        assert!(ok.is_ok());
        let bad = cli.try_get_matches_from(["aigopt-driver", "rewrite", "in.aag", "--associativity", "maybe"]);
        assert!(bad.is_err());
    }
}
