// SPDX-License-Identifier: Apache-2.0

//! `random` subcommand: emits a seeded random AIG, handy as rewrite input.

use std::path::Path;

use aigopt::test_utils::{random_aig, RandomAigOptions};
use clap::ArgMatches;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::common::write_aig;

pub fn handle_random(matches: &ArgMatches) -> anyhow::Result<()> {
    let defaults = RandomAigOptions::default();
    let options = RandomAigOptions {
        inputs: matches
            .get_one::<usize>("inputs")
            .copied()
            .unwrap_or(defaults.inputs),
        gates: matches
            .get_one::<usize>("gates")
            .copied()
            .unwrap_or(defaults.gates),
        outputs: matches
            .get_one::<usize>("outputs")
            .copied()
            .unwrap_or(defaults.outputs),
        complement_probability: matches
            .get_one::<f64>("complement_probability")
            .copied()
            .unwrap_or(defaults.complement_probability),
    };
    if !(0.0..=1.0).contains(&options.complement_probability) {
        return Err(anyhow::anyhow!(
            "--complement-probability must be within [0, 1]; got {}",
            options.complement_probability
        ));
    }
    let seed = matches.get_one::<u64>("seed").copied().unwrap_or(0);
    log::info!("random: seed {} {:?}", seed, options);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let aig = random_aig(&mut rng, &options);
    write_aig(&aig, matches.get_one::<String>("output").map(Path::new))
}
