// SPDX-License-Identifier: Apache-2.0

//! Optional `aigopt.toml` defaults. Command line flags take precedence over
//! values found here.
//!
//! ```toml
//! [rewrite]
//! distributivity3 = false
//! max_passes = 16
//! check_equivalence = true
//! equiv_random_rounds = 512
//! ```

use std::path::Path;

use anyhow::Context;
use clap::ArgMatches;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    pub rewrite: Option<RewriteConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RewriteConfig {
    pub associativity: Option<bool>,
    pub distributivity: Option<bool>,
    pub distributivity3: Option<bool>,
    pub max_passes: Option<usize>,
    pub check_equivalence: Option<bool>,
    /// 64-pattern words simulated when the input count is too large for an
    /// exhaustive check.
    pub equiv_random_rounds: Option<usize>,
    pub equiv_seed: Option<u64>,
}

pub fn load_config(path: &Path) -> anyhow::Result<DriverConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}

impl DriverConfig {
    pub fn rewrite(&self) -> RewriteConfig {
        self.rewrite.clone().unwrap_or_default()
    }
}

/// Boolean flag value if given on the command line, else the config value,
/// else `default`.
pub fn resolve_bool(
    matches: &ArgMatches,
    name: &str,
    from_config: Option<bool>,
    default: bool,
) -> bool {
    match matches.get_one::<String>(name).map(|s| s.as_str()) {
        Some("true") => true,
        Some("false") => false,
        _ => from_config.unwrap_or(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rewrite_section() {
        let config: DriverConfig =
            toml::from_str("[rewrite]\nassociativity = false\nmax_passes = 3\n").unwrap();
        let rewrite = config.rewrite();
        assert_eq!(rewrite.associativity, Some(false));
        assert_eq!(rewrite.max_passes, Some(3));
        assert_eq!(rewrite.distributivity, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<DriverConfig, _> = toml::from_str("[rewrite]\nbogus = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_config() {
        let config: DriverConfig = toml::from_str("").unwrap();
        assert_eq!(config.rewrite(), RewriteConfig::default());
    }
}
