//! Command-line argument definitions for the Laneflow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, document identity for legacy upgrades, and logging verbosity.

use std::str::FromStr;

use clap::Parser;
use log::LevelFilter;

/// Command-line arguments for the Laneflow document tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input document (tiered or legacy JSON)
    #[arg(help = "Path to the input document")]
    pub input: String,

    /// Path to the normalized output document
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Project id to assign when upgrading a legacy document
    /// (defaults to the input file stem)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Project name to assign when upgrading a legacy document
    #[arg(long)]
    pub name: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,
}

/// Parses the log level at the clap layer so an unknown level is a usage
/// error instead of a silent downgrade.
fn parse_level(value: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(value).map_err(|_| format!("unknown log level '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parses_into_filter() {
        let args = Args::try_parse_from(["laneflow", "in.json", "--log-level", "debug"])
            .unwrap();
        assert_eq!(args.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_log_level_defaults_to_info() {
        let args = Args::try_parse_from(["laneflow", "in.json"]).unwrap();
        assert_eq!(args.log_level, LevelFilter::Info);
        assert_eq!(args.output, "out.json");
    }

    #[test]
    fn test_unknown_log_level_is_a_usage_error() {
        let result = Args::try_parse_from(["laneflow", "in.json", "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
