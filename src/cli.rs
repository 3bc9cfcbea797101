//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Shunyi Dashboard - air-quality charts for one monitoring station
///
/// Examples:
///   shunyi-dashboard --data dashboard/shunyi_cleaned.csv
///   shunyi-dashboard --config dashboard.toml --station Dongsi
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset to load at startup (.csv, .parquet or .json)
    ///
    /// Overrides `data.path` from the config file. Without it the window
    /// opens empty and a file can be picked via File → Open…
    #[arg(short, long, value_name = "FILE", env = "SHUNYI_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for dashboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Station name used in chart titles
    #[arg(short, long, value_name = "NAME")]
    pub station: Option<String>,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write a default dashboard.toml to the current directory and exit
    #[arg(long)]
    pub init_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["shunyi-dashboard"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.station.is_none());
        assert!(!args.verbose);
        assert!(!args.init_config);
    }

    #[test]
    fn test_all_arguments() {
        let args = Args::try_parse_from([
            "shunyi-dashboard",
            "--data",
            "obs.parquet",
            "-c",
            "custom.toml",
            "--station",
            "Dongsi",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.data, Some(PathBuf::from("obs.parquet")));
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(args.station.as_deref(), Some("Dongsi"));
        assert!(args.verbose);
    }

    #[test]
    fn test_init_config_flag() {
        let args = Args::try_parse_from(["shunyi-dashboard", "--init-config"]).unwrap();
        assert!(args.init_config);
    }
}
