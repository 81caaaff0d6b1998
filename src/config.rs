//! Configuration management for the HED validation server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Schema directory configuration
//! - One-shot validation flags

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the HED validation server
#[derive(Debug, Parser)]
#[command(name = "hed-validate")]
#[command(about = "Validation service for HED annotation strings")]
#[command(version)]
pub struct Args {
    /// Custom schema directory to search for vocabulary TOML files
    #[arg(long, help = "Directory containing HED schema TOML files")]
    pub schema_dir: Option<PathBuf>,

    /// Log level for the server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    /// Validate this string once and print the JSON result instead of serving
    #[arg(long, help = "HED string to validate in one-shot mode")]
    pub hed_string: Option<String>,

    /// Schema version for one-shot mode, e.g. "8.4.0" or "testlib_1.0.0"
    #[arg(long, help = "HED schema version for one-shot mode")]
    pub hed_version: Option<String>,

    /// Include warnings in the one-shot result
    #[arg(long, help = "Report warnings as well as errors")]
    pub check_warnings: bool,

    /// Definition expression, repeatable
    #[arg(long = "definition", help = "Definition expression, may be repeated")]
    pub definitions: Vec<String>,

    /// Print the known schema version identifiers and exit
    #[arg(long, help = "List available schema versions")]
    pub list_schemas: bool,
}

/// A one-shot validation requested from the command line
#[derive(Debug, Clone)]
pub struct OneShot {
    pub hed_string: String,
    pub hed_version: String,
    pub check_for_warnings: bool,
    pub definitions: Vec<String>,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Schema directories to search, in load order
    pub schema_dirs: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
    /// One-shot validation instead of serving, if requested
    pub one_shot: Option<OneShot>,
    /// List schema versions and exit
    pub list_schemas: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let mut schema_dirs = Vec::new();

        // Add user-specified directory if provided
        if let Some(custom_dir) = args.schema_dir {
            schema_dirs.push(custom_dir);
        }

        // Add default user config directory
        if let Some(config_dir) = dirs::config_dir() {
            schema_dirs.push(config_dir.join("hed-validate").join("schemas"));
        }

        let one_shot = match (args.hed_string, args.hed_version) {
            (Some(hed_string), Some(hed_version)) => Some(OneShot {
                hed_string,
                hed_version,
                check_for_warnings: args.check_warnings,
                definitions: args.definitions,
            }),
            (None, None) => None,
            _ => bail!("--hed-string and --hed-version must be used together"),
        };

        Ok(Config {
            schema_dirs,
            log_level: args.log_level,
            one_shot,
            list_schemas: args.list_schemas,
        })
    }

    /// Default configuration with only the standard schema directories
    pub fn default_dirs_only() -> Result<Self> {
        Self::from_args(Args {
            schema_dir: None,
            log_level: "info".to_string(),
            hed_string: None,
            hed_version: None,
            check_warnings: false,
            definitions: Vec::new(),
            list_schemas: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            schema_dir: None,
            log_level: "info".to_string(),
            hed_string: None,
            hed_version: None,
            check_warnings: false,
            definitions: Vec::new(),
            list_schemas: false,
        }
    }

    #[test]
    fn test_default_config_serves() {
        let config = Config::from_args(args()).unwrap();
        assert!(config.one_shot.is_none());
        assert!(!config.list_schemas);
    }

    #[test]
    fn test_custom_schema_dir_comes_first() {
        let mut a = args();
        a.schema_dir = Some(PathBuf::from("/tmp/schemas"));
        let config = Config::from_args(a).unwrap();
        assert_eq!(config.schema_dirs[0], PathBuf::from("/tmp/schemas"));
    }

    #[test]
    fn test_one_shot_requires_both_flags() {
        let mut a = args();
        a.hed_string = Some("Event".to_string());
        assert!(Config::from_args(a).is_err());

        let mut a = args();
        a.hed_string = Some("Event".to_string());
        a.hed_version = Some("8.4.0".to_string());
        a.check_warnings = true;
        let config = Config::from_args(a).unwrap();
        let one_shot = config.one_shot.expect("one-shot config");
        assert_eq!(one_shot.hed_version, "8.4.0");
        assert!(one_shot.check_for_warnings);
    }
}
