//! CLI argument definitions using clap
//!
//! Commands:
//! - schemadoc describe <schema.json> [--format table|api|json|messages]
//! - schemadoc serve [--config <path>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// schemadoc - descriptions and documentation for document schemas
#[derive(Parser, Debug)]
#[command(name = "schemadoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Rendering of `describe` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table design document
    #[default]
    Table,
    /// API reference document
    Api,
    /// Descriptions and field descriptors as JSON
    Json,
    /// Required-field validation messages as JSON
    Messages,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the documentation of a schema file
    Describe {
        /// Path to a schema file
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Load the schema directory and serve the HTTP API
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults_to_table() {
        let cli = Cli::try_parse_from(["schemadoc", "describe", "apps.json"]).unwrap();
        match cli.command {
            Command::Describe { file, format } => {
                assert_eq!(file, PathBuf::from("apps.json"));
                assert_eq!(format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_describe_format_flag() {
        let cli =
            Cli::try_parse_from(["schemadoc", "describe", "apps.json", "--format", "messages"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Describe { format: OutputFormat::Messages, .. }
        ));
    }

    #[test]
    fn test_serve_config_optional() {
        let cli = Cli::try_parse_from(["schemadoc", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { config: None }));

        let cli = Cli::try_parse_from(["schemadoc", "serve", "--config", "c.json"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { config: Some(_) }));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["schemadoc", "describe", "a.json", "--format", "xml"]).is_err());
    }
}
