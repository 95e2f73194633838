//! CLI module for schemadoc
//!
//! Provides command-line interface for:
//! - describe: Render the documentation of a schema file
//! - serve: Load the schema directory and serve the HTTP API

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, OutputFormat};
pub use commands::{describe, load_registry, run, run_command, serve, SchemaDescription};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{to_pretty_json, write_error, write_stdout, write_text};
