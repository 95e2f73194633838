//! Output handling for CLI
//!
//! Documents go to stdout followed by a single newline; errors go to stderr.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Write a rendered document to `out`
pub fn write_text<W: Write>(out: &mut W, text: &str) -> CliResult<()> {
    let text = text.trim_start_matches('\n');
    if text.ends_with('\n') {
        write!(out, "{}", text)?;
    } else {
        writeln!(out, "{}", text)?;
    }
    out.flush()?;
    Ok(())
}

/// Render `value` as pretty JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(CliError::from)
}

pub fn write_stdout(text: &str) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_text(&mut lock, text)
}

/// Write an error to stderr
pub fn write_error(err: &CliError) {
    eprintln!("{}", err);
}
