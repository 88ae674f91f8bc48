//! CLI module for chirpdb
//!
//! Provides the command-line interface:
//! - init: create the data directory and an empty record log
//! - keygen: generate an author identity handle
//! - post: create a record
//! - get: point lookup by identifier
//! - list: enumerate records in insertion order
//! - filter: byte-offset predicate queries

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run_command, Config};
pub use errors::{CliError, CliResult};
pub use io::{write_error, write_response};

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}
