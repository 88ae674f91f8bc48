//! chirpdb CLI entry point
//!
//! A minimal entrypoint: parse arguments, dispatch to the CLI module,
//! print errors to stderr, exit non-zero on failure. All logic lives in
//! `cli`.

use chirpdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
