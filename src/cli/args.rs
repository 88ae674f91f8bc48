//! CLI argument definitions using clap
//!
//! Commands:
//! - chirpdb init --config <path>
//! - chirpdb keygen [--out <path>]
//! - chirpdb post --config <path> --key <path> --topic <t> --content <c> [--id <id>]
//! - chirpdb get --config <path> <id>
//! - chirpdb list --config <path>
//! - chirpdb filter --config <path> [--author <b64>] [--topic <t>] [--predicate <offset:b64>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chirpdb - a minimal append-only store for short attributed messages
#[derive(Parser, Debug)]
#[command(name = "chirpdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new chirpdb data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./chirpdb.json")]
        config: PathBuf,
    },

    /// Generate a fresh author identity handle
    Keygen {
        /// File to write the handle to (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create a record
    Post {
        /// Path to configuration file
        #[arg(long, default_value = "./chirpdb.json")]
        config: PathBuf,

        /// File holding the author identity handle
        #[arg(long)]
        key: PathBuf,

        /// Topic line, 50 characters maximum
        #[arg(long, default_value = "")]
        topic: String,

        /// Message body, 280 characters maximum
        #[arg(long)]
        content: String,

        /// Record identifier (a UUID is generated if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Look up a record by identifier
    Get {
        /// Path to configuration file
        #[arg(long, default_value = "./chirpdb.json")]
        config: PathBuf,

        /// Record identifier
        id: String,
    },

    /// Enumerate all records in insertion order
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./chirpdb.json")]
        config: PathBuf,
    },

    /// Return records matching byte-offset equality predicates
    Filter {
        /// Path to configuration file
        #[arg(long, default_value = "./chirpdb.json")]
        config: PathBuf,

        /// Match records by author handle (base64)
        #[arg(long)]
        author: Option<String>,

        /// Match records with exactly this topic
        #[arg(long)]
        topic: Option<String>,

        /// Raw predicate as <offset>:<base64 bytes>; repeatable, ANDed
        #[arg(long)]
        predicate: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
