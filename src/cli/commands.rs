//! CLI command implementations
//!
//! Commands are thin: they load configuration, open the store, perform
//! one operation, and emit a JSON envelope on stdout. Request-level
//! rejections (bounds violations, duplicate identifiers) become error
//! envelopes; infrastructure failures propagate to `main` and exit
//! non-zero. Lifecycle events are logged to stderr so stdout stays a
//! clean response channel.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::identity::AuthorId;
use crate::observability::{Logger, Severity};
use crate::query::Predicate;
use crate::record::{Record, RecordId};
use crate::store::RecordStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Log sync mode (optional, default "fsync")
    #[serde(default = "default_sync_mode")]
    pub sync_mode: String,
}

fn default_sync_mode() -> String {
    "fsync".to_string()
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config(format!("failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration.
    fn validate(&self) -> CliResult<()> {
        if self.data_dir.is_empty() {
            return Err(CliError::config("data_dir must not be empty"));
        }

        // Only synchronous appends are supported; anything else would
        // weaken the durability contract silently.
        if self.sync_mode != "fsync" {
            return Err(CliError::config(format!(
                "invalid sync_mode: '{}'. Only 'fsync' is allowed.",
                self.sync_mode
            )));
        }

        Ok(())
    }

    /// Get data directory as Path.
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join("data").join("records.dat").exists()
}

fn open_store(config: &Config) -> CliResult<RecordStore> {
    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::NotInitialized(format!(
            "no record log under {}; run `chirpdb init` first",
            data_dir.display()
        )));
    }

    let store = RecordStore::open(data_dir)?;
    Logger::log_stderr(
        Severity::Info,
        "STORE_OPENED",
        &[
            ("data_dir", &data_dir.display().to_string()),
            ("records", &store.record_count().to_string()),
        ],
    );
    Ok(store)
}

fn record_to_json(id: &RecordId, record: &Record) -> Value {
    let created_at = DateTime::<Utc>::from_timestamp(record.timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    json!({
        "id": id.as_str(),
        "author": record.author.to_string(),
        "timestamp": record.timestamp,
        "created_at": created_at,
        "topic": record.topic,
        "content": record.content,
    })
}

fn records_to_json(records: &[(RecordId, Record)]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|(id, record)| record_to_json(id, record))
            .collect(),
    )
}

/// Dispatch a parsed command.
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Init { config } => init(&config),
        Command::Keygen { out } => keygen(out.as_deref()),
        Command::Post {
            config,
            key,
            topic,
            content,
            id,
        } => post(&config, &key, &topic, &content, id),
        Command::Get { config, id } => get(&config, &id),
        Command::List { config } => list(&config),
        Command::Filter {
            config,
            author,
            topic,
            predicate,
        } => filter(&config, author, topic, &predicate),
    }
}

/// Create the data directory structure and an empty record log.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::AlreadyInitialized(format!(
            "record log already exists under {}",
            data_dir.display()
        )));
    }

    let store = RecordStore::open(data_dir)?;
    Logger::log_stderr(
        Severity::Info,
        "STORE_INITIALIZED",
        &[("data_dir", &data_dir.display().to_string())],
    );

    write_response(json!({
        "initialized": true,
        "data_dir": data_dir.display().to_string(),
        "log": store.log_path().display().to_string(),
    }))
}

/// Generate a fresh author identity handle.
pub fn keygen(out: Option<&Path>) -> CliResult<()> {
    let author = AuthorId::generate();
    let encoded = author.to_string();

    if let Some(path) = out {
        fs::write(path, format!("{}\n", encoded))?;
        Logger::log_stderr(
            Severity::Info,
            "IDENTITY_GENERATED",
            &[("out", &path.display().to_string())],
        );
    }

    write_response(json!({ "author": encoded }))
}

fn read_author_key(path: &Path) -> CliResult<AuthorId> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim().parse()?)
}

/// Create a record.
pub fn post(
    config_path: &Path,
    key_path: &Path,
    topic: &str,
    content: &str,
    id: Option<String>,
) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let author = read_author_key(key_path)?;
    let id = id.map(RecordId::new).unwrap_or_else(RecordId::generate);

    match store.create_record(id.clone(), author, topic, content) {
        Ok(record) => {
            Logger::log_stderr(
                Severity::Info,
                "RECORD_CREATED",
                &[("id", id.as_str()), ("topic", &record.topic)],
            );
            write_response(record_to_json(&id, &record))
        }
        Err(e) if e.is_rejection() => write_error(e.code(), &e.to_string()),
        Err(e) => Err(e.into()),
    }
}

/// Look up a record by identifier. An absent identifier yields null data.
pub fn get(config_path: &Path, id: &str) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let id = RecordId::new(id);
    match store.get_record(&id)? {
        Some(record) => write_response(record_to_json(&id, &record)),
        None => write_response(Value::Null),
    }
}

/// Enumerate all records in insertion order.
pub fn list(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let records = store.list_records()?;
    write_response(records_to_json(&records))
}

fn parse_raw_predicate(arg: &str) -> CliResult<Predicate> {
    let (offset, bytes) = arg.split_once(':').ok_or_else(|| {
        CliError::BadPredicate(format!("expected <offset>:<base64 bytes>, got '{}'", arg))
    })?;

    let offset: usize = offset
        .parse()
        .map_err(|_| CliError::BadPredicate(format!("invalid offset '{}'", offset)))?;

    let expected = URL_SAFE_NO_PAD
        .decode(bytes)
        .map_err(|e| CliError::BadPredicate(format!("invalid base64 bytes: {}", e)))?;

    Ok(Predicate::new(offset, expected))
}

/// Return records matching the given predicates (ANDed together).
pub fn filter(
    config_path: &Path,
    author: Option<String>,
    topic: Option<String>,
    raw: &[String],
) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_store(&config)?;

    let mut predicates = Vec::new();
    if let Some(author) = author {
        let author: AuthorId = author.parse()?;
        predicates.push(Predicate::author(&author));
    }
    if let Some(topic) = topic {
        predicates.push(Predicate::topic(&topic));
    }
    for arg in raw {
        predicates.push(parse_raw_predicate(arg)?);
    }

    let records = store.filter_records(&predicates)?;
    write_response(records_to_json(&records))
}
