//! JSON response envelopes for CLI output
//!
//! Responses are single JSON objects on stdout, UTF-8, one per line:
//! `{"status": "ok", "data": ...}` on success,
//! `{"status": "error", "code": ..., "message": ...}` on request-level
//! rejection.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to stdout.
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response).map_err(io::Error::from)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout.
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response).map_err(io::Error::from)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
