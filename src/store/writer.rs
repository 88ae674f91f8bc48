//! Append-only record log writer
//!
//! The log file holds one frame per record:
//!
//! ```text
//! +------------------+
//! | Frame Length     | (u32 LE, includes this field and the checksum)
//! +------------------+
//! | Identifier       | (length-prefixed string, u32 LE)
//! +------------------+
//! | Record Bytes     | (canonical record layout, see `record`)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over all preceding bytes)
//! +------------------+
//! ```
//!
//! The identifier lives in the frame, not in the record bytes, so
//! byte-offset predicates apply to the record layout unmodified.
//!
//! Every append is fsynced before it is acknowledged. There are no
//! in-place updates and no deletes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::checksum::compute_checksum;
use super::errors::{StoreError, StoreResult};
use crate::record::{RecordId, MIN_RECORD_SIZE};

/// Smallest structurally possible frame: empty identifier, minimal record.
pub const MIN_FRAME_SIZE: usize = 4 + 4 + MIN_RECORD_SIZE + 4;

/// Appends record frames to the log file.
pub struct LogWriter {
    log_path: PathBuf,
    file: File,
    current_offset: u64,
}

impl LogWriter {
    /// Opens or creates the record log under the given data directory.
    ///
    /// Creates `<data_dir>/data/records.dat`, making parent directories
    /// as needed.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let data_subdir = data_dir.join("data");
        let log_path = data_subdir.join("records.dat");

        if !data_subdir.exists() {
            fs::create_dir_all(&data_subdir).map_err(|e| StoreError::io("create data dir", e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| StoreError::io("open log", e))?;

        let current_offset = file
            .metadata()
            .map_err(|e| StoreError::io("read log metadata", e))?
            .len();

        Ok(Self {
            log_path,
            file,
            current_offset,
        })
    }

    /// Returns the path of the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Returns the current end-of-log offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Builds the frame for one record.
    fn encode_frame(id: &RecordId, record_bytes: &[u8]) -> Vec<u8> {
        let id_bytes = id.as_str().as_bytes();
        let frame_len = (4 + 4 + id_bytes.len() + record_bytes.len() + 4) as u32;

        let mut frame = Vec::with_capacity(frame_len as usize);
        frame.extend_from_slice(&frame_len.to_le_bytes());
        frame.extend_from_slice(&(id_bytes.len() as u32).to_le_bytes());
        frame.extend_from_slice(id_bytes);
        frame.extend_from_slice(record_bytes);

        let checksum = compute_checksum(&frame);
        frame.extend_from_slice(&checksum.to_le_bytes());

        frame
    }

    /// Appends a record frame and fsyncs.
    ///
    /// Returns the byte offset the frame was written at. On failure the
    /// log is truncated back to its previous length, so a failed append
    /// has no observable effect.
    pub fn append(&mut self, id: &RecordId, record_bytes: &[u8]) -> StoreResult<u64> {
        let frame = Self::encode_frame(id, record_bytes);
        let offset = self.current_offset;

        if let Err(e) = self
            .file
            .write_all(&frame)
            .and_then(|()| self.file.sync_all())
        {
            // Drop any partially written frame before reporting.
            let _ = self.file.set_len(offset);
            return Err(StoreError::io("append", e));
        }

        self.current_offset += frame.len() as u64;

        Ok(offset)
    }
}
