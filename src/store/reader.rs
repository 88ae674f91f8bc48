//! Record log reader with strict corruption detection
//!
//! Every read validates the frame checksum before the record bytes are
//! handed out. Any mismatch, truncation, or impossible length surfaces
//! as a malformed-record error carrying the byte offset of the damaged
//! frame.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::checksum::verify_checksum;
use super::errors::{StoreError, StoreResult};
use super::writer::MIN_FRAME_SIZE;
use crate::record::RecordId;

/// One frame read back from the log.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Byte offset of the frame within the log file.
    pub offset: u64,
    /// Identifier the record was stored under.
    pub id: RecordId,
    /// The record's canonical serialized bytes.
    pub record_bytes: Vec<u8>,
}

/// Sequential reader over the record log.
pub struct LogReader {
    reader: BufReader<File>,
    current_offset: u64,
    /// Scan stops at this offset; readers snapshot it at open time so a
    /// concurrent append is not half-read.
    end_offset: u64,
}

impl LogReader {
    /// Opens the log file for scanning from the start.
    pub fn open(log_path: &Path) -> StoreResult<Self> {
        let file = File::open(log_path).map_err(|e| StoreError::io("open log", e))?;
        let end_offset = file
            .metadata()
            .map_err(|e| StoreError::io("read log metadata", e))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            current_offset: 0,
            end_offset,
        })
    }

    /// Opens the log but only scans frames below `end_offset`.
    pub fn open_until(log_path: &Path, end_offset: u64) -> StoreResult<Self> {
        let mut reader = Self::open(log_path)?;
        reader.end_offset = reader.end_offset.min(end_offset);
        Ok(reader)
    }

    /// Returns the current read offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next frame, or `None` at end of log.
    pub fn read_next(&mut self) -> StoreResult<Option<Frame>> {
        if self.current_offset >= self.end_offset {
            return Ok(None);
        }

        let frame_offset = self.current_offset;
        let remaining = self.end_offset - frame_offset;

        if remaining < MIN_FRAME_SIZE as u64 {
            return Err(StoreError::malformed(
                frame_offset,
                format!(
                    "truncated log: {} bytes remaining, minimum frame size is {}",
                    remaining, MIN_FRAME_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader
            .read_exact(&mut len_buf)
            .map_err(|e| StoreError::malformed(frame_offset, format!("unreadable frame length: {}", e)))?;
        let frame_len = u32::from_le_bytes(len_buf) as u64;

        if frame_len < MIN_FRAME_SIZE as u64 {
            return Err(StoreError::malformed(
                frame_offset,
                format!("invalid frame length {}", frame_len),
            ));
        }
        if frame_len > remaining {
            return Err(StoreError::malformed(
                frame_offset,
                format!(
                    "frame length {} exceeds remaining log size {}",
                    frame_len, remaining
                ),
            ));
        }

        let mut frame = vec![0u8; frame_len as usize];
        frame[..4].copy_from_slice(&len_buf);
        self.reader
            .read_exact(&mut frame[4..])
            .map_err(|e| StoreError::malformed(frame_offset, format!("unreadable frame body: {}", e)))?;

        let checksum_offset = frame.len() - 4;
        let stored = u32::from_le_bytes([
            frame[checksum_offset],
            frame[checksum_offset + 1],
            frame[checksum_offset + 2],
            frame[checksum_offset + 3],
        ]);
        if !verify_checksum(&frame[..checksum_offset], stored) {
            return Err(StoreError::malformed(frame_offset, "checksum mismatch"));
        }

        let mut id_len_buf = [0u8; 4];
        id_len_buf.copy_from_slice(&frame[4..8]);
        let id_len = u32::from_le_bytes(id_len_buf) as usize;
        if 8 + id_len > checksum_offset {
            return Err(StoreError::malformed(
                frame_offset,
                format!("identifier length {} overruns frame", id_len),
            ));
        }

        let id = std::str::from_utf8(&frame[8..8 + id_len])
            .map_err(|_| StoreError::malformed(frame_offset, "identifier is not valid UTF-8"))?;
        let record_bytes = frame[8 + id_len..checksum_offset].to_vec();

        self.current_offset += frame_len;

        Ok(Some(Frame {
            offset: frame_offset,
            id: RecordId::new(id),
            record_bytes,
        }))
    }

    /// Seeks to a frame boundary.
    pub fn seek_to(&mut self, offset: u64) -> StoreResult<()> {
        self.reader
            .seek(SeekFrom::Start(offset))
            .map_err(|e| StoreError::io("seek", e))?;
        self.current_offset = offset;
        Ok(())
    }

    /// Reads the single frame at the given offset.
    pub fn read_at(&mut self, offset: u64) -> StoreResult<Frame> {
        self.seek_to(offset)?;
        match self.read_next()? {
            Some(frame) => Ok(frame),
            None => Err(StoreError::malformed(offset, "no frame at offset")),
        }
    }
}
