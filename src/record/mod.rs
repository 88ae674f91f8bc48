//! Record schema and binary layout
//!
//! The record format is:
//!
//! ```text
//! +------------------+
//! | Type Tag         | (8 bytes, fixed discriminator)
//! +------------------+
//! | Author           | (32 bytes, identity handle)
//! +------------------+
//! | Timestamp        | (i64 LE, seconds since epoch)
//! +------------------+
//! | Topic            | (length-prefixed string, u32 LE)
//! +------------------+
//! | Content          | (length-prefixed string, u32 LE)
//! +------------------+
//! ```
//!
//! The fixed prefix (tag, author, timestamp) puts the author at byte
//! offset 8 and the topic bytes at offset 52, so filter predicates can
//! address those fields without parsing the variable-length tail.
//!
//! The record identifier is the store key, not part of these bytes.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::identity::{AuthorId, AUTHOR_ID_LEN};

/// Discriminator identifying a chirp record among record kinds sharing
/// a store.
pub const RECORD_TAG: [u8; 8] = *b"CHIRPREC";

/// Byte offset of the author handle within a serialized record.
pub const AUTHOR_OFFSET: usize = 8;
/// Byte offset of the timestamp.
pub const TIMESTAMP_OFFSET: usize = AUTHOR_OFFSET + AUTHOR_ID_LEN;
/// Byte offset of the topic length prefix.
pub const TOPIC_LEN_OFFSET: usize = TIMESTAMP_OFFSET + 8;
/// Byte offset of the topic bytes.
pub const TOPIC_OFFSET: usize = TOPIC_LEN_OFFSET + 4;

/// Smallest possible serialized record: empty topic, empty content.
pub const MIN_RECORD_SIZE: usize = TOPIC_OFFSET + 4;

/// Unique key addressing a record, chosen by the caller at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps a caller-chosen identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh UUID v4 identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A persisted chirp: author attribution, creation time, topic, content.
///
/// Records are immutable once created; there is no update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Identity handle of the creator.
    pub author: AuthorId,
    /// Seconds since epoch, stamped by the store at write time.
    pub timestamp: i64,
    /// Topic line, up to 50 characters.
    pub topic: String,
    /// Message body, up to 280 characters.
    pub content: String,
}

/// Error deserializing record bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The buffer ends before a declared field does.
    #[error("record truncated: need {needed} bytes for {field}, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },
    /// The type tag does not identify a chirp record.
    #[error("unknown record tag {found:02x?}")]
    UnknownTag { found: [u8; 8] },
    /// Topic or content bytes are not valid UTF-8.
    #[error("{field} bytes are not valid UTF-8")]
    InvalidText { field: &'static str },
    /// Bytes remain after the content field ends.
    #[error("{0} trailing bytes after record end")]
    TrailingBytes(usize),
}

impl Record {
    /// Serializes the record to its canonical byte form.
    ///
    /// Total and deterministic: equal records produce equal bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            MIN_RECORD_SIZE + self.topic.len() + self.content.len(),
        );

        buf.extend_from_slice(&RECORD_TAG);
        buf.extend_from_slice(self.author.as_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());

        buf.extend_from_slice(&(self.topic.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.topic.as_bytes());

        buf.extend_from_slice(&(self.content.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.content.as_bytes());

        buf
    }

    /// Deserializes a record from its canonical byte form.
    ///
    /// The buffer must contain exactly one record: a wrong tag, a length
    /// prefix overrunning the buffer, invalid UTF-8 text, or trailing
    /// bytes are all rejected.
    pub fn deserialize(data: &[u8]) -> Result<Self, RecordError> {
        let mut cursor = Cursor { data, pos: 0 };

        let tag = cursor.take("type tag", 8)?;
        if tag != RECORD_TAG {
            let mut found = [0u8; 8];
            found.copy_from_slice(tag);
            return Err(RecordError::UnknownTag { found });
        }

        let mut author = [0u8; AUTHOR_ID_LEN];
        author.copy_from_slice(cursor.take("author", AUTHOR_ID_LEN)?);

        let mut ts = [0u8; 8];
        ts.copy_from_slice(cursor.take("timestamp", 8)?);
        let timestamp = i64::from_le_bytes(ts);

        let topic = cursor.take_string("topic")?;
        let content = cursor.take_string("content")?;

        if cursor.pos != data.len() {
            return Err(RecordError::TrailingBytes(data.len() - cursor.pos));
        }

        Ok(Self {
            author: AuthorId::from_bytes(author),
            timestamp,
            topic,
            content,
        })
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], RecordError> {
        let remaining = self.data.len() - self.pos;
        if remaining < len {
            return Err(RecordError::Truncated {
                field,
                needed: len,
                remaining,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_string(&mut self, field: &'static str) -> Result<String, RecordError> {
        let mut len_buf = [0u8; 4];
        len_buf.copy_from_slice(self.take(field, 4)?);
        let len = u32::from_le_bytes(len_buf) as usize;

        let bytes = self.take(field, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| RecordError::InvalidText { field })
    }
}
