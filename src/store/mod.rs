//! Record store subsystem
//!
//! The store holds the canonical persistent state of all records: an
//! append-only log file plus an in-memory identifier index rebuilt by
//! scanning the log on open.
//!
//! # Design Principles
//!
//! - Append-only (records are immutable, no update or delete path)
//! - Checksum-verified on every read
//! - Validation and duplicate detection happen before any write
//! - Creations linearize through an internal lock; readers snapshot the
//!   log length and scan without holding it
//!
//! # Invariants Enforced
//!
//! - Persisted topics never exceed 50 characters, content never exceeds
//!   280 characters
//! - An identifier maps to at most one record, never overwritten
//! - A failed creation leaves the log and index untouched

mod checksum;
mod errors;
mod reader;
mod writer;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{StoreError, StoreResult};
pub use reader::{Frame, LogReader};
pub use writer::LogWriter;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use crate::identity::AuthorId;
use crate::query::{Predicate, PredicateFilter};
use crate::record::{Record, RecordId};
use crate::validator;

struct StoreInner {
    writer: LogWriter,
    index: HashMap<RecordId, u64>,
}

/// Durable append-only mapping from record identifier to record.
///
/// All mutation goes through [`RecordStore::create_record`]; reads are
/// point lookups, full enumeration, or byte-offset filter scans.
pub struct RecordStore {
    log_path: PathBuf,
    inner: Mutex<StoreInner>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Opens or creates a store under the given data directory.
    ///
    /// Rebuilds the identifier index by scanning the log. A duplicate
    /// identifier in the log means the file was modified out-of-band
    /// and is reported as corruption.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let writer = LogWriter::open(data_dir)?;
        let log_path = writer.path().to_path_buf();

        let mut index = HashMap::new();
        if writer.current_offset() > 0 {
            let mut reader = LogReader::open(&log_path)?;
            while let Some(frame) = reader.read_next()? {
                if index.insert(frame.id.clone(), frame.offset).is_some() {
                    return Err(StoreError::malformed(
                        frame.offset,
                        format!("duplicate identifier {} in log", frame.id),
                    ));
                }
            }
        }

        Ok(Self {
            log_path,
            inner: Mutex::new(StoreInner { writer, index }),
        })
    }

    /// Returns the path of the backing log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Creates a record under a caller-chosen identifier.
    ///
    /// Validates the topic and content bounds, rejects identifiers that
    /// are already present, stamps the creation timestamp from the store
    /// clock, and appends with fsync. Either the record is fully
    /// persisted or the store is left untouched.
    pub fn create_record(
        &self,
        id: RecordId,
        author: AuthorId,
        topic: &str,
        content: &str,
    ) -> StoreResult<Record> {
        validator::validate(topic, content)?;

        let mut inner = self.lock();
        if inner.index.contains_key(&id) {
            return Err(StoreError::DuplicateIdentifier(id));
        }

        let record = Record {
            author,
            timestamp: Utc::now().timestamp(),
            topic: topic.to_string(),
            content: content.to_string(),
        };

        let offset = inner.writer.append(&id, &record.serialize())?;
        inner.index.insert(id, offset);

        Ok(record)
    }

    /// Point lookup by identifier. An absent identifier is `None`.
    pub fn get_record(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        let offset = match self.lock().index.get(id) {
            Some(offset) => *offset,
            None => return Ok(None),
        };

        // Frames are immutable once written, so the read can proceed
        // without holding the lock.
        let mut reader = LogReader::open(&self.log_path)?;
        let frame = reader.read_at(offset)?;
        if frame.id != *id {
            return Err(StoreError::malformed(
                offset,
                format!("frame holds identifier {}, index expected {}", frame.id, id),
            ));
        }

        Ok(Some(self.decode(&frame)?))
    }

    /// Enumerates all records in insertion order.
    ///
    /// Each call rescans the log and observes the records present when
    /// the call started; appends racing the scan are not included.
    pub fn list_records(&self) -> StoreResult<Vec<(RecordId, Record)>> {
        self.scan(&[])
    }

    /// Returns the records whose serialized bytes match every predicate.
    ///
    /// An empty predicate list matches every record. The scan is
    /// O(records × predicates); only matching records are deserialized.
    pub fn filter_records(&self, predicates: &[Predicate]) -> StoreResult<Vec<(RecordId, Record)>> {
        self.scan(predicates)
    }

    /// Number of records currently stored.
    pub fn record_count(&self) -> usize {
        self.lock().index.len()
    }

    fn scan(&self, predicates: &[Predicate]) -> StoreResult<Vec<(RecordId, Record)>> {
        let end = self.lock().writer.current_offset();
        if end == 0 {
            return Ok(Vec::new());
        }

        let mut reader = LogReader::open_until(&self.log_path, end)?;
        let mut matches = Vec::new();
        while let Some(frame) = reader.read_next()? {
            if PredicateFilter::matches(&frame.record_bytes, predicates) {
                matches.push((frame.id.clone(), self.decode(&frame)?));
            }
        }

        Ok(matches)
    }

    fn decode(&self, frame: &Frame) -> StoreResult<Record> {
        Record::deserialize(&frame.record_bytes)
            .map_err(|e| StoreError::malformed(frame.offset, e.to_string()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock means a creator panicked mid-append; the log
        // itself is still checksum-protected, so continue with the state.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::ValidationError;
    use tempfile::TempDir;

    fn open_store(temp_dir: &TempDir) -> RecordStore {
        RecordStore::open(temp_dir.path()).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let author = AuthorId::generate();

        let created = store
            .create_record(RecordId::new("chirp-1"), author, "veganism", "NAH")
            .unwrap();
        assert_eq!(created.author, author);
        assert!(created.timestamp > 0);

        let fetched = store.get_record(&RecordId::new("chirp-1")).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_absent_identifier_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        assert!(store.get_record(&RecordId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn test_failed_validation_leaves_store_unmodified() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let id = RecordId::new("chirp-1");

        let err = store
            .create_record(id.clone(), AuthorId::generate(), &"x".repeat(51), "content")
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::TopicTooLong(51))
        ));

        assert_eq!(store.record_count(), 0);
        assert!(store.get_record(&id).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let id = RecordId::new("chirp-1");

        let original = store
            .create_record(id.clone(), AuthorId::generate(), "topic", "first")
            .unwrap();
        let err = store
            .create_record(id.clone(), AuthorId::generate(), "topic", "second")
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentifier(_)));

        // The existing record is untouched.
        assert_eq!(store.get_record(&id).unwrap().unwrap(), original);
        assert_eq!(store.record_count(), 1);
    }

    #[test]
    fn test_list_in_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let author = AuthorId::generate();

        for i in 0..3 {
            store
                .create_record(
                    RecordId::new(format!("chirp-{}", i)),
                    author,
                    &format!("topic-{}", i),
                    "content",
                )
                .unwrap();
        }

        let records = store.list_records().unwrap();
        let topics: Vec<_> = records.iter().map(|(_, r)| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["topic-0", "topic-1", "topic-2"]);
    }

    #[test]
    fn test_reopen_rebuilds_index() {
        let temp_dir = TempDir::new().unwrap();
        let author = AuthorId::generate();

        {
            let store = open_store(&temp_dir);
            store
                .create_record(RecordId::new("chirp-1"), author, "persisted", "body")
                .unwrap();
        }

        let store = open_store(&temp_dir);
        assert_eq!(store.record_count(), 1);
        let record = store.get_record(&RecordId::new("chirp-1")).unwrap().unwrap();
        assert_eq!(record.topic, "persisted");
        assert_eq!(record.author, author);

        // Duplicate detection survives reopen.
        let err = store
            .create_record(RecordId::new("chirp-1"), author, "again", "body")
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentifier(_)));
    }

    #[test]
    fn test_filter_scan_matches_subset() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let vegan = AuthorId::generate();
        let other = AuthorId::generate();

        store
            .create_record(RecordId::new("a"), vegan, "veganism", "one")
            .unwrap();
        store
            .create_record(RecordId::new("b"), other, "meat", "two")
            .unwrap();
        store
            .create_record(RecordId::new("c"), vegan, "veganism", "three")
            .unwrap();

        let matches = store.filter_records(&[Predicate::author(&vegan)]).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|(_, r)| r.author == vegan));
    }
}
