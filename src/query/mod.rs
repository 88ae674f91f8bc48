//! Byte-offset predicate filtering
//!
//! Queries against the store are lists of `(offset, expected bytes)`
//! equality tests evaluated against each record's serialized form.
//! No expressions, no coercion, exact byte match only. Predicates
//! compose with AND; an empty list matches every record.
//!
//! Matching is a full scan by design. The store's scale assumption is
//! small and append-only, so no secondary index is maintained.

use crate::identity::AuthorId;
use crate::record::{AUTHOR_OFFSET, TOPIC_LEN_OFFSET};

/// An exact-byte-range equality test against a serialized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Byte offset within the serialized record.
    pub offset: usize,
    /// Bytes expected at that offset.
    pub expected: Vec<u8>,
}

impl Predicate {
    /// Builds a raw predicate from an offset and expected bytes.
    pub fn new(offset: usize, expected: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            expected: expected.into(),
        }
    }

    /// Matches records created by `author`.
    ///
    /// The author handle sits at a constant offset right after the type
    /// tag, so this is a single fixed-width comparison.
    pub fn author(author: &AuthorId) -> Self {
        Self::new(AUTHOR_OFFSET, author.as_bytes().to_vec())
    }

    /// Matches records whose topic is exactly `topic`.
    ///
    /// Anchors at the topic length field and covers both the length
    /// prefix and the topic bytes. Covering the length prefix
    /// distinguishes a topic from one that merely extends the queried
    /// string, which a match on the topic bytes alone cannot do.
    pub fn topic(topic: &str) -> Self {
        let mut expected = Vec::with_capacity(4 + topic.len());
        expected.extend_from_slice(&(topic.len() as u32).to_le_bytes());
        expected.extend_from_slice(topic.as_bytes());
        Self::new(TOPIC_LEN_OFFSET, expected)
    }

    /// Checks whether `data` has the expected bytes at this predicate's
    /// offset. A record shorter than `offset + expected.len()` never
    /// matches.
    pub fn matches(&self, data: &[u8]) -> bool {
        match data.get(self.offset..self.offset + self.expected.len()) {
            Some(window) => window == self.expected.as_slice(),
            None => false,
        }
    }
}

/// Evaluates predicate lists against serialized records.
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks whether a serialized record matches all predicates.
    pub fn matches(data: &[u8], predicates: &[Predicate]) -> bool {
        predicates.iter().all(|pred| pred.matches(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AUTHOR_ID_LEN;
    use crate::record::{Record, TOPIC_OFFSET};

    fn record_with(author: [u8; AUTHOR_ID_LEN], topic: &str) -> Vec<u8> {
        Record {
            author: AuthorId::from_bytes(author),
            timestamp: 1_700_000_000,
            topic: topic.to_string(),
            content: "content".to_string(),
        }
        .serialize()
    }

    #[test]
    fn test_raw_predicate_exact_match() {
        let bytes = record_with([5; AUTHOR_ID_LEN], "veganism");
        let pred = Predicate::new(TOPIC_OFFSET, "veganism".as_bytes());
        assert!(pred.matches(&bytes));

        let pred = Predicate::new(TOPIC_OFFSET, "meat".as_bytes());
        assert!(!pred.matches(&bytes));
    }

    #[test]
    fn test_predicate_out_of_range_never_matches() {
        let bytes = record_with([5; AUTHOR_ID_LEN], "t");
        let pred = Predicate::new(bytes.len(), vec![0]);
        assert!(!pred.matches(&bytes));

        let pred = Predicate::new(bytes.len() - 1, vec![0, 0]);
        assert!(!pred.matches(&bytes));
    }

    #[test]
    fn test_author_predicate_targets_offset_8() {
        let author = AuthorId::from_bytes([9; AUTHOR_ID_LEN]);
        let pred = Predicate::author(&author);
        assert_eq!(pred.offset, 8);
        assert_eq!(pred.expected, author.as_bytes().to_vec());
    }

    #[test]
    fn test_topic_predicate_rejects_prefix_extension() {
        let exact = record_with([1; AUTHOR_ID_LEN], "veganism");
        let extended = record_with([1; AUTHOR_ID_LEN], "veganisms");

        let pred = Predicate::topic("veganism");
        assert!(pred.matches(&exact));
        assert!(!pred.matches(&extended));

        // A raw match on the topic bytes alone cannot tell them apart.
        let raw = Predicate::new(TOPIC_OFFSET, "veganism".as_bytes());
        assert!(raw.matches(&exact));
        assert!(raw.matches(&extended));
    }

    #[test]
    fn test_empty_predicate_list_matches_everything() {
        let bytes = record_with([2; AUTHOR_ID_LEN], "anything");
        assert!(PredicateFilter::matches(&bytes, &[]));
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let author = AuthorId::from_bytes([3; AUTHOR_ID_LEN]);
        let bytes = record_with(*author.as_bytes(), "veganism");

        let both = [Predicate::author(&author), Predicate::topic("veganism")];
        assert!(PredicateFilter::matches(&bytes, &both));

        let other = AuthorId::from_bytes([4; AUTHOR_ID_LEN]);
        let mismatched = [Predicate::author(&other), Predicate::topic("veganism")];
        assert!(!PredicateFilter::matches(&bytes, &mismatched));
    }
}
