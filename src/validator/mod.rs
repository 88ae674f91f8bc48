//! Creation-time validation of topic and content bounds
//!
//! Validation runs before anything touches the store: a rejected request
//! leaves no persisted record and no consumed identifier. The validator
//! never mutates its input and is deterministic.
//!
//! Bounds are measured in characters, not encoded bytes, so a 50-character
//! topic is valid even when it serializes to more than 50 bytes.

use thiserror::Error;

/// Maximum topic length, in characters.
pub const MAX_TOPIC_CHARS: usize = 50;
/// Maximum content length, in characters.
pub const MAX_CONTENT_CHARS: usize = 280;

/// A creation request violated a field bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Topic exceeds 50 characters.
    #[error("the provided topic should be 50 characters long maximum ({0} given)")]
    TopicTooLong(usize),
    /// Content exceeds 280 characters.
    #[error("the provided content should be 280 characters long maximum ({0} given)")]
    ContentTooLong(usize),
}

/// Checks a creation request against the field bounds.
///
/// Empty topic and empty content are both accepted; only the upper
/// bounds are enforced.
pub fn validate(topic: &str, content: &str) -> Result<(), ValidationError> {
    let topic_chars = topic.chars().count();
    if topic_chars > MAX_TOPIC_CHARS {
        return Err(ValidationError::TopicTooLong(topic_chars));
    }

    let content_chars = content.chars().count();
    if content_chars > MAX_CONTENT_CHARS {
        return Err(ValidationError::ContentTooLong(content_chars));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_request() {
        assert!(validate("veganism", "NAH").is_ok());
    }

    #[test]
    fn test_accepts_empty_topic() {
        assert!(validate("", "still has content").is_ok());
    }

    #[test]
    fn test_accepts_empty_content() {
        assert!(validate("topic", "").is_ok());
    }

    #[test]
    fn test_accepts_topic_at_bound() {
        let topic = "x".repeat(MAX_TOPIC_CHARS);
        assert!(validate(&topic, "content").is_ok());
    }

    #[test]
    fn test_rejects_topic_over_bound() {
        let topic = "x".repeat(MAX_TOPIC_CHARS + 1);
        assert_eq!(
            validate(&topic, "content"),
            Err(ValidationError::TopicTooLong(51))
        );
    }

    #[test]
    fn test_accepts_content_at_bound() {
        let content = "x".repeat(MAX_CONTENT_CHARS);
        assert!(validate("topic", &content).is_ok());
    }

    #[test]
    fn test_rejects_content_over_bound() {
        let content = "x".repeat(MAX_CONTENT_CHARS + 1);
        assert_eq!(
            validate("topic", &content),
            Err(ValidationError::ContentTooLong(281))
        );
    }

    #[test]
    fn test_bounds_count_characters_not_bytes() {
        // 50 three-byte characters: 150 bytes, but exactly at the bound.
        let topic = "界".repeat(MAX_TOPIC_CHARS);
        assert!(topic.len() > MAX_TOPIC_CHARS);
        assert!(validate(&topic, "content").is_ok());

        let over = "界".repeat(MAX_TOPIC_CHARS + 1);
        assert_eq!(
            validate(&over, "content"),
            Err(ValidationError::TopicTooLong(51))
        );
    }

    #[test]
    fn test_error_reports_violated_field() {
        let err = validate(&"x".repeat(51), "content").unwrap_err();
        assert!(err.to_string().contains("topic"));
        assert!(err.to_string().contains("50"));

        let err = validate("topic", &"x".repeat(281)).unwrap_err();
        assert!(err.to_string().contains("content"));
        assert!(err.to_string().contains("280"));
    }
}
