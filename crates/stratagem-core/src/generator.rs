//! Generation client contract.

use crate::error::{Result, StratagemError};
use crate::perspective::Perspective;
use async_trait::async_trait;

/// Message surfaced when a generation is requested without a topic.
pub const EMPTY_TOPIC_MESSAGE: &str = "Please enter a topic.";

/// Turns a topic into a validated batch of perspectives via an external text-generation call.
///
/// Implementations call the endpoint exactly once per invocation. There is no retry, no
/// client-side timeout and no partial acceptance: any violation discards the whole batch.
#[async_trait]
pub trait PerspectiveGenerator: Send + Sync {
    /// Short description used in logs.
    fn name(&self) -> &str;

    /// Generates perspectives for a non-empty, trimmed topic.
    ///
    /// # Errors
    ///
    /// - `Validation`: topic empty after trimming
    /// - `Transport`: endpoint unreachable or non-success status
    /// - `Parse`: payload was not valid JSON
    /// - `SchemaViolation`: payload had the wrong shape
    async fn generate(&self, topic: &str) -> Result<Vec<Perspective>>;
}

/// Trims a candidate topic, rejecting it when nothing is left.
pub fn normalize_topic(topic: &str) -> Result<&str> {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        return Err(StratagemError::validation(EMPTY_TOPIC_MESSAGE));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_topic_trims() {
        assert_eq!(
            normalize_topic("  launch a coffee brand\n").unwrap(),
            "launch a coffee brand"
        );
    }

    #[test]
    fn normalize_topic_rejects_blank() {
        for blank in ["", "   ", "\t\n"] {
            let err = normalize_topic(blank).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), EMPTY_TOPIC_MESSAGE);
        }
    }
}
