//! Error taxonomy for batch validation.

/// Error type for quality-gate operations.
pub type Result<T> = std::result::Result<T, QaError>;

/// Errors that can occur before or around analysis.
///
/// Problems with individual items that can still be analyzed are reported as
/// issues on the report, never as errors.
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    /// A structurally malformed item or keyword strategy
    #[error("invalid input at position {position:?}: {reason}")]
    InvalidInput {
        /// Offending item position, when the problem belongs to one item
        position: Option<usize>,
        /// What is wrong
        reason: String,
    },

    /// None of the items in a non-empty batch carries any text
    #[error("no extractable text in any of the {items} items")]
    NoExtractableText {
        /// Number of items in the rejected batch
        items: usize,
    },

    /// The approximate similarity backend could not be constructed
    #[error("similarity backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Configuration values out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QaError {
    /// Shorthand for an [`QaError::InvalidInput`] tied to one item.
    pub fn invalid_item(position: usize, reason: impl Into<String>) -> Self {
        QaError::InvalidInput {
            position: Some(position),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`QaError::InvalidInput`] not tied to an item.
    pub fn invalid(reason: impl Into<String>) -> Self {
        QaError::InvalidInput {
            position: None,
            reason: reason.into(),
        }
    }
}
