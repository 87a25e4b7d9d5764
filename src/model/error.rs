//! Error types for tree model operations.

use thiserror::Error;

use super::topic::TopicId;

/// Errors that can occur when mutating or querying a [`MindMap`](super::MindMap).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Handle of a removed topic.
    #[error("unknown topic {0}")]
    UnknownTopic(TopicId),

    /// Handle created by another map.
    #[error("topic {0} belongs to another map")]
    ForeignTopic(TopicId),

    /// The root cannot be moved, cloned or used as a sibling anchor.
    #[error("operation `{0}` is not allowed on the root topic")]
    RootOperation(&'static str),

    /// Moving a topic under itself or one of its descendants.
    #[error("cannot move topic {topic} under its own descendant {target}")]
    CyclicMove { topic: TopicId, target: TopicId },

    /// Child index past the end of the child list.
    #[error("child index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Several topics carry the same link UID.
    #[error("duplicate topic UID `{0}`")]
    DuplicateUid(String),

    /// Key that cannot be written on an attribute line.
    #[error("invalid attribute key `{0}`")]
    InvalidAttributeKey(String),

    /// Extra whose body would not read back as the same extra.
    #[error("invalid extra: {0}")]
    InvalidExtra(String),

    /// Snippet language or body that cannot be written between fences.
    #[error("invalid code snippet: {0}")]
    InvalidCodeSnippet(String),
}

impl ModelError {
    /// Create an invalid attribute key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidAttributeKey(key.into())
    }

    /// Create a duplicate UID error.
    pub fn duplicate_uid(uid: impl Into<String>) -> Self {
        Self::DuplicateUid(uid.into())
    }
}
