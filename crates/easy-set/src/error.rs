//! Error types shared by sessions, views and the mutation pipeline.

use thiserror::Error;

use crate::path::PathError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EasySetError {
    /// A non-numeric field was written onto a container classified as a
    /// sequence.
    #[error("cannot set non-numeric key {field:?} on a sequence")]
    InvalidKeyKind { field: String },
    /// A chain tried to continue through a scalar value. An empty `field`
    /// means the session root itself was not a container.
    #[error("value at {field:?} is not a container")]
    NotAContainer { field: String },
    #[error("invalid path expression: {0}")]
    Path(#[from] PathError),
}

impl EasySetError {
    pub(crate) fn invalid_key_kind(field: &str) -> Self {
        EasySetError::InvalidKeyKind {
            field: field.to_owned(),
        }
    }

    pub(crate) fn not_a_container(field: &str) -> Self {
        EasySetError::NotAContainer {
            field: field.to_owned(),
        }
    }
}
