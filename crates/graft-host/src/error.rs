use thiserror::Error;

use crate::DocumentId;

/// Error currency shared by all host collaborator traits.
///
/// Mock and real hosts fail through the same type, so pipeline call sites can
/// wrap any collaborator failure into a structured result uniformly.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("document not open: {0}")]
    DocumentNotOpen(DocumentId),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Unsupported(String),
    #[error("{0}")]
    Other(String),
}

impl HostError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
