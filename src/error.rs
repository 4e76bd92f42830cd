//! Error types shared by every query operation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbedError>;

#[derive(Debug, Error)]
pub enum EmbedError {
    /// No embedding table is available: the artifact is missing or nothing was loaded yet.
    #[error("embedding table not found: {path}")]
    StoreNotFound { path: String },

    #[error("embedding table is corrupt: {reason}")]
    StoreCorrupt { reason: String },

    /// One or more words are absent from the vocabulary after correction.
    #[error("word(s) not found in vocabulary: {}", .words.join(", "))]
    UnknownWord { words: Vec<String> },

    #[error("cannot compute similarity with a zero vector")]
    ZeroVector,

    #[error("need at least {needed} valid words, got {got}")]
    InsufficientInput { needed: usize, got: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EmbedError {
    pub fn unknown(word: impl Into<String>) -> Self {
        EmbedError::UnknownWord { words: vec![word.into()] }
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        EmbedError::StoreCorrupt { reason: reason.into() }
    }
}
