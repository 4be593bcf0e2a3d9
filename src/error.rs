//! Error types shared by the store boundary and the queue

use crate::store::KeyType;
use thiserror::Error;

/// Failures reported by a [`ListStore`](crate::store::ListStore) implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid key pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Payload codec error: {0}")]
    Codec(String),
    #[error("Operation against a key holding the wrong kind of value: {key} ({found})")]
    WrongType { key: String, found: KeyType },
}

/// Failures reported by [`Queue`](crate::queue::Queue)
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Store object exists and is not a list: {name} ({found})")]
    NameConflict { name: String, found: KeyType },
    #[error("Queue is empty")]
    Empty,
    #[error("Store failure: {0}")]
    Storage(#[from] StoreError),
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),
}

impl QueueError {
    /// True for the error a non-blocking pop/shift returns on an empty queue
    pub fn is_empty(&self) -> bool {
        matches!(self, QueueError::Empty)
    }
}
