//! In-process store shared by every clone of the handle

use super::keyspace::Keyspace;
use super::{KeyType, ListStore};
use crate::error::StoreError;
use bytes::Bytes;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Ordered-list store living in process memory
///
/// Cloning the handle shares the underlying keyspace, the same way several
/// connections to one remote store see the same keys.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keyspace: Arc<Mutex<Keyspace>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a plain (non-list) value under a key
    pub fn set(&self, key: &str, value: impl Into<Bytes>) {
        self.keyspace().set(key, value.into());
    }

    fn keyspace(&self) -> MutexGuard<'_, Keyspace> {
        self.keyspace.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ListStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.keyspace().exists(key))
    }

    fn key_type(&self, key: &str) -> Result<KeyType, StoreError> {
        Ok(self.keyspace().key_type(key))
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        self.keyspace().keys(pattern)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.keyspace().delete(key))
    }

    fn create_list(&self, key: &str) -> Result<(), StoreError> {
        self.keyspace().create_list(key)
    }

    fn push_back(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        self.keyspace().push_back(key, values)
    }

    fn push_front(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        self.keyspace().push_front(key, values)
    }

    fn pop_back(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.keyspace().pop_back(key)
    }

    fn pop_front(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.keyspace().pop_front(key)
    }

    fn len(&self, key: &str) -> Result<usize, StoreError> {
        self.keyspace().len(key)
    }
}
