//! Ordered-list store boundary
//!
//! The queue never touches storage directly. Everything goes through the
//! [`ListStore`] trait, which models a key/value store whose values may be
//! ordered lists of opaque byte payloads:
//! - Key inspection (`exists`, `key_type`, `keys`, `delete`, `create_list`)
//! - List mutation at both ends (`push_back`, `push_front`, `pop_back`, `pop_front`)
//! - List size queries (`len`, `is_empty`)
//!
//! Two implementations ship with the crate: [`MemoryStore`] for sharing lists
//! between handles inside one process and [`FileStore`] for lists that must
//! survive a restart.

pub mod codec;
pub mod file;
mod keyspace;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use bytes::Bytes;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of value stored under a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    None,
    String,
    List,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::None => "none",
            KeyType::String => "string",
            KeyType::List => "list",
        };
        f.write_str(name)
    }
}

/// External ordered-list store
///
/// Pushing onto an absent key creates the list. A list keeps its key when
/// drained; only `delete` removes it. `push_front` inserts each value at the
/// head in turn, which leaves the last given value at the head.
pub trait ListStore: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool, StoreError>;

    fn key_type(&self, key: &str) -> Result<KeyType, StoreError>;

    /// Keys matching a glob pattern (`*` and `?`), sorted
    fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    /// Remove a key of any type, returning whether it existed
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Create an empty list unless the key already holds one
    fn create_list(&self, key: &str) -> Result<(), StoreError>;

    fn push_back(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError>;

    fn push_front(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError>;

    fn pop_back(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    fn pop_front(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    fn len(&self, key: &str) -> Result<usize, StoreError>;

    fn is_empty(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.len(key)? == 0)
    }
}

impl<S: ListStore + ?Sized> ListStore for Arc<S> {
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        (**self).exists(key)
    }

    fn key_type(&self, key: &str) -> Result<KeyType, StoreError> {
        (**self).key_type(key)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        (**self).keys(pattern)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn create_list(&self, key: &str) -> Result<(), StoreError> {
        (**self).create_list(key)
    }

    fn push_back(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        (**self).push_back(key, values)
    }

    fn push_front(&self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        (**self).push_front(key, values)
    }

    fn pop_back(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        (**self).pop_back(key)
    }

    fn pop_front(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        (**self).pop_front(key)
    }

    fn len(&self, key: &str) -> Result<usize, StoreError> {
        (**self).len(key)
    }
}

/// Compile a glob pattern into an anchored regex
pub(crate) fn glob_to_regex(pattern: &str) -> Result<Regex, StoreError> {
    let mut source = String::with_capacity(pattern.len() + 2);
    source.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    Ok(Regex::new(&source)?)
}

/// Keys from an iterator that match a glob pattern, sorted
pub(crate) fn matching_keys<'a>(
    keys: impl Iterator<Item = &'a String>,
    pattern: &str,
) -> Result<Vec<String>, StoreError> {
    let matcher = glob_to_regex(pattern)?;
    let mut matched: Vec<String> = keys.filter(|key| matcher.is_match(key)).cloned().collect();
    matched.sort();
    Ok(matched)
}
