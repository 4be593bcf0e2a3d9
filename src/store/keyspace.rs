//! In-memory keyspace shared by the bundled store implementations

use super::{matching_keys, KeyType};
use crate::error::StoreError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// A value held under one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Entry {
    String(Bytes),
    List(VecDeque<Bytes>),
}

impl Entry {
    fn key_type(&self) -> KeyType {
        match self {
            Entry::String(_) => KeyType::String,
            Entry::List(_) => KeyType::List,
        }
    }
}

/// Keys and their values, with list semantics of an ordered-list store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyspace {
    entries: BTreeMap<String, Entry>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn key_type(&self, key: &str) -> KeyType {
        self.entries
            .get(key)
            .map(Entry::key_type)
            .unwrap_or(KeyType::None)
    }

    pub fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        matching_keys(self.entries.keys(), pattern)
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Store a plain value, replacing whatever the key held
    pub fn set(&mut self, key: &str, value: Bytes) {
        self.entries.insert(key.to_string(), Entry::String(value));
    }

    /// Create an empty list unless the key already holds one
    pub fn create_list(&mut self, key: &str) -> Result<(), StoreError> {
        self.list_for_write(key).map(|_| ())
    }

    pub fn push_back(&mut self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        let list = self.list_for_write(key)?;
        list.extend(values.iter().cloned());
        Ok(list.len())
    }

    pub fn push_front(&mut self, key: &str, values: &[Bytes]) -> Result<usize, StoreError> {
        let list = self.list_for_write(key)?;
        for value in values {
            list.push_front(value.clone());
        }
        Ok(list.len())
    }

    pub fn pop_back(&mut self, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.list_for_read(key)?.and_then(VecDeque::pop_back))
    }

    pub fn pop_front(&mut self, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.list_for_read(key)?.and_then(VecDeque::pop_front))
    }

    pub fn len(&self, key: &str) -> Result<usize, StoreError> {
        match self.entries.get(key) {
            None => Ok(0),
            Some(Entry::List(list)) => Ok(list.len()),
            Some(other) => Err(wrong_type(key, other)),
        }
    }

    fn list_for_write(&mut self, key: &str) -> Result<&mut VecDeque<Bytes>, StoreError> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(VecDeque::new()));
        match entry {
            Entry::List(list) => Ok(list),
            other => Err(wrong_type(key, other)),
        }
    }

    fn list_for_read(&mut self, key: &str) -> Result<Option<&mut VecDeque<Bytes>>, StoreError> {
        match self.entries.get_mut(key) {
            None => Ok(None),
            Some(Entry::List(list)) => Ok(Some(list)),
            Some(other) => Err(wrong_type(key, other)),
        }
    }
}

fn wrong_type(key: &str, entry: &Entry) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
        found: entry.key_type(),
    }
}
