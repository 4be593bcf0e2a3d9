//! Binding a queue to a named list in the store

use super::naming::NameAllocator;
use crate::error::QueueError;
use crate::store::{KeyType, ListStore};
use bytes::Bytes;
use tracing::info;

/// A store handle bound to one named list
///
/// Thin pass-through to the list operations of the store with the key filled
/// in. It holds no lock of its own.
#[derive(Debug, Clone)]
pub struct ListHandle<S> {
    store: S,
    name: String,
}

impl<S: ListStore> ListHandle<S> {
    /// Bind to `name`, or to a freshly allocated name when none is given
    ///
    /// An explicit name may already hold a list, whose contents are then
    /// reused. Any other kind of value under that name is a conflict and is
    /// left untouched.
    pub fn bind(
        store: S,
        name: Option<&str>,
        allocator: &NameAllocator,
    ) -> Result<Self, QueueError> {
        let name = match name {
            Some(name) => {
                validate_name(&store, name)?;
                name.to_string()
            }
            None => allocator.next_name(&store)?,
        };

        // Reserve the name so the next allocation moves past it
        store.create_list(&name)?;
        info!("Bound queue to list: {}", name);

        Ok(Self { store, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn push_back(&self, values: &[Bytes]) -> Result<usize, QueueError> {
        Ok(self.store.push_back(&self.name, values)?)
    }

    pub fn push_front(&self, values: &[Bytes]) -> Result<usize, QueueError> {
        Ok(self.store.push_front(&self.name, values)?)
    }

    pub fn pop_back(&self) -> Result<Option<Bytes>, QueueError> {
        Ok(self.store.pop_back(&self.name)?)
    }

    pub fn pop_front(&self) -> Result<Option<Bytes>, QueueError> {
        Ok(self.store.pop_front(&self.name)?)
    }

    pub fn len(&self) -> Result<usize, QueueError> {
        Ok(self.store.len(&self.name)?)
    }

    pub fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.store.is_empty(&self.name)?)
    }

    /// Delete the list and recreate it empty under the same name
    pub fn reset(&self) -> Result<(), QueueError> {
        self.store.delete(&self.name)?;
        self.store.create_list(&self.name)?;
        Ok(())
    }
}

fn validate_name<S: ListStore>(store: &S, name: &str) -> Result<(), QueueError> {
    if name.is_empty() {
        return Err(QueueError::InvalidUsage(
            "queue name must not be empty".to_string(),
        ));
    }

    if store.exists(name)? {
        let found = store.key_type(name)?;
        if found != KeyType::List {
            return Err(QueueError::NameConflict {
                name: name.to_string(),
                found,
            });
        }
    }
    Ok(())
}
