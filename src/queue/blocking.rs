//! Synchronized blocking queue over a bound store list

use super::binder::ListHandle;
use super::naming::{NameAllocator, DEFAULT_PREFIX};
use crate::error::QueueError;
use crate::store::codec;
use crate::store::ListStore;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
enum End {
    Head,
    Tail,
}

/// Named, blocking FIFO/LIFO queue whose items live in a store list
///
/// `push` appends and `unshift` prepends. `pop` takes from the tail and
/// `shift` from the head, so `push` + `shift` is FIFO and `push` + `pop` is
/// LIFO. Blocking removals wait on the queue's condition variable until an
/// item arrives.
///
/// Mutual exclusion covers calls made through this value only. Two `Queue`
/// values bound to the same name (in this process or another) share the list
/// but not the lock, and a push through one never wakes a waiter on the other.
/// Share one instance through `Arc` when several threads need the same queue.
pub struct Queue<T, S> {
    list: ListHandle<S>,
    monitor: Mutex<()>,
    not_empty: Condvar,
    _items: PhantomData<fn(T) -> T>,
}

impl<T, S> Queue<T, S>
where
    T: Serialize + DeserializeOwned,
    S: ListStore,
{
    /// Bind to `name`, or to a freshly allocated `queue_<n>` name
    pub fn open(store: S, name: Option<&str>) -> Result<Self, QueueError> {
        let allocator = NameAllocator::new(DEFAULT_PREFIX)?;
        Self::bind(store, name, &allocator)
    }

    /// Bind to an explicit name, reusing an existing list of that name
    pub fn named(store: S, name: &str) -> Result<Self, QueueError> {
        Self::open(store, Some(name))
    }

    /// Bind to a freshly allocated `queue_<n>` name
    pub fn anonymous(store: S) -> Result<Self, QueueError> {
        Self::open(store, None)
    }

    /// Bind to a freshly allocated `<prefix>_<n>` name
    pub fn with_prefix(store: S, prefix: &str) -> Result<Self, QueueError> {
        let allocator = NameAllocator::new(prefix)?;
        Self::bind(store, None, &allocator)
    }

    fn bind(store: S, name: Option<&str>, allocator: &NameAllocator) -> Result<Self, QueueError> {
        Ok(Self {
            list: ListHandle::bind(store, name, allocator)?,
            monitor: Mutex::new(()),
            not_empty: Condvar::new(),
            _items: PhantomData,
        })
    }

    /// Name of the backing list
    pub fn name(&self) -> &str {
        self.list.name()
    }

    /// The bound backing list
    pub fn list(&self) -> &ListHandle<S> {
        &self.list
    }

    pub fn store(&self) -> &S {
        self.list.store()
    }

    /// Add items to the end of the queue
    pub fn push<I>(&self, items: I) -> Result<&Self, QueueError>
    where
        I: IntoIterator<Item = T>,
    {
        self.add(items, End::Tail)
    }

    /// Alias for [`push`](Self::push)
    pub fn enqueue<I>(&self, items: I) -> Result<&Self, QueueError>
    where
        I: IntoIterator<Item = T>,
    {
        self.push(items)
    }

    /// Add items to the beginning of the queue
    ///
    /// Items are inserted at the head one after another, so the last given
    /// item ends up first.
    pub fn unshift<I>(&self, items: I) -> Result<&Self, QueueError>
    where
        I: IntoIterator<Item = T>,
    {
        self.add(items, End::Head)
    }

    /// Remove the last item
    ///
    /// Blocks while the queue is empty, unless `non_blocking` is set, in
    /// which case an empty queue fails with [`QueueError::Empty`].
    pub fn pop(&self, non_blocking: bool) -> Result<T, QueueError> {
        self.remove(non_blocking, End::Tail)
    }

    /// Alias for [`pop`](Self::pop)
    pub fn dequeue(&self, non_blocking: bool) -> Result<T, QueueError> {
        self.pop(non_blocking)
    }

    /// Remove the first item, blocking like [`pop`](Self::pop)
    pub fn shift(&self, non_blocking: bool) -> Result<T, QueueError> {
        self.remove(non_blocking, End::Head)
    }

    pub fn empty(&self) -> Result<bool, QueueError> {
        let _guard = self.lock();
        self.list.is_empty()
    }

    /// Number of items in the queue
    pub fn length(&self) -> Result<usize, QueueError> {
        let _guard = self.lock();
        self.list.len()
    }

    /// Alias for [`length`](Self::length)
    pub fn size(&self) -> Result<usize, QueueError> {
        self.length()
    }

    /// Discard every item, recreating the list empty under the same name
    ///
    /// Runs under the queue lock, so it is ordered against pushes and pops on
    /// this instance. Waiters blocked on an empty queue stay blocked.
    pub fn clear(&self) -> Result<(), QueueError> {
        let _guard = self.lock();
        self.list.reset()?;
        info!("Cleared queue: {}", self.name());
        Ok(())
    }

    fn add<I>(&self, items: I, end: End) -> Result<&Self, QueueError>
    where
        I: IntoIterator<Item = T>,
    {
        // Encode up front so a bad item fails before the store is touched
        let payloads = items
            .into_iter()
            .map(|item| codec::encode(&item))
            .collect::<Result<Vec<Bytes>, _>>()?;

        let _guard = self.lock();
        let len = match end {
            End::Tail => self.list.push_back(&payloads)?,
            End::Head => self.list.push_front(&payloads)?,
        };
        debug!(
            "Added {} items to {} ({:?}), length now {}",
            payloads.len(),
            self.name(),
            end,
            len
        );

        // One wake-up per call; every waiter re-checks the list
        self.not_empty.notify_all();
        Ok(self)
    }

    fn remove(&self, non_blocking: bool, end: End) -> Result<T, QueueError> {
        let mut guard = self.lock();
        loop {
            if self.list.is_empty()? {
                if non_blocking {
                    return Err(QueueError::Empty);
                }
                debug!("Queue {} is empty, waiting for items", self.name());
                guard = self
                    .not_empty
                    .wait(guard)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            }

            let popped = match end {
                End::Tail => self.list.pop_back()?,
                End::Head => self.list.pop_front()?,
            };
            // Another handle on the same list may have drained it since the check
            let Some(payload) = popped else { continue };

            return match codec::decode(&payload) {
                Ok(item) => Ok(item),
                Err(e) => {
                    self.restore(payload, end)?;
                    Err(e.into())
                }
            };
        }
    }

    // Put back a payload that could not be decoded, at the end it came from
    fn restore(&self, payload: Bytes, end: End) -> Result<(), QueueError> {
        match end {
            End::Tail => self.list.push_back(&[payload])?,
            End::Head => self.list.push_front(&[payload])?,
        };
        Ok(())
    }

    // The monitor guards no data of its own, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
