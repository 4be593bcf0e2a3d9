//! Automatic naming of anonymous queues

use crate::error::QueueError;
use crate::store::ListStore;
use regex::Regex;
use tracing::debug;

/// Prefix used for automatically named queues
pub const DEFAULT_PREFIX: &str = "queue";

/// Picks the next unused `<prefix>_<n>` name
///
/// Uniqueness is best effort: two allocators scanning the store at the same
/// moment can pick the same name.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    prefix: String,
    pattern: Regex,
}

impl NameAllocator {
    pub fn new(prefix: &str) -> Result<Self, QueueError> {
        if prefix.is_empty() {
            return Err(QueueError::InvalidUsage(
                "queue name prefix must not be empty".to_string(),
            ));
        }
        let pattern = Regex::new(&format!(r"^{}_(\d+)$", regex::escape(prefix)))
            .map_err(|e| QueueError::InvalidUsage(format!("bad queue name prefix: {}", e)))?;

        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Scan existing keys and return `<prefix>_<highest + 1>`
    pub fn next_name<S: ListStore + ?Sized>(&self, store: &S) -> Result<String, QueueError> {
        let keys = store.keys("*")?;
        let highest = keys.iter().map(|key| self.suffix(key)).max().unwrap_or(0);
        let name = format!("{}_{}", self.prefix, highest + 1);

        debug!("Allocated queue name {} after scanning {} keys", name, keys.len());
        Ok(name)
    }

    // Keys outside the numbered sequence, or with a suffix that leaves no
    // successor (too large to parse, or u64::MAX), count as 0
    fn suffix(&self, key: &str) -> u64 {
        self.pattern
            .captures(key)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse::<u64>().ok())
            .filter(|n| n.checked_add(1).is_some())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use bytes::Bytes;

    fn store_with_lists(keys: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for key in keys {
            store.push_back(key, &[Bytes::from_static(b"1")]).unwrap();
        }
        store
    }

    #[test]
    fn test_first_name_in_empty_store() {
        let store = MemoryStore::new();
        let allocator = NameAllocator::new(DEFAULT_PREFIX).unwrap();
        assert_eq!(allocator.next_name(&store).unwrap(), "queue_1");
    }

    #[test]
    fn test_follows_highest_suffix() {
        let store = store_with_lists(&["queue_2", "queue_10", "queue_3"]);
        let allocator = NameAllocator::new(DEFAULT_PREFIX).unwrap();
        assert_eq!(allocator.next_name(&store).unwrap(), "queue_11");
    }

    #[test]
    fn test_ignores_non_numeric_and_partial_matches() {
        let store = store_with_lists(&[
            "queue_",
            "queue_abc",
            "queue_4x",
            "myqueue_9",
            "queue_5_extra",
            "other_7",
        ]);
        let allocator = NameAllocator::new(DEFAULT_PREFIX).unwrap();
        assert_eq!(allocator.next_name(&store).unwrap(), "queue_1");
    }

    #[test]
    fn test_overflowing_suffix_counts_as_zero() {
        let store = store_with_lists(&["queue_99999999999999999999999", "queue_2"]);
        let allocator = NameAllocator::new(DEFAULT_PREFIX).unwrap();
        assert_eq!(allocator.next_name(&store).unwrap(), "queue_3");
    }

    #[test]
    fn test_max_suffix_counts_as_zero() {
        let store = store_with_lists(&["queue_18446744073709551615", "queue_4"]);
        let allocator = NameAllocator::new(DEFAULT_PREFIX).unwrap();
        assert_eq!(allocator.next_name(&store).unwrap(), "queue_5");

        let store = store_with_lists(&["queue_18446744073709551615"]);
        assert_eq!(allocator.next_name(&store).unwrap(), "queue_1");
    }

    #[test]
    fn test_non_list_keys_take_part_in_numbering() {
        let store = MemoryStore::new();
        store.set("queue_6", "occupied");
        let allocator = NameAllocator::new(DEFAULT_PREFIX).unwrap();
        assert_eq!(allocator.next_name(&store).unwrap(), "queue_7");
    }

    #[test]
    fn test_custom_prefix_is_escaped() {
        let store = store_with_lists(&["jobs.v1_3", "jobsxv1_8"]);
        let allocator = NameAllocator::new("jobs.v1").unwrap();
        assert_eq!(allocator.prefix(), "jobs.v1");
        assert_eq!(allocator.next_name(&store).unwrap(), "jobs.v1_4");
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(matches!(
            NameAllocator::new(""),
            Err(QueueError::InvalidUsage(_))
        ));
    }
}
