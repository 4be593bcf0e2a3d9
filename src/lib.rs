pub mod cli;
pub mod config;
pub mod error;
pub mod queue;
pub mod store;

// Public API
pub use config::Config;
pub use error::{QueueError, StoreError};
pub use queue::{ListHandle, NameAllocator, Queue, DEFAULT_PREFIX};
pub use store::{FileStore, KeyType, ListStore, MemoryStore};
