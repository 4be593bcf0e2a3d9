//! Named blocking queues over an ordered-list store
//!
//! This module provides:
//! - Automatic naming of anonymous queues (`naming`)
//! - Binding a queue to a named store list (`binder`)
//! - The synchronized push/unshift/pop/shift API (`blocking`)

pub mod binder;
pub mod blocking;
pub mod naming;

pub use binder::ListHandle;
pub use blocking::Queue;
pub use naming::{NameAllocator, DEFAULT_PREFIX};
