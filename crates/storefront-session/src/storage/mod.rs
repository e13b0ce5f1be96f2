//! # Storage Module
//!
//! The narrow key/value capability the session store persists through.
//!
//! ## Storage Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionStore                                                          │
//! │       │                                                                 │
//! │       │  storage.set("CUSTOMER_SESSION", "{\"uid\":...}")              │
//! │       ▼                                                                 │
//! │  dyn SessionStorage                                                    │
//! │  ├── get(&self, key)                                                   │
//! │  ├── set(&self, key, value)                                            │
//! │  └── remove(&self, key)                                                │
//! │       │                                                                 │
//! │       ├──► MemoryStorage   (HashMap behind a RwLock)                   │
//! │       └──► FileStorage     (<dir>/<key>.json)                          │
//! │                                                                         │
//! │  Values are opaque strings; the store owns (de)serialization.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Backends
//!
//! - [`MemoryStorage`] - process-local, used by tests and the default config
//! - [`FileStorage`] - survives restarts, used by the CLI

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageResult;

/// Synchronous string key/value storage.
///
/// Single writer: implementations make no promise about two processes
/// racing on the same key.
pub trait SessionStorage: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
