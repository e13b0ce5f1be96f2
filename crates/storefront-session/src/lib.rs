//! # storefront-session: Session Persistence for the Storefront
//!
//! Creates, persists, expires and refreshes the shopper's session record,
//! and commits cart lines into it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    storefront-session Architecture                      │
//! │                                                                         │
//! │  ProductDetail ──► StorefrontActions ──► SessionDispatcher              │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                        CartMutator                      │
//! │                                              │ update_cart              │
//! │                                              ▼                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SessionStore                             │  │
//! │  │  create / read / update_cart / delete / refresh                  │  │
//! │  │                                                                  │  │
//! │  │   dyn Clock          dyn SessionStorage       ExpiryWarningTimer │  │
//! │  │   (now, ms)          (Memory | File)          (one tokio task)   │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  SessionConfig: TOML + env overrides ──► SessionStore::from_config      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_session::{MemoryStorage, NewSession, SessionStore};
//!
//! let store = SessionStore::new(Box::new(MemoryStorage::new()));
//! let session = store.create(NewSession::default()).unwrap();
//! assert_eq!(session.uid.len(), 32);
//! assert_eq!(store.read(), Some(session));
//! ```

pub mod cart;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod storage;
pub mod store;
pub mod timer;

pub use cart::{CartMutator, CartTotals};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SessionConfig, StorageBackend};
pub use dispatch::SessionDispatcher;
pub use error::{SessionError, SessionResult, StorageError, StorageResult};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{NewSession, SessionStore, SessionTimings, DEFAULT_SESSION_KEY};
pub use timer::{ExpiryWarning, ExpiryWarningTimer};
