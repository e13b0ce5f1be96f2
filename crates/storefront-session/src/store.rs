//! # Session Store
//!
//! Owns the single persisted [`Session`] record and the expiry-warning timer.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create(NewSession)  ──► fill defaults ──► storage.set(key, json)       │
//! │                          uid     = generate_identifier()                │
//! │                          cart    = {}                                   │
//! │                          expires = now + ttl                            │
//! │                                                                         │
//! │  read()              ──► storage.get(key) ──► parse ──► Option<Session> │
//! │                          missing / unreadable / corrupt ──► None        │
//! │                                                                         │
//! │  update_cart(cart)   ──► empty? ──► reject, nothing written             │
//! │                          no session? ──► create() first                 │
//! │                          replace cart only ──► storage.set              │
//! │                                                                         │
//! │  delete()            ──► storage.remove(key)                            │
//! │                                                                         │
//! │  refresh()           ──► no session? ──► None                           │
//! │                          expires = now + window (clamped to maxAge)     │
//! │                          storage.set ──► re-arm expiry warning          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All record operations are synchronous. Only the warning timer needs a
//! tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use storefront_core::validation::validate_cart_not_empty;
use storefront_core::{
    generate_identifier, CartMap, Session, EXPIRY_WARNING_DELAY_MS, REFRESH_WINDOW_MS,
    SESSION_TTL_MS,
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::storage::SessionStorage;
use crate::timer::{ExpiryWarning, ExpiryWarningTimer};

/// Storage key the session record lives under by default.
pub const DEFAULT_SESSION_KEY: &str = "CUSTOMER_SESSION";

/// Overrides for [`SessionStore::create`]. Unset fields take defaults.
#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub uid: Option<String>,
    pub cart: Option<CartMap>,
    /// Absolute expiry instant in epoch milliseconds.
    pub expires_at: Option<i64>,
    /// Absolute instant a refresh may never push `expires` past.
    pub max_age: Option<i64>,
}

/// Session lifetimes, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    pub ttl_ms: i64,
    pub refresh_window_ms: i64,
    pub warning_delay_ms: i64,
}

impl SessionTimings {
    /// All durations positive, and the warning fires before the refresh
    /// window runs out.
    pub fn validate(&self) -> SessionResult<()> {
        if self.ttl_ms <= 0 || self.refresh_window_ms <= 0 || self.warning_delay_ms <= 0 {
            return Err(SessionError::InvalidConfig(
                "session durations must be greater than 0".into(),
            ));
        }

        if self.warning_delay_ms >= self.refresh_window_ms {
            return Err(SessionError::InvalidConfig(format!(
                "warning_delay_ms ({}) must be shorter than refresh_window_ms ({})",
                self.warning_delay_ms, self.refresh_window_ms
            )));
        }

        Ok(())
    }

    fn warning_delay(&self) -> Duration {
        Duration::from_millis(self.warning_delay_ms.unsigned_abs())
    }
}

impl Default for SessionTimings {
    fn default() -> Self {
        SessionTimings {
            ttl_ms: SESSION_TTL_MS,
            refresh_window_ms: REFRESH_WINDOW_MS,
            warning_delay_ms: EXPIRY_WARNING_DELAY_MS,
        }
    }
}

/// The shopper's session, persisted through an injected backend.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    key: String,
    timings: SessionTimings,
    timer: ExpiryWarningTimer,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .field("timings", &self.timings)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a store over `storage` with the system clock and default timings.
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Box<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        SessionStore {
            storage,
            clock,
            key: DEFAULT_SESSION_KEY.to_string(),
            timings: SessionTimings::default(),
            timer: ExpiryWarningTimer::new(),
        }
    }

    /// Builds a store from validated configuration.
    pub fn from_config(config: &SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        let storage = config.open_storage();
        Self::new(storage)
            .with_key(config.storage.key.clone())
            .with_timings(config.timings())
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Replaces the default timings. Rejects timings that fail
    /// [`SessionTimings::validate`].
    pub fn with_timings(mut self, timings: SessionTimings) -> SessionResult<Self> {
        timings.validate()?;
        self.timings = timings;
        Ok(self)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn timings(&self) -> SessionTimings {
        self.timings
    }

    /// The backend the record is persisted through.
    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Writes a fresh session, replacing any existing one.
    pub fn create(&self, new: NewSession) -> SessionResult<Session> {
        let session = Session {
            uid: new.uid.unwrap_or_else(generate_identifier),
            cart: new.cart.unwrap_or_default(),
            expires: new
                .expires_at
                .unwrap_or_else(|| self.clock.now_millis().saturating_add(self.timings.ttl_ms)),
            max_age: new.max_age,
        };

        self.write(&session)?;
        info!(uid = %session.uid, expires = session.expires, "Session created");
        Ok(session)
    }

    /// Returns the stored session, or `None` if it is missing or unreadable.
    pub fn read(&self) -> Option<Session> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Session storage read failed");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                debug!(uid = %session.uid, "Session read");
                Some(session)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored session is corrupt, ignoring");
                None
            }
        }
    }

    /// Replaces the cart of the stored session.
    ///
    /// An empty cart is rejected and nothing is written. With no stored
    /// session a new one is created first.
    pub fn update_cart(&self, cart: CartMap) -> SessionResult<Session> {
        if let Err(e) = validate_cart_not_empty(cart.len()) {
            error!(key = %self.key, "Refusing to store an empty cart");
            return Err(e.into());
        }

        let current = match self.read() {
            Some(session) => session,
            None => {
                info!(key = %self.key, "No session for cart update, creating one");
                self.create(NewSession::default())?
            }
        };

        let session = Session { cart, ..current };
        self.write(&session)?;
        debug!(uid = %session.uid, lines = session.cart.len(), "Session cart updated");
        Ok(session)
    }

    /// Removes the stored session. Deleting nothing is fine.
    pub fn delete(&self) -> SessionResult<()> {
        self.storage.remove(&self.key)?;
        info!(key = %self.key, "Session deleted");
        Ok(())
    }

    /// Pushes expiry forward by the refresh window and re-arms the warning.
    ///
    /// Returns `Ok(None)` without writing when there is no session. Outside a
    /// tokio runtime the refreshed record is persisted and
    /// `SessionError::TimerUnavailable` is returned.
    pub fn refresh(&mut self) -> SessionResult<Option<Session>> {
        let Some(current) = self.read() else {
            debug!(key = %self.key, "Nothing to refresh");
            return Ok(None);
        };

        let now = self.clock.now_millis();
        let session = current.refreshed(now, self.timings.refresh_window_ms);
        self.write(&session)?;
        info!(uid = %session.uid, expires = session.expires, "Session refreshed");

        self.timer.arm(
            self.timings.warning_delay(),
            ExpiryWarning {
                uid: session.uid.clone(),
                expires: session.expires,
            },
        )?;

        Ok(Some(session))
    }

    // =========================================================================
    // Expiry Warning
    // =========================================================================

    pub fn cancel_expiry_warning(&mut self) {
        self.timer.cancel();
    }

    pub fn is_expiry_warning_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn subscribe_expiry_warnings(&self) -> broadcast::Receiver<ExpiryWarning> {
        self.timer.subscribe()
    }

    fn write(&self, session: &Session) -> SessionResult<()> {
        let json = serde_json::to_string(session)?;
        self.storage.set(&self.key, &json)?;
        debug!(key = %self.key, uid = %session.uid, "Session written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use storefront_core::identifier::is_identifier;
    use storefront_core::ValidationError;
    use tokio::sync::broadcast::error::TryRecvError;

    const NOW: i64 = 1_700_000_000_000;

    fn store() -> (SessionStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(NOW));
        let store = SessionStore::with_clock(Box::new(MemoryStorage::new()), clock.clone());
        (store, clock)
    }

    fn cart_with(key: &str) -> CartMap {
        let mut cart = CartMap::new();
        cart.insert(key.to_string(), json!({ "quantity": 1 }));
        cart
    }

    #[test]
    fn test_create_defaults() {
        let (store, _) = store();
        let session = store.create(NewSession::default()).unwrap();

        assert!(is_identifier(&session.uid));
        assert!(session.cart.is_empty());
        assert_eq!(session.expires, NOW + 604_800_000);
        assert_eq!(session.max_age, None);
        assert_eq!(store.read(), Some(session));
    }

    #[test]
    fn test_create_with_system_clock_is_a_week_out() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));
        let before = SystemClock.now_millis();
        let session = store.create(NewSession::default()).unwrap();
        let after = SystemClock.now_millis();

        assert!(session.expires >= before + SESSION_TTL_MS);
        assert!(session.expires <= after + SESSION_TTL_MS);
    }

    #[test]
    fn test_create_honors_overrides_and_overwrites() {
        let (store, _) = store();
        store.create(NewSession::default()).unwrap();

        let session = store
            .create(NewSession {
                uid: Some("GIVEN".into()),
                cart: Some(cart_with("lineA")),
                expires_at: Some(42),
                max_age: Some(99),
            })
            .unwrap();

        assert_eq!(session.uid, "GIVEN");
        assert_eq!(session.expires, 42);
        assert_eq!(session.max_age, Some(99));
        assert_eq!(store.read().unwrap().uid, "GIVEN");
    }

    #[test]
    fn test_read_absent_and_corrupt() {
        let (store, _) = store();
        assert_eq!(store.read(), None);

        store.storage().set(DEFAULT_SESSION_KEY, "{not json").unwrap();
        assert_eq!(store.read(), None);

        store.storage().set(DEFAULT_SESSION_KEY, r#"{"cart":{}}"#).unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_update_cart_preserves_identity_and_expiry() {
        let (store, clock) = store();
        let created = store
            .create(NewSession {
                max_age: Some(NOW + 1_000_000),
                ..Default::default()
            })
            .unwrap();

        clock.advance(60_000);
        let updated = store.update_cart(cart_with("lineA")).unwrap();

        assert_eq!(updated.uid, created.uid);
        assert_eq!(updated.expires, created.expires);
        assert_eq!(updated.max_age, created.max_age);
        assert_eq!(updated.cart, cart_with("lineA"));
        assert_eq!(store.read(), Some(updated));
    }

    #[test]
    fn test_update_cart_replaces_whole_cart() {
        let (store, _) = store();
        store.update_cart(cart_with("lineA")).unwrap();
        let session = store.update_cart(cart_with("lineB")).unwrap();
        assert_eq!(session.cart.keys().collect::<Vec<_>>(), ["lineB"]);
    }

    #[test]
    fn test_update_cart_rejects_empty_without_writing() {
        let (store, _) = store();
        store.create(NewSession::default()).unwrap();
        let before = store.storage().get(DEFAULT_SESSION_KEY).unwrap();

        let result = store.update_cart(CartMap::new());
        assert!(matches!(
            result,
            Err(SessionError::Validation(ValidationError::Empty { ref field })) if field == "cart"
        ));
        assert_eq!(store.storage().get(DEFAULT_SESSION_KEY).unwrap(), before);
    }

    #[test]
    fn test_update_cart_rejects_empty_with_no_session() {
        let (store, _) = store();
        assert!(store.update_cart(CartMap::new()).is_err());
        assert_eq!(store.storage().get(DEFAULT_SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_cart_creates_missing_session() {
        let (store, _) = store();
        let session = store.update_cart(cart_with("lineA")).unwrap();

        assert!(is_identifier(&session.uid));
        assert_eq!(session.expires, NOW + SESSION_TTL_MS);
        assert_eq!(store.read(), Some(session));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _) = store();
        store.create(NewSession::default()).unwrap();

        store.delete().unwrap();
        assert_eq!(store.read(), None);
        store.delete().unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_custom_key() {
        let (store, _) = store();
        let store = store.with_key("OTHER");
        store.create(NewSession::default()).unwrap();

        assert!(store.storage().get("OTHER").unwrap().is_some());
        assert_eq!(store.storage().get(DEFAULT_SESSION_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_without_session_writes_nothing() {
        let (mut store, _) = store();
        assert_eq!(store.refresh().unwrap(), None);
        assert_eq!(store.storage().get(DEFAULT_SESSION_KEY).unwrap(), None);
        assert!(!store.is_expiry_warning_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_uses_window() {
        let (mut store, clock) = store();
        store.create(NewSession::default()).unwrap();

        clock.advance(1_000);
        let session = store.refresh().unwrap().unwrap();

        assert_eq!(session.expires, NOW + 1_000 + 300_000);
        assert_eq!(store.read().unwrap().expires, session.expires);
        assert!(store.is_expiry_warning_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_clamps_to_max_age() {
        let (mut store, _) = store();
        store
            .create(NewSession {
                max_age: Some(NOW + 200_000),
                ..Default::default()
            })
            .unwrap();

        let session = store.refresh().unwrap().unwrap();
        assert_eq!(session.expires, NOW + 200_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_ignores_distant_max_age() {
        let (mut store, _) = store();
        store
            .create(NewSession {
                max_age: Some(NOW + 10_000_000),
                ..Default::default()
            })
            .unwrap();

        let session = store.refresh().unwrap().unwrap();
        assert_eq!(session.expires, NOW + 300_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_arms_single_warning() {
        let (mut store, _) = store();
        let created = store.create(NewSession::default()).unwrap();
        let mut rx = store.subscribe_expiry_warnings();

        store.refresh().unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;
        let second = store.refresh().unwrap().unwrap();

        // The first timer would have fired at 240s
        tokio::time::sleep(Duration::from_secs(150)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        tokio::time::sleep(Duration::from_secs(100)).await;
        let warning = rx.try_recv().unwrap();
        assert_eq!(warning.uid, created.uid);
        assert_eq!(warning.expires, second.expires);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_expiry_warning() {
        let (mut store, _) = store();
        store.create(NewSession::default()).unwrap();
        let mut rx = store.subscribe_expiry_warnings();

        store.refresh().unwrap();
        store.cancel_expiry_warning();
        assert!(!store.is_expiry_warning_pending());

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        store.cancel_expiry_warning();
    }

    #[test]
    fn test_refresh_outside_runtime_still_persists() {
        let (mut store, _) = store();
        store.create(NewSession::default()).unwrap();

        let result = store.refresh();
        assert!(matches!(result, Err(SessionError::TimerUnavailable)));
        assert_eq!(store.read().unwrap().expires, NOW + REFRESH_WINDOW_MS);
    }

    #[test]
    fn test_with_timings_rejects_bad_delays() {
        let negative = SessionTimings {
            warning_delay_ms: -1,
            ..SessionTimings::default()
        };
        assert!(matches!(
            store().0.with_timings(negative),
            Err(SessionError::InvalidConfig(_))
        ));

        let late = SessionTimings {
            warning_delay_ms: REFRESH_WINDOW_MS,
            ..SessionTimings::default()
        };
        assert!(store().0.with_timings(late).is_err());

        let short = SessionTimings {
            ttl_ms: 60_000,
            refresh_window_ms: 10_000,
            warning_delay_ms: 5_000,
        };
        assert_eq!(store().0.with_timings(short).unwrap().timings(), short);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_with_extreme_stored_max_age() {
        let (mut store, _) = store();
        store
            .storage()
            .set(
                DEFAULT_SESSION_KEY,
                r#"{"uid":"U","cart":{},"expires":0,"maxAge":-9223372036854775808}"#,
            )
            .unwrap();
        assert_eq!(store.refresh().unwrap().unwrap().expires, i64::MIN);

        store
            .storage()
            .set(
                DEFAULT_SESSION_KEY,
                r#"{"uid":"U","cart":{},"expires":0,"maxAge":9223372036854775807}"#,
            )
            .unwrap();
        assert_eq!(store.refresh().unwrap().unwrap().expires, NOW + REFRESH_WINDOW_MS);
    }

    #[test]
    fn test_stored_bytes_are_camel_case_json() {
        let (store, _) = store();
        store
            .create(NewSession {
                uid: Some("U".into()),
                expires_at: Some(5),
                max_age: Some(9),
                ..Default::default()
            })
            .unwrap();

        let raw = store.storage().get(DEFAULT_SESSION_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!({ "uid": "U", "cart": {}, "expires": 5, "maxAge": 9 }));
    }
}
