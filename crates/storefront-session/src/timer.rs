//! # Expiry-Warning Timer
//!
//! A single one-shot tokio task that signals "your session is about to
//! expire" some time after each refresh.
//!
//! ## Arming Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  arm(delay) ──► abort pending task (if any) ──► spawn new sleep task    │
//! │                                                    │                    │
//! │                                       after delay  ▼                    │
//! │                                     warn! + broadcast ExpiryWarning     │
//! │                                                                         │
//! │  cancel()   ──► abort pending task (if any)                             │
//! │  drop       ──► abort pending task (if any)                             │
//! │                                                                         │
//! │  At most one task is ever pending.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The warning has no effect on the stored session; listeners decide what to
//! show the shopper.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};

/// Capacity of the warning channel; slow listeners see `Lagged`.
const WARNING_CHANNEL_CAPACITY: usize = 16;

/// Signal sent when the expiry-warning delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryWarning {
    pub uid: String,
    /// The session's `expires` at the time the timer was armed.
    pub expires: i64,
}

/// Owner of the one pending warning task.
#[derive(Debug)]
pub struct ExpiryWarningTimer {
    pending: Option<JoinHandle<()>>,
    events: broadcast::Sender<ExpiryWarning>,
}

impl ExpiryWarningTimer {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(WARNING_CHANNEL_CAPACITY);
        ExpiryWarningTimer {
            pending: None,
            events,
        }
    }

    /// Listens for warnings fired after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ExpiryWarning> {
        self.events.subscribe()
    }

    /// Whether a warning task is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Replaces any pending warning with one that fires after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, delay: Duration, warning: ExpiryWarning) -> SessionResult<()> {
        self.cancel();

        let runtime = Handle::try_current().map_err(|_| SessionError::TimerUnavailable)?;
        let events = self.events.clone();

        debug!(uid = %warning.uid, delay_ms = delay.as_millis() as u64, "Arming expiry warning");
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            warn!(uid = %warning.uid, expires = warning.expires, "Session expiry warning");
            // No listeners is fine
            let _ = events.send(warning);
        }));

        Ok(())
    }

    /// Cancels the pending warning, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending expiry warning");
            }
            handle.abort();
        }
    }
}

impl Default for ExpiryWarningTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ExpiryWarningTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
