//! # Session Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Validation    │  │    Storage      │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Empty cart     │  │  Io             │  │  InvalidConfig          │ │
//! │  │  Bad quantity   │  │  Poisoned       │  │  ConfigLoadFailed       │ │
//! │  │  No price       │  │  Serialization  │  │  ConfigSaveFailed       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │     Timer       │                                                   │
//! │  │ TimerUnavailable│                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing or corrupt session record is not an error: `read` returns `None`.

use storefront_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for storage backends.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Session error type covering every failure a session caller can see.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Input rejected before any write.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Business rule violated (missing price, incomplete selection).
    #[error(transparent)]
    Core(CoreError),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Failed to serialize the session record.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    // =========================================================================
    // Timer Errors
    // =========================================================================
    /// `refresh` ran outside a tokio runtime, so no warning could be armed.
    /// The refreshed record was still persisted.
    #[error("No async runtime available to arm the expiry warning")]
    TimerUnavailable,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => SessionError::Validation(v),
            other => SessionError::Core(other),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::SerializationFailed(err.to_string())
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SessionError {
    /// Returns true if the operation was rejected because of its input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SessionError::Validation(_) | SessionError::Core(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidConfig(_)
                | SessionError::ConfigLoadFailed(_)
                | SessionError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_validation_flattens() {
        let err: SessionError = CoreError::Validation(ValidationError::Empty {
            field: "cart".into(),
        })
        .into();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: cart can't be empty");
    }

    #[test]
    fn test_categories() {
        let err: SessionError = CoreError::PriceUnavailable { sku: "X".into() }.into();
        assert!(err.is_validation_error());
        assert!(!err.is_config_error());

        assert!(SessionError::InvalidConfig("bad".into()).is_config_error());
        assert!(!SessionError::TimerUnavailable.is_validation_error());
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Io {
            key: "CUSTOMER_SESSION".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("CUSTOMER_SESSION"));
    }
}
