//! # Session Configuration
//!
//! Where the session lives and how long it lasts.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_STORAGE_BACKEND=file                                    │
//! │     STOREFRONT_STORAGE_DIR=/var/lib/storefront                         │
//! │     STOREFRONT_SESSION_KEY=CUSTOMER_SESSION                            │
//! │     STOREFRONT_CURRENCY=EUR                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shop/session.toml (Linux)                                │
//! │     ~/Library/Application Support/com.storefront.shop/session.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     memory backend, CUSTOMER_SESSION, 7 days / 5 min / 4 min, GBP      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # session.toml
//! [storage]
//! backend = "file"   # memory | file
//! dir = "/var/lib/storefront"
//! key = "CUSTOMER_SESSION"
//!
//! [session]
//! ttl_ms = 604800000
//! refresh_window_ms = 300000
//! warning_delay_ms = 240000
//!
//! [money]
//! currency = "GBP"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use storefront_core::{Currency, EXPIRY_WARNING_DELAY_MS, REFRESH_WINDOW_MS, SESSION_TTL_MS};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::storage::{FileStorage, MemoryStorage, SessionStorage};
use crate::store::{SessionTimings, DEFAULT_SESSION_KEY};

// =============================================================================
// Storage Backend
// =============================================================================

/// Which [`SessionStorage`] implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local; the session is gone when the process exits.
    #[default]
    Memory,

    /// One JSON file per key under `storage.dir`.
    File,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" | "disk" => Ok(StorageBackend::File),
            other => Err(SessionError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: memory, file",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Key the session record is stored under.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            dir: None,
            key: default_key(),
        }
    }
}

/// Session lifetimes in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_ttl")]
    pub ttl_ms: i64,

    #[serde(default = "default_refresh_window")]
    pub refresh_window_ms: i64,

    /// Must be shorter than the refresh window, or the warning would fire
    /// after the session already expired.
    #[serde(default = "default_warning_delay")]
    pub warning_delay_ms: i64,
}

fn default_ttl() -> i64 {
    SESSION_TTL_MS
}
fn default_refresh_window() -> i64 {
    REFRESH_WINDOW_MS
}
fn default_warning_delay() -> i64 {
    EXPIRY_WARNING_DELAY_MS
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            ttl_ms: default_ttl(),
            refresh_window_ms: default_refresh_window(),
            warning_delay_ms: default_warning_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneySettings {
    /// ISO code; unknown codes display with the default symbol.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

impl Default for MoneySettings {
    fn default() -> Self {
        MoneySettings {
            currency: default_currency(),
        }
    }
}

// =============================================================================
// Main Session Configuration
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub money: MoneySettings,
}

impl SessionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (session.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides_with(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Session config saved");
        Ok(())
    }

    pub fn validate(&self) -> SessionResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "storage.key must not be empty".into(),
            ));
        }

        self.timings().validate()
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("STOREFRONT_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(_) => warn!(backend = %backend, "Unknown storage backend in environment"),
            }
        }

        if let Some(dir) = lookup("STOREFRONT_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage dir from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = lookup("STOREFRONT_SESSION_KEY") {
            self.storage.key = key;
        }

        if let Some(currency) = lookup("STOREFRONT_CURRENCY") {
            self.money.currency = currency;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "shop")
            .map(|dirs| dirs.config_dir().join("session.toml"))
    }

    fn default_storage_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "storefront", "shop")
            .map(|dirs| dirs.data_dir().join("sessions"))
            .unwrap_or_else(|| PathBuf::from(".storefront"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Opens the configured backend.
    pub fn open_storage(&self) -> Box<dyn SessionStorage> {
        match self.storage.backend {
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
            StorageBackend::File => {
                let dir = self.storage_dir();
                debug!(?dir, "Opening file session storage");
                Box::new(FileStorage::new(dir))
            }
        }
    }

    /// Directory the file backend writes to.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage
            .dir
            .clone()
            .unwrap_or_else(Self::default_storage_dir)
    }

    pub fn timings(&self) -> SessionTimings {
        SessionTimings {
            ttl_ms: self.session.ttl_ms,
            refresh_window_ms: self.session.refresh_window_ms,
            warning_delay_ms: self.session.warning_delay_ms,
        }
    }

    pub fn currency(&self) -> Currency {
        Currency::from_code(&self.money.currency)
    }
}
