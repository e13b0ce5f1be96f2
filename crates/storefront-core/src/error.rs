//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-session errors (separate crate)                            │
//! │  ├── StorageError     - Backend get/set/remove failures                │
//! │  └── SessionError     - What session callers see                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages carry the SKU or field name they are about, so the UI can show
//! them as-is.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product has no usable retail or sale price.
    ///
    /// ## When This Occurs
    /// - `unitPrice` missing from the inventory record
    /// - Both values missing or not numeric
    #[error("Product {sku} has no current price")]
    PriceUnavailable { sku: String },

    /// A variant axis has no selected option.
    ///
    /// ## When This Occurs
    /// - The axis was declared with an empty option list
    /// - A selection was built by hand and skipped the axis
    #[error("Product {sku} has no option selected for {variant}")]
    VariantIncomplete { sku: String, variant: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must hold entries is empty.
    #[error("{field} can't be empty")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable money string, malformed UID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
