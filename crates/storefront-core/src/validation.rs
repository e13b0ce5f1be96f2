//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI widgets                                                   │
//! │  ├── Quantity stepper never goes below 1                               │
//! │  └── Select boxes only offer declared options                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart mutation (Rust)                                         │
//! │  └── THIS MODULE: quantity, SKU, non-empty cart                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Session store                                                │
//! │  └── Rejects empty cart updates before any write                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
/// - Only alphanumerics, hyphens, underscores
///
/// `:`, `=` and `;` are ruled out because they delimit cart-line keys.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_sku;
///
/// assert!(validate_sku("TEE-001").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Rejects empty cart mappings.
pub fn validate_cart_not_empty(entries: usize) -> ValidationResult<()> {
    if entries == 0 {
        return Err(ValidationError::Empty {
            field: "cart".to_string(),
        });
    }

    Ok(())
}
