//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate holds the shopper-facing commerce rules as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI (React)                        │   │
//! │  │   Product List ──► Product Detail ──► Add To Cart               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ cartUpdate / modalShow                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  variant  │  │ identifier│  │  session  │  │   │
//! │  │   │ parse/fmt │  │ selection │  │  32-char  │  │  record   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             storefront-session (Persistence Layer)             │   │
//! │  │        SessionStore, storage backends, expiry-warning timer     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Variant, UnitPrice, CartLineItem)
//! - [`money`] - Money codec and the integer-cent [`Money`] type
//! - [`identifier`] - Session identifier generation
//! - [`variant`] - Per-product variant selection
//! - [`session`] - The persisted session record
//! - [`actions`] - Product-detail controller and the UI action contracts
//! - [`navigation`] - Breadcrumbs and catalog view filtering
//! - [`text`] - Slug / title helpers
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::money::{currency_symbol, format_money, parse_money};
//!
//! let price = parse_money("£12.50").unwrap();
//! assert_eq!(price, 12.5);
//! assert_eq!(format_money(price), "£ 12.50");
//! assert_eq!(currency_symbol("usd"), "$");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod actions;
pub mod error;
pub mod identifier;
pub mod money;
pub mod navigation;
pub mod session;
pub mod text;
pub mod types;
pub mod validation;
pub mod variant;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use actions::{ProductDetail, ProductSelection, StorefrontActions, SIZE_CHART_MODAL};
pub use error::{CoreError, CoreResult, ValidationError};
pub use identifier::{generate_identifier, IDENTIFIER_LENGTH};
pub use money::{Currency, Money};
pub use session::{CartMap, Session};
pub use types::*;
pub use variant::VariantSelection;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Default session lifetime: one week in milliseconds.
pub const SESSION_TTL_MS: i64 = 604_800_000;

/// How far a refresh pushes expiry forward: five minutes.
pub const REFRESH_WINDOW_MS: i64 = 300_000;

/// Delay between a refresh and the expiry warning: four minutes.
pub const EXPIRY_WARNING_DELAY_MS: i64 = 240_000;
