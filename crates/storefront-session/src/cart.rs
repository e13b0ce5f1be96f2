//! # Cart Mutator
//!
//! Turns a product page's selection into a cart line and commits it to the
//! session.
//!
//! ## Add-To-Cart Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add_to_cart(product, qty, selection)                                  │
//! │      │                                                                  │
//! │      ├── validate_sku, validate_quantity   1..=999                      │
//! │      ├── selection.is_ready_for(product)   else VariantIncomplete       │
//! │      ├── current_price(product.unit_price) else PriceUnavailable        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  key  = selection.cart_key(sku)         "TEE-001:Color=Red;Size=S"      │
//! │  line = CartLineItem { sku, selections, quantity, unit_price_cents }    │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  cart = stored cart (or {}) with cart[key] = line    (overwrite)        │
//! │  store.update_cart(cart)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Adding the same product with the same selections twice replaces the line;
//! quantities are never summed.

use storefront_core::money::current_price;
use storefront_core::validation::{validate_quantity, validate_sku};
use storefront_core::{CartLineItem, CoreError, Money, Product, Session, VariantSelection};
use tracing::{debug, info};

use crate::error::SessionResult;
use crate::store::SessionStore;

/// Commits cart lines through a [`SessionStore`].
#[derive(Debug, Clone, Copy)]
pub struct CartMutator<'a> {
    store: &'a SessionStore,
}

impl<'a> CartMutator<'a> {
    pub fn new(store: &'a SessionStore) -> Self {
        CartMutator { store }
    }

    /// Sets the line for `product` with `selection` to `quantity`.
    ///
    /// Lines for other products or other selections stay as they are: the
    /// new line is merged into the stored cart before `update_cart`, rather
    /// than committing a one-entry cart that would replace everything. Keep
    /// the merge; a single-entry commit empties the rest of the cart.
    pub fn add_to_cart(
        &self,
        product: &Product,
        quantity: i64,
        selection: &VariantSelection,
    ) -> SessionResult<Session> {
        validate_sku(&product.sku)?;
        validate_quantity(quantity)?;

        if let Some(missing) = selection.first_missing(product) {
            return Err(CoreError::VariantIncomplete {
                sku: product.sku.clone(),
                variant: missing.name.clone(),
            }
            .into());
        }

        let price = current_price(product.unit_price.as_ref()).ok_or_else(|| {
            CoreError::PriceUnavailable {
                sku: product.sku.clone(),
            }
        })?;

        let key = selection.cart_key(&product.sku);
        let line = CartLineItem {
            sku: product.sku.clone(),
            selections: selection.as_map().clone(),
            quantity,
            unit_price_cents: Money::from_decimal(price).cents(),
        };
        debug!(%key, quantity, unit_price_cents = line.unit_price_cents, "Built cart line");

        let mut cart = self
            .store
            .read()
            .map(|session| session.cart)
            .unwrap_or_default();
        cart.insert(key.clone(), serde_json::to_value(&line)?);

        let session = self.store.update_cart(cart)?;
        info!(uid = %session.uid, %key, "Added to cart");
        Ok(session)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Summary of the typed lines in a session cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
}

impl CartTotals {
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

impl From<&Session> for CartTotals {
    fn from(session: &Session) -> Self {
        session
            .line_items()
            .into_iter()
            .fold(CartTotals::default(), |mut totals, (_, item)| {
                totals.item_count += 1;
                totals.total_quantity += item.quantity;
                totals.subtotal_cents += item.line_total().cents();
                totals
            })
    }
}
