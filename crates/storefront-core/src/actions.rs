//! # Product Detail Controller
//!
//! The state behind a product page, and the two UI actions it fires.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI Event                 ProductDetail              StorefrontActions  │
//! │  ────────                 ─────────────              ─────────────────  │
//! │                                                                         │
//! │  page opens ────────────► new(product)                                  │
//! │                           selection = first options, quantity = 1       │
//! │                                                                         │
//! │  select changes ────────► on_variant_change(name, option)               │
//! │                                                                         │
//! │  stepper changes ───────► on_quantity_change(n)                         │
//! │                                                                         │
//! │  "Add To Cart" ─────────► on_cart_add ─────────────► cart_update(...)   │
//! │                                                                         │
//! │  "Size Chart" ──────────► toggle_size_chart ───────► modal_show(...)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering and widgets live in the UI; this type only keeps the state and
//! decides what to dispatch.

use crate::navigation::{breadcrumbs, Breadcrumb};
use crate::types::{Product, Variant};
use crate::variant::VariantSelection;

/// Modal name requested by the size-chart link.
pub const SIZE_CHART_MODAL: &str = "SIZE_CHART_MODAL";

/// What the shopper has chosen on a product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSelection {
    pub variants: VariantSelection,
    pub quantity: i64,
}

/// UI action contracts the storefront dispatches.
///
/// Implementations decide what "update the cart" and "show a modal" mean;
/// the session crate provides one backed by the session store.
pub trait StorefrontActions {
    /// The shopper committed an add-to-cart.
    fn cart_update(&mut self, product: &Product, selection: &ProductSelection);

    /// Request display of an auxiliary panel by name.
    fn modal_show(&mut self, modal: &str);
}

/// State of one mounted product page.
#[derive(Debug, Clone)]
pub struct ProductDetail<'p> {
    product: &'p Product,
    selection: ProductSelection,
}

impl<'p> ProductDetail<'p> {
    /// Opens a product page with the first option of every axis selected
    /// and a quantity of one.
    pub fn new(product: &'p Product) -> Self {
        ProductDetail {
            product,
            selection: ProductSelection {
                variants: VariantSelection::initial(&product.variants),
                quantity: 1,
            },
        }
    }

    pub fn product(&self) -> &Product {
        self.product
    }

    pub fn selection(&self) -> &ProductSelection {
        &self.selection
    }

    pub fn on_variant_change(&mut self, variant: &str, option: &str) {
        self.selection.variants.set(variant, option);
    }

    pub fn on_quantity_change(&mut self, quantity: i64) {
        self.selection.quantity = quantity;
    }

    pub fn on_cart_add<A: StorefrontActions + ?Sized>(&self, actions: &mut A) {
        actions.cart_update(self.product, &self.selection);
    }

    pub fn toggle_size_chart<A: StorefrontActions + ?Sized>(&self, actions: &mut A) {
        actions.modal_show(SIZE_CHART_MODAL);
    }

    /// Whether a size-chart link is shown next to this axis.
    pub fn shows_size_chart(variant: &Variant) -> bool {
        variant.name.eq_ignore_ascii_case("size")
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(
            &self.product.category,
            &self.product.pathname,
            &self.product.product_name,
        )
    }
}
