//! Session-backed implementation of the storefront UI actions.
//!
//! `cart_update` commits through [`CartMutator`]; `modal_show` is recorded so
//! the shell can render whichever panel was requested last.

use storefront_core::{Product, ProductSelection, Session, StorefrontActions};
use tracing::{info, warn};

use crate::cart::CartMutator;
use crate::error::SessionResult;
use crate::store::SessionStore;

/// Routes [`StorefrontActions`] into a [`SessionStore`].
#[derive(Debug)]
pub struct SessionDispatcher<'s> {
    store: &'s SessionStore,
    last_cart_update: Option<SessionResult<Session>>,
    modals: Vec<String>,
}

impl<'s> SessionDispatcher<'s> {
    pub fn new(store: &'s SessionStore) -> Self {
        SessionDispatcher {
            store,
            last_cart_update: None,
            modals: Vec::new(),
        }
    }

    /// Outcome of the most recent `cart_update`, taken out of the dispatcher.
    pub fn take_cart_result(&mut self) -> Option<SessionResult<Session>> {
        self.last_cart_update.take()
    }

    /// Modal names requested so far, oldest first.
    pub fn modals(&self) -> &[String] {
        &self.modals
    }
}

impl StorefrontActions for SessionDispatcher<'_> {
    fn cart_update(&mut self, product: &Product, selection: &ProductSelection) {
        let result = CartMutator::new(self.store).add_to_cart(
            product,
            selection.quantity,
            &selection.variants,
        );
        if let Err(ref e) = result {
            warn!(sku = %product.sku, error = %e, "Cart update rejected");
        }
        self.last_cart_update = Some(result);
    }

    fn modal_show(&mut self, modal: &str) {
        info!(modal, "Modal requested");
        self.modals.push(modal.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use storefront_core::{PriceValue, ProductDetail, UnitPrice, Variant, SIZE_CHART_MODAL};

    fn jacket() -> Product {
        Product {
            sku: "JKT-010".into(),
            product_name: "Rain Jacket".into(),
            category: "outerwear".into(),
            pathname: "outerwear/rain-jacket".into(),
            description: Some("Packable shell".into()),
            image_url: None,
            unit_price: Some(UnitPrice {
                retail_value: Some(PriceValue::Text("£60.00".into())),
                sale_value: None,
                currency: None,
            }),
            variants: vec![Variant::new("Size", &["S", "M"])],
        }
    }

    #[test]
    fn test_product_page_add_reaches_store() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));
        let product = jacket();
        let mut page = ProductDetail::new(&product);
        page.on_variant_change("Size", "M");
        page.on_quantity_change(2);

        let mut dispatcher = SessionDispatcher::new(&store);
        page.on_cart_add(&mut dispatcher);

        let session = dispatcher.take_cart_result().unwrap().unwrap();
        assert!(session.cart.contains_key("JKT-010:Size=M"));
        assert_eq!(store.read(), Some(session));
        assert!(dispatcher.take_cart_result().is_none());
    }

    #[test]
    fn test_rejected_update_is_reported() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));
        let product = jacket();
        let mut page = ProductDetail::new(&product);
        page.on_quantity_change(0);

        let mut dispatcher = SessionDispatcher::new(&store);
        page.on_cart_add(&mut dispatcher);

        assert!(dispatcher.take_cart_result().unwrap().is_err());
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_size_chart_request_recorded() {
        let store = SessionStore::new(Box::new(MemoryStorage::new()));
        let product = jacket();
        let page = ProductDetail::new(&product);

        let mut dispatcher = SessionDispatcher::new(&store);
        page.toggle_size_chart(&mut dispatcher);
        assert_eq!(dispatcher.modals(), [SIZE_CHART_MODAL]);
    }
}
