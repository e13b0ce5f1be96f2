//! # Variant Selection
//!
//! Tracks which option the shopper picked on each variant axis of a product.
//!
//! ## Lifecycle
//! ```text
//! Product shown ──► VariantSelection::initial(variants)
//!                   { Size: "S", Color: "Red" }        first option per axis
//!                          │
//!       select "Size"="L"  ▼
//!                   { Size: "L", Color: "Red" }        overwrite, no checks
//!                          │
//!       add to cart        ▼
//!                   cart_key("TEE-001") = "TEE-001:Color=Red;Size=L"
//! ```
//!
//! A selection lives as long as the product view that owns it; a new product
//! means a new selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Product, Variant};

/// Selected option per variant name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct VariantSelection(BTreeMap<String, String>);

impl VariantSelection {
    /// Pre-selects the first option of every axis.
    ///
    /// Axes declared without options stay unselected, which makes the
    /// selection not ready for the cart.
    pub fn initial(variants: &[Variant]) -> Self {
        VariantSelection(
            variants
                .iter()
                .filter_map(|v| Some((v.name.clone(), v.options.first()?.clone())))
                .collect(),
        )
    }

    /// Sets the option for one axis, replacing any earlier choice.
    ///
    /// The option is not checked against the product's declared list.
    pub fn select_option(mut self, variant: impl Into<String>, option: impl Into<String>) -> Self {
        self.set(variant, option);
        self
    }

    /// In-place form of [`select_option`](Self::select_option).
    pub fn set(&mut self, variant: impl Into<String>, option: impl Into<String>) {
        self.0.insert(variant.into(), option.into());
    }

    pub fn get(&self, variant: &str) -> Option<&str> {
        self.0.get(variant).map(String::as_str)
    }

    /// First axis of `product` without a non-empty selection.
    pub fn first_missing<'p>(&self, product: &'p Product) -> Option<&'p Variant> {
        product
            .variants
            .iter()
            .find(|v| self.get(&v.name).map_or(true, str::is_empty))
    }

    /// Every axis of `product` has a non-empty selection.
    pub fn is_ready_for(&self, product: &Product) -> bool {
        self.first_missing(product).is_none()
    }

    /// Cart line key for this selection on `sku`.
    ///
    /// Selections are ordered by variant name, so the same choices always
    /// produce the same key. Backslashes, `=` and `;` inside names and options
    /// are backslash-escaped, so distinct selections never share a key.
    pub fn cart_key(&self, sku: &str) -> String {
        if self.0.is_empty() {
            return sku.to_string();
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", escape_key_part(k), escape_key_part(v)))
            .collect();
        format!("{}:{}", sku, parts.join(";"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for VariantSelection {
    fn from(map: BTreeMap<String, String>) -> Self {
        VariantSelection(map)
    }
}

fn escape_key_part(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        if matches!(c, '\\' | '=' | ';') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariantSelection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        VariantSelection(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
