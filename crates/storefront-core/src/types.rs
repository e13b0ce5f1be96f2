//! # Domain Types
//!
//! Catalog and cart types shared by the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Variant      │   │  CartLineItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku            │──►│  name  "Size"   │   │  sku            │       │
//! │  │  product_name   │   │  options [S,M]  │   │  selections     │       │
//! │  │  unit_price ────┼─┐ └─────────────────┘   │  quantity       │       │
//! │  │  variants       │ │                       │  unit_price_cents│      │
//! │  └─────────────────┘ │ ┌─────────────────┐   └─────────────────┘       │
//! │                      └►│   UnitPrice     │                             │
//! │                        │  retail_value   │                             │
//! │                        │  sale_value     │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in camelCase to match the inventory JSON the UI ships.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{parse_money, Money};

// =============================================================================
// Pricing
// =============================================================================

/// A price as it appears in inventory data: either a JSON number or a
/// formatted money string such as `"£12.50"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    /// Whether the value counts as "set" (non-empty text, non-zero number).
    pub fn is_set(&self) -> bool {
        match self {
            PriceValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PriceValue::Text(s) => !s.is_empty(),
        }
    }

    /// Coerces the value to a 2-decimal number.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            PriceValue::Number(n) => parse_money(*n).ok(),
            PriceValue::Text(s) => parse_money(s.as_str()).ok(),
        }
    }
}

/// The price record attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UnitPrice {
    /// Regular shelf price.
    #[serde(default)]
    pub retail_value: Option<PriceValue>,

    /// Discounted price, takes precedence over retail when set.
    #[serde(default)]
    pub sale_value: Option<PriceValue>,

    /// ISO 4217 code, e.g. "GBP".
    #[serde(default)]
    pub currency: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A named product attribute with an ordered list of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    pub name: String,
    pub options: Vec<String>,
}

impl Variant {
    pub fn new(name: impl Into<String>, options: &[&str]) -> Self {
        Variant {
            name: name.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// A product as listed in the storefront inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name.
    pub product_name: String,

    /// Category slug used by list views and breadcrumbs.
    #[serde(default)]
    pub category: String,

    /// URL path of the product page, without leading slash.
    #[serde(default)]
    pub pathname: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub unit_price: Option<UnitPrice>,

    /// Variant axes in display order.
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Looks up a variant axis by name.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

/// The inventory document: `{ "products": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Catalog {
    /// Parses an inventory document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Finds a product by SKU.
    pub fn find(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku == sku)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// A line in the session cart.
///
/// Uses the snapshot pattern: the unit price is frozen at the moment the
/// shopper adds the item, so later catalog price changes do not move it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    pub sku: String,
    /// One entry per variant axis of the product.
    pub selections: BTreeMap<String, String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl CartLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = r#"{
        "products": [
            {
                "sku": "TEE-001",
                "productName": "Basic Tee",
                "category": "tops",
                "pathname": "tops/basic-tee",
                "imageUrl": "https://cdn.example.com/tee.jpg",
                "unitPrice": { "retailValue": "£15.00", "saleValue": 12.5, "currency": "GBP" },
                "variants": [
                    { "name": "Size", "options": ["S", "M", "L"] },
                    { "name": "Color", "options": ["Red", "Blue"] }
                ]
            },
            { "sku": "CAP-002", "productName": "Cap" }
        ]
    }"#;

    #[test]
    fn test_catalog_parses_inventory_json() {
        let catalog = Catalog::from_json(INVENTORY).unwrap();
        assert_eq!(catalog.products.len(), 2);

        let tee = catalog.find("TEE-001").unwrap();
        assert_eq!(tee.product_name, "Basic Tee");
        assert_eq!(tee.variants.len(), 2);
        let price = tee.unit_price.as_ref().unwrap();
        assert_eq!(price.retail_value, Some(PriceValue::Text("£15.00".into())));
        assert_eq!(price.sale_value, Some(PriceValue::Number(12.5)));

        let cap = catalog.find("CAP-002").unwrap();
        assert!(cap.unit_price.is_none());
        assert!(cap.variants.is_empty());
        assert!(catalog.find("NOPE").is_none());
    }

    #[test]
    fn test_price_value_is_set() {
        assert!(PriceValue::Number(1.0).is_set());
        assert!(!PriceValue::Number(0.0).is_set());
        assert!(PriceValue::Text("0".into()).is_set());
        assert!(!PriceValue::Text(String::new()).is_set());
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let item = CartLineItem {
            sku: "TEE-001".into(),
            selections: BTreeMap::from([("Size".to_string(), "M".to_string())]),
            quantity: 2,
            unit_price_cents: 1250,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["unitPriceCents"], 1250);
        assert_eq!(json["selections"]["Size"], "M");
        assert_eq!(item.line_total().cents(), 2500);
    }
}
