//! # Session Record
//!
//! The one record the storefront persists for a shopper.
//!
//! ## Stored Shape
//! ```json
//! { "uid": "K4P0...", "cart": { "TEE-001:Size=M": { ... } }, "expires": 1700000000000, "maxAge": 1700000600000 }
//! ```
//!
//! ## Refresh Rule
//! ```text
//! candidate = now + window
//!
//! max_age unset                     ──► expires = candidate
//! max_age - candidate >  window     ──► expires = candidate
//! max_age - candidate <= window     ──► expires = max_age   (clamp)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::CartLineItem;

/// Cart lines keyed by cart-line key. Values are opaque JSON so the session
/// layer never depends on the line-item shape.
pub type CartMap = BTreeMap<String, serde_json::Value>;

/// The persisted shopper session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    /// 32-character identifier, fixed at creation.
    pub uid: String,

    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub cart: CartMap,

    /// Epoch milliseconds after which the session is stale.
    pub expires: i64,

    /// Epoch milliseconds past which a refresh may not push `expires`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub max_age: Option<i64>,
}

impl Session {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires
    }

    /// Expiry a refresh at `now_ms` would set.
    ///
    /// Saturates instead of overflowing, since `max_age` comes from stored JSON.
    pub fn refreshed_expiry(&self, now_ms: i64, window_ms: i64) -> i64 {
        let candidate = now_ms.saturating_add(window_ms);
        match self.max_age {
            Some(max_age) if max_age.saturating_sub(candidate) <= window_ms => max_age,
            _ => candidate,
        }
    }

    /// Returns a copy with `expires` advanced for a refresh at `now_ms`.
    pub fn refreshed(mut self, now_ms: i64, window_ms: i64) -> Self {
        self.expires = self.refreshed_expiry(now_ms, window_ms);
        self
    }

    /// Cart entries that decode as [`CartLineItem`]; anything else is skipped.
    pub fn line_items(&self) -> Vec<(&str, CartLineItem)> {
        self.cart
            .iter()
            .filter_map(|(key, value)| {
                CartLineItem::deserialize(value)
                    .ok()
                    .map(|item| (key.as_str(), item))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(max_age: Option<i64>) -> Session {
        Session {
            uid: "A0123456789BCDEFGHIJKLMNOPQRSTUV".into(),
            cart: CartMap::new(),
            expires: 1_000,
            max_age,
        }
    }

    #[test]
    fn test_refresh_without_max_age_uses_window() {
        assert_eq!(session(None).refreshed_expiry(10_000, 300_000), 310_000);
    }

    #[test]
    fn test_refresh_with_distant_max_age_uses_window() {
        let s = session(Some(10_000_000));
        assert_eq!(s.refreshed(10_000, 300_000).expires, 310_000);
    }

    #[test]
    fn test_refresh_clamps_to_near_max_age() {
        // max_age 200s away: candidate is 300s away, gap is negative
        assert_eq!(session(Some(210_000)).refreshed_expiry(10_000, 300_000), 210_000);
        // gap exactly one window still clamps
        assert_eq!(session(Some(610_000)).refreshed_expiry(10_000, 300_000), 610_000);
        // one ms more than a window does not
        assert_eq!(session(Some(610_001)).refreshed_expiry(10_000, 300_000), 310_000);
    }

    #[test]
    fn test_refresh_with_extreme_max_age() {
        assert_eq!(
            session(Some(i64::MIN)).refreshed_expiry(10_000, 300_000),
            i64::MIN
        );
        assert_eq!(
            session(Some(i64::MAX)).refreshed_expiry(10_000, 300_000),
            310_000
        );
        assert_eq!(
            session(None).refreshed_expiry(i64::MAX, 300_000),
            i64::MAX
        );
    }

    #[test]
    fn test_is_expired() {
        let s = session(None);
        assert!(!s.is_expired(999));
        assert!(s.is_expired(1_000));
    }

    #[test]
    fn test_wire_format() {
        let mut s = session(None);
        s.cart.insert("lineA".into(), json!(1));
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(
            value,
            json!({ "uid": s.uid, "cart": { "lineA": 1 }, "expires": 1_000 })
        );

        let with_max: Session = serde_json::from_value(json!({
            "uid": "X", "cart": {}, "expires": 5, "maxAge": 9
        }))
        .unwrap();
        assert_eq!(with_max.max_age, Some(9));

        let no_cart: Session = serde_json::from_value(json!({ "uid": "X", "expires": 5 })).unwrap();
        assert!(no_cart.cart.is_empty());
    }

    #[test]
    fn test_line_items_skip_foreign_values() {
        let mut s = session(None);
        s.cart.insert("lineA".into(), json!(1));
        s.cart.insert(
            "TEE-001:Size=M".into(),
            json!({ "sku": "TEE-001", "selections": { "Size": "M" }, "quantity": 2, "unitPriceCents": 1250 }),
        );
        let items = s.line_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, "TEE-001:Size=M");
        assert_eq!(items[0].1.quantity, 2);
    }
}
