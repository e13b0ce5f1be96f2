//! # Navigation
//!
//! Breadcrumb trails for product pages and category filtering for list views.
//!
//! ```text
//! Shop  >  Tops  >  Basic Tee
//!  /       /tops    /tops/basic-tee
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::text::capitalize;
use crate::types::Product;

/// View name that lists every product.
pub const ALL_PRODUCTS_VIEW: &str = "all";

/// One link in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// Builds the `Shop > Category > Product` trail.
pub fn breadcrumbs(category: &str, pathname: &str, product_name: &str) -> Vec<Breadcrumb> {
    vec![
        Breadcrumb {
            label: "Shop".to_string(),
            path: "/".to_string(),
        },
        Breadcrumb {
            label: capitalize(category),
            path: format!("/{}", category),
        },
        Breadcrumb {
            label: product_name.to_string(),
            path: format!("/{}", pathname),
        },
    ]
}

/// Products shown for a list view: everything for `"all"` or an empty view,
/// otherwise the products whose category equals the view.
pub fn filter_by_view<'a>(products: &'a [Product], view: &str) -> Vec<&'a Product> {
    if view.is_empty() || view == ALL_PRODUCTS_VIEW {
        return products.iter().collect();
    }
    products.iter().filter(|p| p.category == view).collect()
}
