//! Cart line items.

use electroverse_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// One product entry in the cart.
///
/// The persisted form keeps the storefront's historical field names
/// (`price`, `image`), so snapshots written by earlier versions of the
/// storefront load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identity; unique within a cart.
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    /// Always at least 1 while the item is in the cart.
    pub quantity: u32,
    pub category: String,
    #[serde(rename = "image")]
    pub image_ref: String,
}

impl LineItem {
    /// Build a line item for `product`.
    ///
    /// Returns `None` if `quantity` is zero.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Option<Self> {
        (quantity >= 1).then(|| Self {
            id: product.id,
            name: product.name.to_owned(),
            unit_price: product.price,
            quantity,
            category: product.category.to_owned(),
            image_ref: product.image.clone(),
        })
    }

    /// `unit_price × quantity`, at full precision.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}
