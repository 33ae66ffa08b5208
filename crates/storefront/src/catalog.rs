//! Static product catalog.
//!
//! The storefront has no inventory backend: products are a fixed table
//! compiled into the binary. The cart copies the fields it needs out of a
//! [`Product`] when an item is added and never consults the catalog again.

use electroverse_core::{Price, ProductId};
use serde::Serialize;

use crate::cart::LineItem;

const IMAGE_BASE: &str = "https://images.unsplash.com";

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: &'static str,
    pub category: &'static str,
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Average review score out of five.
    pub rating: f32,
}

struct Record {
    id: u32,
    name: &'static str,
    category: &'static str,
    cents: u32,
    rating: f32,
    image: &'static str,
}

impl Record {
    fn to_product(&self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name,
            category: self.category,
            price: Price::from_cents(self.cents),
            image: format!("{IMAGE_BASE}/{}?q=80&auto=format&fit=crop", self.image),
            rating: self.rating,
        }
    }
}

#[rustfmt::skip]
const PRODUCTS: &[Record] = &[
    Record { id: 1, name: "Galaxy Pro Ultra", category: "Smartphones", cents: 99_999, rating: 4.8, image: "photo-1611740677496-3e0ef378e189" },
    Record { id: 2, name: "Ultra Book X1", category: "Laptops", cents: 129_999, rating: 4.7, image: "photo-1629131726692-1accd0c53ce0" },
    Record { id: 3, name: "Pro Noise Cancelling Headphones", category: "Audio", cents: 29_999, rating: 4.6, image: "photo-1578319439584-104c94d37305" },
    Record { id: 4, name: "Game Station 5", category: "Gaming", cents: 49_999, rating: 4.9, image: "photo-1640955014216-75201056c829" },
    Record { id: 5, name: "Smart Watch Series 7", category: "Wearables", cents: 34_999, rating: 4.5, image: "photo-1508685096489-7aacd43bd3b1" },
    Record { id: 6, name: "Smart Home Hub", category: "Home Tech", cents: 14_999, rating: 4.4, image: "photo-1648317136273-10b5f0d70b24" },
    Record { id: 7, name: "Ultra Wide Monitor 34\"", category: "Computers", cents: 54_999, rating: 4.7, image: "photo-1617901647379-bfa885db27f4" },
    Record { id: 8, name: "Smart Security Camera", category: "Home Tech", cents: 12_999, rating: 4.3, image: "photo-1555774698-0b77e0d5fac6" },
    Record { id: 9, name: "Wireless Earbuds Pro", category: "Audio", cents: 17_999, rating: 4.6, image: "photo-1631176093617-63490a3d785a" },
    Record { id: 10, name: "Phone Charging Stand", category: "Accessories", cents: 3_999, rating: 4.4, image: "photo-1603539444875-76e7684275dd" },
    Record { id: 11, name: "Premium Laptop Sleeve", category: "Accessories", cents: 2_999, rating: 4.2, image: "photo-1583394838336-acd977736f90" },
    Record { id: 12, name: "Bluetooth Keyboard", category: "Accessories", cents: 6_999, rating: 4.5, image: "photo-1587829741301-dc798b83add3" },
];

/// Products placed in a fresh cart, with their starting quantities.
const SEED: &[(u32, u32)] = &[(1, 1), (7, 2), (12, 1)];

/// Every product, in catalog order.
#[must_use]
pub fn all() -> Vec<Product> {
    PRODUCTS.iter().map(Record::to_product).collect()
}

/// Look up a product by id.
#[must_use]
pub fn find(id: ProductId) -> Option<Product> {
    PRODUCTS
        .iter()
        .find(|r| r.id == id.as_u32())
        .map(Record::to_product)
}

/// The line items a cart starts with when nothing has been persisted.
#[must_use]
pub fn seed_items() -> Vec<LineItem> {
    SEED.iter()
        .filter_map(|&(id, quantity)| {
            find(ProductId::new(id)).and_then(|p| LineItem::from_product(&p, quantity))
        })
        .collect()
}
