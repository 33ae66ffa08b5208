//! Cart persistence on top of a [`KeyValueStore`].
//!
//! # Key layout
//!
//! | Key            | Value                              |
//! |----------------|------------------------------------|
//! | `cartItems`    | JSON array of [`LineItem`]         |
//! | `cartSubtotal` | JSON string holding a decimal      |
//! | `cartShipping` | JSON string holding a decimal      |
//! | `cartDiscount` | JSON string holding a decimal      |
//! | `cartTotal`    | JSON string holding a decimal      |
//!
//! The four summary keys are written next to the item list so checkout can
//! show totals without decoding items. Checkout trusts these values as the
//! cart's last word on pricing and does not recompute them.
//!
//! Anything missing or unparseable is read back as absent.

use electroverse_core::Price;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{LineItem, OrderSummary};
use crate::storage::{KeyValueStore, StorageError, StoreWrite};

/// Storage keys used by the cart.
pub mod keys {
    pub const ITEMS: &str = "cartItems";
    pub const SUBTOTAL: &str = "cartSubtotal";
    pub const SHIPPING: &str = "cartShipping";
    pub const DISCOUNT: &str = "cartDiscount";
    pub const TOTAL: &str = "cartTotal";

    /// The summary keys, in write order.
    pub const SUMMARY: [&str; 4] = [SUBTOTAL, SHIPPING, DISCOUNT, TOTAL];
}

/// Reads and writes cart snapshots.
#[derive(Debug, Clone)]
pub struct CartRepository<S> {
    store: S,
}

impl<S: KeyValueStore> CartRepository<S> {
    /// Create a repository over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted item list.
    ///
    /// Returns `None` if nothing is stored, the value is malformed, or an
    /// item has a zero quantity. Malformed data is logged and otherwise
    /// ignored.
    pub fn load_items(&self) -> Option<Vec<LineItem>> {
        let items: Vec<LineItem> = self.read_json(keys::ITEMS)?;
        if let Some(bad) = items.iter().find(|item| item.quantity == 0) {
            tracing::warn!(product_id = %bad.id, "Discarding stored cart with zero-quantity item");
            return None;
        }
        Some(items)
    }

    /// Returns `true` if a non-empty item list is stored.
    pub fn has_items(&self) -> bool {
        self.load_items().is_some_and(|items| !items.is_empty())
    }

    /// Load the persisted coupon discount, if any.
    pub fn load_discount(&self) -> Option<Price> {
        self.read_json(keys::DISCOUNT)
    }

    /// Load the last persisted order summary.
    ///
    /// Missing or malformed fields read as zero.
    pub fn load_summary(&self) -> OrderSummary {
        let field = |key| self.read_json::<Price>(key).unwrap_or_default();
        OrderSummary {
            subtotal: field(keys::SUBTOTAL),
            shipping: field(keys::SHIPPING),
            discount: field(keys::DISCOUNT),
            total: field(keys::TOTAL),
        }
    }

    /// Persist the item list and its summary in one batch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store rejects the write.
    #[tracing::instrument(skip_all, fields(items = items.len(), total = %summary.total))]
    pub fn save(&self, items: &[LineItem], summary: &OrderSummary) -> Result<(), StorageError> {
        let writes = vec![
            StoreWrite::set(keys::ITEMS, serde_json::to_string(items)?),
            StoreWrite::set(keys::SUBTOTAL, encode(&summary.subtotal)?),
            StoreWrite::set(keys::SHIPPING, encode(&summary.shipping)?),
            StoreWrite::set(keys::DISCOUNT, encode(&summary.discount)?),
            StoreWrite::set(keys::TOTAL, encode(&summary.total)?),
        ];
        self.store.write_batch(writes)
    }

    /// Empty the cart after an order is placed.
    ///
    /// Stores an empty item list and drops every summary key in the same
    /// batch, so no stale discount or total outlives the items.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store rejects the write.
    #[tracing::instrument(skip_all)]
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut writes = vec![StoreWrite::set(keys::ITEMS, "[]")];
        writes.extend(keys::SUMMARY.into_iter().map(StoreWrite::remove));
        self.store.write_batch(writes)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed stored value");
                None
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
