//! Cart model.
//!
//! [`Cart`] owns the line items and coupon state for the active session.
//! Every mutation recomputes totals and writes a fresh snapshot through the
//! [`CartRepository`], so the stored totals never lag the items.
//!
//! # Lifecycle
//!
//! - [`Cart::initialize`] restores the last snapshot, or seeds a default
//!   cart when nothing usable is stored.
//! - Quantity changes, removals, additions, and the coupon mutate it.
//! - Checkout empties the stored cart once an order is placed; the next
//!   `initialize` then starts over from the seed list.

mod line_item;
pub mod pricing;
mod repository;

use electroverse_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use line_item::LineItem;
pub use pricing::OrderSummary;
pub use repository::{CartRepository, keys};

use crate::catalog::{self, Product};
use crate::storage::{KeyValueStore, StorageError};

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The coupon code is not recognised.
    #[error("invalid coupon code: {0}")]
    InvalidCoupon(String),

    /// A coupon is already active for this cart.
    #[error("a coupon has already been applied")]
    CouponAlreadyApplied,

    /// No line in the cart has this product id.
    ///
    /// The model itself treats unknown ids as no-ops; this is raised by
    /// callers that need to report the miss.
    #[error("no cart item for product {0}")]
    ItemNotFound(ProductId),

    /// The snapshot could not be written.
    #[error("failed to save cart: {0}")]
    Storage(#[from] StorageError),
}

/// Direction of a quantity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// Items plus coupon state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Items in insertion order.
    pub items: Vec<LineItem>,
    /// Zero unless `coupon_applied` is set.
    pub discount_amount: Price,
    pub coupon_applied: bool,
}

/// The active shopping cart, bound to its repository.
#[derive(Debug)]
pub struct Cart<S> {
    repo: CartRepository<S>,
    state: CartState,
}

impl<S: KeyValueStore> Cart<S> {
    /// Load the cart from `repo`, falling back to the seed list.
    ///
    /// A missing, malformed, or empty stored item list yields the default
    /// seed items. A positive stored discount restores the coupon and locks
    /// it. The resulting state is written back immediately.
    ///
    /// This never fails: a write error is logged and the in-memory cart is
    /// still returned.
    #[tracing::instrument(skip_all)]
    pub fn initialize(repo: CartRepository<S>) -> Self {
        let items = match repo.load_items() {
            Some(items) if !items.is_empty() => items,
            _ => {
                tracing::debug!("No stored cart, using seed items");
                catalog::seed_items()
            }
        };

        let discount_amount = repo
            .load_discount()
            .filter(|d| !d.is_zero())
            .unwrap_or(Price::ZERO);

        let cart = Self {
            repo,
            state: CartState {
                items,
                coupon_applied: !discount_amount.is_zero(),
                discount_amount,
            },
        };

        if let Err(e) = cart.persist() {
            tracing::warn!(error = %e, "Failed to save cart on load");
        }

        tracing::info!(
            items = cart.state.items.len(),
            coupon_applied = cart.state.coupon_applied,
            "Cart initialized"
        );
        cart
    }

    /// Current items and coupon state.
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    /// Returns `true` if the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.state.items.iter().map(|item| item.quantity).sum()
    }

    /// Returns `true` once a coupon has been applied.
    pub const fn coupon_applied(&self) -> bool {
        self.state.coupon_applied
    }

    /// Compute totals from the current state.
    pub fn compute_totals(&self) -> OrderSummary {
        OrderSummary::compute(&self.state.items, self.state.discount_amount)
    }

    /// Step the quantity of `id` up or down by one.
    ///
    /// Quantity never drops below 1; use [`Cart::remove_item`] to drop a
    /// line. Unknown ids change nothing. Returns whether a line matched.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be written.
    pub fn change_quantity(&mut self, id: ProductId, direction: Direction) -> Result<bool, CartError> {
        let matched = match self.state.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = match direction {
                    Direction::Increase => item.quantity.saturating_add(1),
                    Direction::Decrease => item.quantity.saturating_sub(1).max(1),
                };
                tracing::debug!(product_id = %id, quantity = item.quantity, "Quantity changed");
                true
            }
            None => false,
        };

        self.persist()?;
        Ok(matched)
    }

    /// Remove the line for `id`, returning it if it was present.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be written.
    pub fn remove_item(&mut self, id: ProductId) -> Result<Option<LineItem>, CartError> {
        let removed = self
            .state
            .items
            .iter()
            .position(|item| item.id == id)
            .map(|index| self.state.items.remove(index));

        if let Some(item) = &removed {
            tracing::info!(product_id = %item.id, name = %item.name, "Item removed from cart");
        }

        self.persist()?;
        Ok(removed)
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line for the product is incremented in place; otherwise a
    /// new line is appended. A zero quantity changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be written.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if let Some(item) = self.state.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else if let Some(item) = LineItem::from_product(product, quantity) {
            self.state.items.push(item);
        }

        tracing::info!(product_id = %product.id, quantity, "Item added to cart");
        self.persist()
    }

    /// Apply a coupon code.
    ///
    /// On a match the discount is fixed at the current subtotal times the
    /// coupon rate and the coupon is locked for the rest of the session.
    /// Returns the discount granted.
    ///
    /// # Errors
    ///
    /// - `CartError::CouponAlreadyApplied` if a coupon is already active
    /// - `CartError::InvalidCoupon` if `code` does not match
    /// - `CartError::Storage` if the snapshot cannot be written
    ///
    /// The cart is unchanged in the first two cases.
    pub fn apply_coupon(&mut self, code: &str) -> Result<Price, CartError> {
        if self.state.coupon_applied {
            return Err(CartError::CouponAlreadyApplied);
        }

        if !pricing::is_valid_coupon(code) {
            tracing::debug!(code, "Rejected coupon code");
            return Err(CartError::InvalidCoupon(code.to_owned()));
        }

        let discount = pricing::coupon_discount(self.compute_totals().subtotal);
        self.state.discount_amount = discount;
        self.state.coupon_applied = true;
        tracing::info!(discount = %discount, "Coupon applied");

        self.persist()?;
        Ok(discount)
    }

    /// Write items and freshly computed totals to the repository.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the store rejects the write.
    pub fn persist(&self) -> Result<(), CartError> {
        self.repo.save(&self.state.items, &self.compute_totals())?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStore;

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn fresh_cart() -> Cart<MemoryStore> {
        Cart::initialize(CartRepository::new(MemoryStore::new()))
    }

    fn cart_with(items: Vec<LineItem>) -> Cart<MemoryStore> {
        let repo = CartRepository::new(MemoryStore::new());
        repo.save(&items, &OrderSummary::compute(&items, Price::ZERO))
            .unwrap();
        Cart::initialize(repo)
    }

    fn product(id: u32) -> Product {
        catalog::find(ProductId::new(id)).unwrap()
    }

    #[test]
    fn test_initialize_seeds_empty_store() {
        let cart = fresh_cart();
        assert_eq!(cart.items(), catalog::seed_items().as_slice());
        assert!(!cart.coupon_applied());
        // Seed is written straight back.
        assert!(cart.repo.has_items());
    }

    #[test]
    fn test_initialize_seeds_over_empty_array() {
        let repo = CartRepository::new(MemoryStore::new());
        repo.clear().unwrap();
        let cart = Cart::initialize(repo);
        assert_eq!(cart.items().len(), 3);
    }

    #[test]
    fn test_initialize_seeds_over_malformed_items() {
        let store = MemoryStore::new();
        store.set(keys::ITEMS, "[{\"id\":").unwrap();
        let cart = Cart::initialize(CartRepository::new(store));
        assert_eq!(cart.items(), catalog::seed_items().as_slice());
    }

    #[test]
    fn test_initialize_restores_coupon_lock() {
        let mut cart = fresh_cart();
        cart.apply_coupon("ELECTROVERSE20").unwrap();
        let discount = cart.state().discount_amount;

        let mut reloaded = Cart::initialize(cart.repo);
        assert!(reloaded.coupon_applied());
        assert_eq!(reloaded.state().discount_amount, discount);
        assert!(matches!(
            reloaded.apply_coupon("ELECTROVERSE20"),
            Err(CartError::CouponAlreadyApplied)
        ));
    }

    #[test]
    fn test_increase_quantity() {
        let mut cart = fresh_cart();
        assert!(cart.change_quantity(ProductId::new(1), Direction::Increase).unwrap());
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.repo.load_items().unwrap()[0].quantity, 2);
    }

    #[test]
    fn test_decrease_stops_at_one() {
        let mut cart = fresh_cart();
        let keyboard = ProductId::new(12);
        cart.change_quantity(keyboard, Direction::Decrease).unwrap();
        cart.change_quantity(keyboard, Direction::Decrease).unwrap();

        let item = cart.items().iter().find(|i| i.id == keyboard).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(cart.items().len(), 3);
    }

    #[test]
    fn test_change_quantity_unknown_id() {
        let mut cart = fresh_cart();
        let before = cart.state().clone();
        assert!(!cart.change_quantity(ProductId::new(99), Direction::Increase).unwrap());
        assert_eq!(cart.state(), &before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = fresh_cart();
        let removed = cart.remove_item(ProductId::new(7)).unwrap().unwrap();
        assert_eq!(removed.quantity, 2);
        assert_eq!(cart.items().len(), 2);
        assert!(cart.remove_item(ProductId::new(7)).unwrap().is_none());
    }

    #[test]
    fn test_remove_last_item_charges_shipping() {
        let mut cart = cart_with(vec![LineItem::from_product(&product(10), 1).unwrap()]);
        cart.remove_item(ProductId::new(10)).unwrap();

        assert!(cart.is_empty());
        let totals = cart.compute_totals();
        assert_eq!(totals.subtotal, Price::ZERO);
        assert_eq!(totals.shipping, price("10.00"));
        assert_eq!(cart.repo.load_summary(), totals);
    }

    #[test]
    fn test_coupon_on_five_hundred() {
        // Price the line at exactly 500.00.
        let mut items = vec![LineItem::from_product(&product(4), 1).unwrap()];
        items[0].unit_price = price("500.00");
        let mut cart = cart_with(items);

        let discount = cart.apply_coupon("electroverse20").unwrap();
        assert_eq!(discount, price("100.00"));
        assert!(cart.coupon_applied());
        assert_eq!(cart.compute_totals().total, price("400.00"));
        assert_eq!(cart.repo.load_summary().discount, price("100.00"));

        let before = cart.state().clone();
        assert!(matches!(
            cart.apply_coupon("ELECTROVERSE20"),
            Err(CartError::CouponAlreadyApplied)
        ));
        assert!(matches!(
            cart.apply_coupon("SOMETHINGELSE"),
            Err(CartError::CouponAlreadyApplied)
        ));
        assert_eq!(cart.state(), &before);
    }

    #[test]
    fn test_invalid_coupon_leaves_state() {
        let mut cart = fresh_cart();
        let before = cart.state().clone();
        assert!(matches!(
            cart.apply_coupon("SAVE10"),
            Err(CartError::InvalidCoupon(code)) if code == "SAVE10"
        ));
        assert_eq!(cart.state(), &before);

        // A later valid code still works.
        assert!(cart.apply_coupon("ELECTROVERSE20").is_ok());
    }

    #[test]
    fn test_discount_fixed_after_quantity_change() {
        let mut cart = fresh_cart();
        let discount = cart.apply_coupon("ELECTROVERSE20").unwrap();
        cart.change_quantity(ProductId::new(1), Direction::Increase).unwrap();
        assert_eq!(cart.compute_totals().discount, discount);
    }

    #[test]
    fn test_add_item() {
        let mut cart = fresh_cart();
        cart.add_item(&product(3), 1).unwrap();
        cart.add_item(&product(1), 2).unwrap();
        cart.add_item(&product(5), 0).unwrap();

        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_u32()).collect();
        assert_eq!(ids, vec![1, 7, 12, 3]);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 3 + 2 + 1 + 1);
    }

    #[test]
    fn test_end_to_end_totals() {
        let cart = cart_with(vec![
            LineItem::from_product(&product(1), 1).unwrap(),
            LineItem::from_product(&product(7), 2).unwrap(),
        ]);
        let totals = cart.compute_totals();
        assert_eq!(totals.subtotal, price("2099.97"));
        assert_eq!(totals.shipping, Price::ZERO);
        assert_eq!(totals.total, price("2099.97"));
    }

    #[test]
    fn test_round_trip_through_repository() {
        let mut cart = fresh_cart();
        cart.change_quantity(ProductId::new(12), Direction::Increase).unwrap();
        cart.apply_coupon("ELECTROVERSE20").unwrap();
        let state = cart.state().clone();
        let totals = cart.compute_totals();

        let reloaded = Cart::initialize(cart.repo);
        assert_eq!(reloaded.state(), &state);
        assert_eq!(reloaded.compute_totals(), totals);
        assert_eq!(reloaded.repo.load_summary(), totals);
    }
}
