//! Pricing rules and the order summary snapshot.
//!
//! This is the only place totals are computed. Views and checkout either
//! call [`OrderSummary::compute`] through the cart or read the last
//! persisted snapshot; they never re-derive prices on their own.

use electroverse_core::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItem;

/// The one coupon code the store accepts.
pub const COUPON_CODE: &str = "ELECTROVERSE20";

/// Fraction of the subtotal taken off by [`COUPON_CODE`].
pub const COUPON_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Shipping is free when the subtotal is strictly above this many dollars.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Flat shipping charge in cents for orders at or below the threshold.
pub const FLAT_SHIPPING_CENTS: u32 = 1_000;

/// Derived totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub discount: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Compute totals for `items` with a fixed `discount` already applied.
    ///
    /// The total is clamped at zero when the discount exceeds
    /// subtotal plus shipping.
    #[must_use]
    pub fn compute(items: &[LineItem], discount: Price) -> Self {
        let subtotal: Price = items.iter().map(LineItem::line_total).sum();
        let shipping = shipping_for(subtotal);
        let total = (subtotal + shipping).saturating_sub(discount);

        Self {
            subtotal,
            shipping,
            discount,
            total,
        }
    }

    /// Returns `true` if shipping is free.
    #[must_use]
    pub const fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Shipping charge for a given subtotal.
#[must_use]
pub fn shipping_for(subtotal: Price) -> Price {
    if subtotal.amount() > FREE_SHIPPING_THRESHOLD {
        Price::ZERO
    } else {
        Price::from_cents(FLAT_SHIPPING_CENTS)
    }
}

/// Returns `true` if `code` is the store coupon, ignoring case.
///
/// Surrounding whitespace is not trimmed.
#[must_use]
pub fn is_valid_coupon(code: &str) -> bool {
    code.to_uppercase() == COUPON_CODE
}

/// Discount granted by the coupon on `subtotal`.
#[must_use]
pub fn coupon_discount(subtotal: Price) -> Price {
    subtotal.scale(COUPON_RATE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use electroverse_core::ProductId;

    use super::*;

    fn item(id: u32, cents: u32, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Price::from_cents(cents),
            quantity,
            category: "Test".to_owned(),
            image_ref: String::new(),
        }
    }

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let items = [item(1, 99_999, 1), item(7, 54_999, 2)];
        let summary = OrderSummary::compute(&items, Price::ZERO);
        assert_eq!(summary.subtotal, price("2099.97"));
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.total, price("2099.97"));
    }

    #[test]
    fn test_empty_cart_pays_shipping() {
        let summary = OrderSummary::compute(&[], Price::ZERO);
        assert_eq!(summary.subtotal, Price::ZERO);
        assert_eq!(summary.shipping, price("10.00"));
        assert_eq!(summary.total, price("10.00"));
        assert!(!summary.free_shipping());
    }

    #[test]
    fn test_free_shipping_threshold_is_exclusive() {
        assert_eq!(shipping_for(price("100.00")), price("10"));
        assert_eq!(shipping_for(price("100.01")), Price::ZERO);
        assert_eq!(shipping_for(price("99.99")), price("10"));
    }

    #[test]
    fn test_total_clamped_at_zero() {
        let summary = OrderSummary::compute(&[], price("50"));
        assert_eq!(summary.total, Price::ZERO);
        assert_eq!(summary.discount, price("50"));
    }

    #[test]
    fn test_discount_subtracted_from_total() {
        let items = [item(1, 50_000, 1)];
        let summary = OrderSummary::compute(&items, price("100"));
        assert_eq!(summary.total, price("400"));
    }

    #[test]
    fn test_coupon_matching_ignores_case_only() {
        assert!(is_valid_coupon("ELECTROVERSE20"));
        assert!(is_valid_coupon("electroverse20"));
        assert!(is_valid_coupon("ElectroVerse20"));
        assert!(!is_valid_coupon(" ELECTROVERSE20"));
        assert!(!is_valid_coupon("ELECTROVERSE2"));
        assert!(!is_valid_coupon(""));
    }

    #[test]
    fn test_coupon_discount_is_twenty_percent() {
        assert_eq!(coupon_discount(price("500.00")), price("100.00"));
        assert_eq!(coupon_discount(Price::ZERO), Price::ZERO);
    }
}
