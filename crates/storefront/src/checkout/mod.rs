//! Checkout flow.
//!
//! A linear state machine over one checkout session:
//!
//! ```text
//! AddressEntry ──submit_address──▶ Payment ──begin_order──▶ Processing ──complete_order──▶ Complete
//!      ▲                              │
//!      └────────────back──────────────┘
//! ```
//!
//! `Payment → AddressEntry` is the only way back. `Complete` is terminal.
//!
//! Checkout never prices anything itself. It shows the summary the cart
//! last persisted and, once the order is placed, empties the stored cart.

mod address;

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub use address::{AddressErrors, AddressField, DEFAULT_COUNTRY, ShippingAddress};

use crate::cart::{CartRepository, OrderSummary};
use crate::storage::{KeyValueStore, StorageError};

/// Errors returned by checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was entered with nothing in the stored cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The shipping address failed validation.
    #[error(transparent)]
    InvalidAddress(#[from] AddressErrors),

    /// The action is not allowed from the current step.
    #[error("cannot {action} while checkout is at {step}")]
    InvalidTransition {
        step: CheckoutStep,
        action: &'static str,
    },

    /// An order is being placed; the session accepts no input until it
    /// completes.
    #[error("an order is being placed")]
    Processing,

    /// Clearing the stored cart failed.
    #[error("failed to clear cart: {0}")]
    Storage(#[from] StorageError),
}

/// Where a checkout session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    AddressEntry,
    Payment,
    /// The order is being placed; no input is accepted.
    Processing,
    Complete,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AddressEntry => "address entry",
            Self::Payment => "payment",
            Self::Processing => "processing",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Receipt for a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: Uuid,
    pub placed_at: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
    pub summary: OrderSummary,
}

/// An order accepted by [`CheckoutFlow::begin_order`], waiting to complete.
#[derive(Debug)]
#[must_use = "pass this to CheckoutFlow::complete_order"]
pub struct PendingOrder {
    address: ShippingAddress,
    summary: OrderSummary,
}

/// One checkout session.
#[derive(Debug)]
pub struct CheckoutFlow<S> {
    repo: CartRepository<S>,
    step: CheckoutStep,
    address: Option<ShippingAddress>,
    confirmation: Option<OrderConfirmation>,
}

impl<S: KeyValueStore> CheckoutFlow<S> {
    /// Start checkout over the cart stored in `repo`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the stored item list is empty,
    /// missing, or unreadable. The caller should send the user back to the
    /// cart with a notice.
    pub fn enter(repo: CartRepository<S>) -> Result<Self, CheckoutError> {
        if !repo.has_items() {
            tracing::info!("Checkout refused: cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        tracing::debug!("Checkout started");
        Ok(Self {
            repo,
            step: CheckoutStep::AddressEntry,
            address: None,
            confirmation: None,
        })
    }

    /// The current step.
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The accepted shipping address, once submitted.
    pub const fn address(&self) -> Option<&ShippingAddress> {
        self.address.as_ref()
    }

    /// The confirmation, once the order is complete.
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// The totals last persisted by the cart.
    ///
    /// Read straight from storage, not recomputed.
    pub fn summary(&self) -> OrderSummary {
        self.repo.load_summary()
    }

    /// Validate and accept the shipping address, moving on to payment.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::InvalidAddress` with per-field messages; the step
    ///   does not change
    /// - `CheckoutError::InvalidTransition` outside of address entry
    pub fn submit_address(&mut self, address: ShippingAddress) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::AddressEntry, "submit an address")?;
        address.validate()?;

        self.address = Some(address);
        self.step = CheckoutStep::Payment;
        tracing::debug!("Shipping address accepted");
        Ok(())
    }

    /// Return from payment to address entry. The address is kept for editing.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransition` outside of payment.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "go back")?;
        self.step = CheckoutStep::AddressEntry;
        Ok(())
    }

    /// Start placing the order. Input is refused until
    /// [`CheckoutFlow::complete_order`] is called.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransition` outside of payment.
    pub fn begin_order(&mut self) -> Result<PendingOrder, CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "place an order")?;
        let address = self
            .address
            .clone()
            .ok_or(CheckoutError::InvalidTransition {
                step: self.step,
                action: "place an order without an address",
            })?;

        self.step = CheckoutStep::Processing;
        Ok(PendingOrder {
            address,
            summary: self.summary(),
        })
    }

    /// Finish placing the order: empty the stored cart and issue a
    /// confirmation.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::InvalidTransition` unless the order is processing
    /// - `CheckoutError::Storage` if the cart cannot be cleared; the flow
    ///   returns to payment so the order can be retried
    pub fn complete_order(
        &mut self,
        pending: PendingOrder,
    ) -> Result<&OrderConfirmation, CheckoutError> {
        self.expect_step(CheckoutStep::Processing, "complete an order")?;

        if let Err(e) = self.repo.clear() {
            self.step = CheckoutStep::Payment;
            return Err(e.into());
        }

        let confirmation = OrderConfirmation {
            order_number: Uuid::new_v4(),
            placed_at: Utc::now(),
            shipping_address: pending.address,
            summary: pending.summary,
        };
        tracing::info!(
            order_number = %confirmation.order_number,
            total = %confirmation.summary.total,
            "Order placed"
        );

        self.step = CheckoutStep::Complete;
        Ok(self.confirmation.insert(confirmation))
    }

    /// Place the order after a simulated processing delay.
    ///
    /// Dropping the returned future before `latency` elapses leaves the
    /// stored cart untouched.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::begin_order`] and [`CheckoutFlow::complete_order`].
    pub async fn place_order(
        &mut self,
        latency: Duration,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let pending = self.begin_order()?;
        tokio::time::sleep(latency).await;
        self.complete_order(pending).cloned()
    }

    /// Leave a completed checkout.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransition` unless the order is complete.
    pub fn finish(self) -> Result<OrderConfirmation, CheckoutError> {
        match self.confirmation {
            Some(confirmation) if self.step == CheckoutStep::Complete => Ok(confirmation),
            _ => Err(CheckoutError::InvalidTransition {
                step: self.step,
                action: "leave checkout",
            }),
        }
    }

    fn expect_step(
        &self,
        expected: CheckoutStep,
        action: &'static str,
    ) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use electroverse_core::Price;

    use super::*;
    use crate::cart::{Cart, keys};
    use crate::storage::MemoryStore;

    fn seeded_repo() -> CartRepository<std::sync::Arc<MemoryStore>> {
        let repo = CartRepository::new(std::sync::Arc::new(MemoryStore::new()));
        Cart::initialize(repo.clone());
        repo
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            address: "12 Analytical Way".to_owned(),
            city: "London".to_owned(),
            state: "LDN".to_owned(),
            zip_code: "10001".to_owned(),
            ..ShippingAddress::default()
        }
    }

    #[test]
    fn test_enter_refuses_empty_cart() {
        let repo = CartRepository::new(MemoryStore::new());
        assert!(matches!(CheckoutFlow::enter(repo), Err(CheckoutError::EmptyCart)));

        let repo = CartRepository::new(MemoryStore::new());
        repo.clear().unwrap();
        assert!(matches!(CheckoutFlow::enter(repo), Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_enter_refuses_malformed_cart() {
        let store = MemoryStore::new();
        store.set(keys::ITEMS, "not json").unwrap();
        assert!(matches!(
            CheckoutFlow::enter(CartRepository::new(store)),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_invalid_address_stays_on_entry() {
        let mut flow = CheckoutFlow::enter(seeded_repo()).unwrap();
        let err = flow
            .submit_address(ShippingAddress {
                email: "nope".to_owned(),
                ..address()
            })
            .unwrap_err();

        let CheckoutError::InvalidAddress(errors) = err else {
            panic!("expected address errors, got {err:?}");
        };
        assert_eq!(errors.get(AddressField::Email), Some("Email is invalid"));
        assert_eq!(flow.step(), CheckoutStep::AddressEntry);
        assert!(flow.address().is_none());
    }

    #[test]
    fn test_address_then_back() {
        let mut flow = CheckoutFlow::enter(seeded_repo()).unwrap();
        flow.submit_address(address()).unwrap();
        assert_eq!(flow.step(), CheckoutStep::Payment);

        flow.back().unwrap();
        assert_eq!(flow.step(), CheckoutStep::AddressEntry);
        assert_eq!(flow.address(), Some(&address()));
        assert!(flow.back().is_err());
    }

    #[test]
    fn test_cannot_skip_payment() {
        let mut flow = CheckoutFlow::enter(seeded_repo()).unwrap();
        assert!(matches!(
            flow.begin_order(),
            Err(CheckoutError::InvalidTransition {
                step: CheckoutStep::AddressEntry,
                ..
            })
        ));
    }

    #[test]
    fn test_summary_is_last_snapshot() {
        let repo = seeded_repo();
        repo.store().set(keys::TOTAL, "\"1.23\"").unwrap();
        let flow = CheckoutFlow::enter(repo).unwrap();
        assert_eq!(flow.summary().total, Price::from_cents(123));
    }

    #[test]
    fn test_processing_refuses_input() {
        let mut flow = CheckoutFlow::enter(seeded_repo()).unwrap();
        flow.submit_address(address()).unwrap();
        let pending = flow.begin_order().unwrap();

        assert_eq!(flow.step(), CheckoutStep::Processing);
        assert!(flow.back().is_err());
        assert!(flow.submit_address(address()).is_err());
        assert!(flow.begin_order().is_err());

        flow.complete_order(pending).unwrap();
        assert_eq!(flow.step(), CheckoutStep::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_place_order_clears_cart_after_latency() {
        let repo = seeded_repo();
        let expected = repo.load_summary();
        let mut flow = CheckoutFlow::enter(repo.clone()).unwrap();
        flow.submit_address(address()).unwrap();

        let started = tokio::time::Instant::now();
        let confirmation = flow.place_order(Duration::from_secs(2)).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(confirmation.summary, expected);
        assert_eq!(confirmation.shipping_address, address());
        assert_eq!(flow.step(), CheckoutStep::Complete);
        assert!(!repo.has_items());
        assert_eq!(repo.load_summary(), OrderSummary::default());

        // Complete is terminal.
        assert!(flow.back().is_err());
        assert_eq!(flow.finish().unwrap(), confirmation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_order_keeps_cart() {
        let repo = seeded_repo();
        let mut flow = CheckoutFlow::enter(repo.clone()).unwrap();
        flow.submit_address(address()).unwrap();

        let result =
            tokio::time::timeout(Duration::from_secs(1), flow.place_order(Duration::from_secs(2)))
                .await;

        assert!(result.is_err());
        assert!(repo.has_items());
        assert!(flow.confirmation().is_none());
    }

    #[test]
    fn test_finish_requires_complete() {
        let flow = CheckoutFlow::enter(seeded_repo()).unwrap();
        assert!(flow.finish().is_err());
    }
}
