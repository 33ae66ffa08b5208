//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::cart::{Cart, CartRepository};
use crate::checkout::{CheckoutError, CheckoutFlow, CheckoutStep};
use crate::config::StorefrontConfig;
use crate::services::NewsletterService;
use crate::storage::KeyValueStore;

/// Store handle shared by the cart and checkout.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// The one shopper's in-progress cart and checkout.
///
/// The storefront is a single-user demo: there is exactly one session and
/// handlers take turns on it through [`AppState::session`].
#[derive(Debug, Default)]
pub struct Session {
    /// Mounted cart, if the cart has been viewed since the last order.
    pub cart: Option<Cart<SharedStore>>,
    /// Active checkout, if one was started.
    pub checkout: Option<CheckoutFlow<SharedStore>>,
}

impl Session {
    /// The mounted cart, loading it from `repo` on first use.
    pub fn cart(&mut self, repo: &CartRepository<SharedStore>) -> &mut Cart<SharedStore> {
        self.cart
            .get_or_insert_with(|| Cart::initialize(repo.clone()))
    }

    /// Refuse input while an order is being placed.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Processing` if the active checkout is at
    /// [`CheckoutStep::Processing`].
    pub fn ensure_idle(&self) -> Result<(), CheckoutError> {
        match self.checkout.as_ref().map(CheckoutFlow::step) {
            Some(CheckoutStep::Processing) => Err(CheckoutError::Processing),
            _ => Ok(()),
        }
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the cart store, configuration, and the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    repo: CartRepository<SharedStore>,
    newsletter: NewsletterService,
    session: Mutex<Session>,
}

impl AppState {
    /// Create a new application state over `store`.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: SharedStore) -> Self {
        let newsletter = NewsletterService::new(config.newsletter_delay);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                repo: CartRepository::new(store),
                newsletter,
                session: Mutex::new(Session::default()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart repository.
    #[must_use]
    pub fn repo(&self) -> &CartRepository<SharedStore> {
        &self.inner.repo
    }

    /// Get a reference to the newsletter service.
    #[must_use]
    pub fn newsletter(&self) -> &NewsletterService {
        &self.inner.newsletter
    }

    /// Lock the session.
    pub async fn session(&self) -> MutexGuard<'_, Session> {
        self.inner.session.lock().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::ShippingAddress;
    use crate::storage::MemoryStore;

    fn seeded_repo() -> CartRepository<SharedStore> {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let repo = CartRepository::new(store);
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
    fn test_idle_without_checkout() {
        assert!(Session::default().ensure_idle().is_ok());
    }

    #[test]
    fn test_idle_outside_processing() {
        let mut session = Session {
            checkout: Some(CheckoutFlow::enter(seeded_repo()).unwrap()),
            ..Session::default()
        };
        assert!(session.ensure_idle().is_ok());

        session
            .checkout
            .as_mut()
            .unwrap()
            .submit_address(address())
            .unwrap();
        assert!(session.ensure_idle().is_ok());
    }

    #[test]
    fn test_busy_while_processing() {
        let mut flow = CheckoutFlow::enter(seeded_repo()).unwrap();
        flow.submit_address(address()).unwrap();
        let pending = flow.begin_order().unwrap();

        let mut session = Session {
            checkout: Some(flow),
            ..Session::default()
        };
        assert!(matches!(
            session.ensure_idle(),
            Err(CheckoutError::Processing)
        ));

        session
            .checkout
            .as_mut()
            .unwrap()
            .complete_order(pending)
            .unwrap();
        assert!(session.ensure_idle().is_ok());
    }
}
