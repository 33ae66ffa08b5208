//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /catalog                - Product listing
//! GET  /catalog/{id}           - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart (reloads from storage)
//! POST /cart/add               - Add a product      {id, quantity?}
//! POST /cart/quantity          - Step a quantity    {id, direction}
//! POST /cart/remove            - Remove an item     {id}
//! POST /cart/coupon            - Apply a coupon     {code}
//!
//! # Checkout
//! POST /checkout               - Start checkout (303 to /cart when empty)
//! GET  /checkout               - Current step and summary
//! POST /checkout/address       - Submit shipping address
//! POST /checkout/back          - Payment -> address entry
//! POST /checkout/place-order   - Place the order
//! POST /checkout/continue      - Leave a completed checkout (303 to /)
//!
//! # Newsletter
//! POST /newsletter             - Subscribe          {email}
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod newsletter;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{id}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::update_quantity))
        .route("/remove", post(cart::remove))
        .route("/coupon", post(cart::apply_coupon))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::start))
        .route("/address", post(checkout::submit_address))
        .route("/back", post(checkout::back))
        .route("/place-order", post(checkout::place_order))
        .route("/continue", post(checkout::finish))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/newsletter", post(newsletter::subscribe))
        .nest("/catalog", catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}

/// Build the application with state and request tracing.
pub fn app(state: AppState) -> Router {
    routes().layer(TraceLayer::new_for_http()).with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
