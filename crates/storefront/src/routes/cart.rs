//! Cart route handlers.
//!
//! Mutations are refused while an order is being placed, since placing it
//! empties the stored cart.
//!
//! Every handler answers with the full cart view so the client can redraw
//! items and totals from one response. Totals always come from
//! [`Cart::compute_totals`]; nothing here does arithmetic on prices.

use axum::{Json, extract::State};
use electroverse_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{Cart, CartError, CartState, Direction, LineItem, OrderSummary};
use crate::catalog;
use crate::error::{AppError, Result};
use crate::state::{AppState, SharedStore};

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub summary: OrderSummary,
    pub item_count: u32,
    pub coupon_applied: bool,
    /// Toast-style message confirming the last action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl CartView {
    fn new(cart: &Cart<SharedStore>, notice: Option<String>) -> Self {
        let CartState {
            items,
            coupon_applied,
            ..
        } = cart.state();

        Self {
            items: items.clone(),
            summary: cart.compute_totals(),
            item_count: cart.item_count(),
            coupon_applied: *coupon_applied,
            notice,
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: ProductId,
    pub quantity: Option<u32>,
}

/// Quantity step request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub id: ProductId,
    pub direction: Direction,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: ProductId,
}

/// Apply coupon request body.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
}

/// Display the cart.
///
/// Viewing the cart reloads it from storage, the same as opening the page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let mut session = state.session().await;
    let cart = session.cart.insert(Cart::initialize(state.repo().clone()));
    Json(CartView::new(cart, None))
}

/// Add a catalog product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = catalog::find(form.id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.id)))?;

    let mut session = state.session().await;
    session.ensure_idle()?;
    let cart = session.cart(state.repo());
    cart.add_item(&product, form.quantity.unwrap_or(1))?;

    Ok(Json(CartView::new(
        cart,
        Some(format!("{} added to cart", product.name)),
    )))
}

/// Step an item's quantity up or down.
#[instrument(skip(state))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Json(form): Json<UpdateQuantityForm>,
) -> Result<Json<CartView>> {
    let mut session = state.session().await;
    session.ensure_idle()?;
    let cart = session.cart(state.repo());
    if !cart.change_quantity(form.id, form.direction)? {
        return Err(CartError::ItemNotFound(form.id).into());
    }
    Ok(Json(CartView::new(cart, None)))
}

/// Remove an item from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut session = state.session().await;
    session.ensure_idle()?;
    let cart = session.cart(state.repo());
    cart.remove_item(form.id)?
        .ok_or(CartError::ItemNotFound(form.id))?;
    Ok(Json(CartView::new(
        cart,
        Some("Item removed from cart".to_string()),
    )))
}

/// Apply a coupon code.
#[instrument(skip(state))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(form): Json<CouponForm>,
) -> Result<Json<CartView>> {
    let mut session = state.session().await;
    session.ensure_idle()?;
    let cart = session.cart(state.repo());
    cart.apply_coupon(&form.code)?;
    Ok(Json(CartView::new(
        cart,
        Some("Coupon applied successfully: 20% discount".to_string()),
    )))
}
