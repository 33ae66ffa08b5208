//! Checkout route handlers.
//!
//! The checkout summary shown here is whatever the cart last persisted.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use crate::cart::OrderSummary;
use crate::checkout::{
    CheckoutError, CheckoutFlow, CheckoutStep, OrderConfirmation, ShippingAddress,
};
use crate::error::{AppError, Result};
use crate::state::{AppState, Session, SharedStore};

/// Checkout display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub summary: OrderSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ShippingAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<OrderConfirmation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl CheckoutView {
    fn new(flow: &CheckoutFlow<SharedStore>, notice: Option<String>) -> Self {
        let confirmation = flow.confirmation().cloned();
        Self {
            step: flow.step(),
            // Once complete, show what was charged rather than the emptied store.
            summary: confirmation
                .as_ref()
                .map_or_else(|| flow.summary(), |c| c.summary),
            address: flow.address().cloned(),
            confirmation,
            notice,
        }
    }
}

fn active_flow(session: &mut Session) -> Result<&mut CheckoutFlow<SharedStore>> {
    session
        .checkout
        .as_mut()
        .ok_or_else(|| AppError::NotFound("checkout session".to_string()))
}

/// Start checkout.
///
/// Replaces any checkout already in progress, unless its order is being
/// placed. An empty cart answers with a redirect to the cart page.
#[instrument(skip(state))]
pub async fn start(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let mut session = state.session().await;
    session.ensure_idle()?;
    let flow = session
        .checkout
        .insert(CheckoutFlow::enter(state.repo().clone())?);
    Ok(Json(CheckoutView::new(flow, None)))
}

/// Show the checkout in progress.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let mut session = state.session().await;
    let flow = active_flow(&mut session)?;
    Ok(Json(CheckoutView::new(flow, None)))
}

/// Submit the shipping address.
#[instrument(skip(state, address))]
pub async fn submit_address(
    State(state): State<AppState>,
    Json(address): Json<ShippingAddress>,
) -> Result<Json<CheckoutView>> {
    let mut session = state.session().await;
    let flow = active_flow(&mut session)?;
    flow.submit_address(address)?;
    Ok(Json(CheckoutView::new(flow, None)))
}

/// Go back from payment to the address form.
#[instrument(skip(state))]
pub async fn back(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let mut session = state.session().await;
    let flow = active_flow(&mut session)?;
    flow.back()?;
    Ok(Json(CheckoutView::new(flow, None)))
}

/// Place the order.
///
/// The session lock is released while the order is processing. Other
/// requests see the `processing` step and are refused rather than queued:
/// cart mutations and a new checkout by [`Session::ensure_idle`], step
/// actions by the flow itself.
///
/// Completion runs on its own task, so the order still completes if the
/// client goes away mid-request.
#[instrument(skip(state))]
pub async fn place_order(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let pending = {
        let mut session = state.session().await;
        active_flow(&mut session)?.begin_order()?
    };

    let completion = tokio::spawn(async move {
        tokio::time::sleep(state.config().order_processing_delay).await;

        let mut session = state.session().await;
        active_flow(&mut session)?.complete_order(pending)?;
        // The stored cart is empty now; the next cart view reloads it.
        session.cart = None;

        let flow = active_flow(&mut session)?;
        Ok::<_, AppError>(CheckoutView::new(
            flow,
            Some("Order placed successfully!".to_string()),
        ))
    });

    match completion.await {
        Ok(view) => view.map(Json),
        Err(e) => Err(AppError::Internal(format!("order task failed: {e}"))),
    }
}

/// Leave a completed checkout and return to the catalog.
#[instrument(skip(state))]
pub async fn finish(State(state): State<AppState>) -> Result<Response> {
    let mut session = state.session().await;
    let step = active_flow(&mut session)?.step();
    if step != CheckoutStep::Complete {
        return Err(CheckoutError::InvalidTransition {
            step,
            action: "leave checkout",
        }
        .into());
    }

    if let Some(flow) = session.checkout.take() {
        let confirmation = flow.finish()?;
        tracing::debug!(order_number = %confirmation.order_number, "Checkout finished");
    }

    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/")],
        Json(json!({ "redirect": "/" })),
    )
        .into_response())
}
