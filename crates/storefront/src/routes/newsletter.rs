//! Newsletter subscription route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Newsletter subscription request body.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
}

/// Subscription confirmation.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub email: String,
    pub notice: String,
}

/// Subscribe to the newsletter.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(form): Json<SubscribeForm>,
) -> Result<Json<SubscribeResponse>> {
    let email = state.newsletter().subscribe(&form.email).await?;
    Ok(Json(SubscribeResponse {
        email: email.into_inner(),
        notice: "You have been subscribed to our newsletter!".to_string(),
    }))
}
