//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Error bodies are JSON: `{"error": "..."}`, plus `"fields"` for address
//! validation and `"redirect"` when the client should navigate elsewhere.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::services::NewsletterError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Newsletter signup failed.
    #[error("Newsletter error: {0}")]
    Newsletter(#[from] NewsletterError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Cart(err) => match err {
                CartError::InvalidCoupon(_) => StatusCode::BAD_REQUEST,
                CartError::CouponAlreadyApplied => StatusCode::CONFLICT,
                CartError::ItemNotFound(_) => StatusCode::NOT_FOUND,
                CartError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::SEE_OTHER,
                CheckoutError::InvalidAddress(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::InvalidTransition { .. } | CheckoutError::Processing => {
                    StatusCode::CONFLICT
                }
                CheckoutError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Newsletter(NewsletterError::InvalidEmail(_)) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// User-facing message. Internal details are not exposed.
    fn message(&self) -> String {
        match self {
            Self::Cart(CartError::InvalidCoupon(_)) => "Invalid coupon code".to_string(),
            Self::Cart(CartError::CouponAlreadyApplied) => {
                "A coupon has already been applied".to_string()
            }
            Self::Cart(err @ CartError::ItemNotFound(_)) => err.to_string(),
            Self::Checkout(CheckoutError::EmptyCart) => "Your cart is empty".to_string(),
            Self::Checkout(CheckoutError::Processing) => {
                "Your order is being placed, please wait".to_string()
            }
            Self::Checkout(CheckoutError::InvalidAddress(_)) => {
                "Please correct the highlighted fields".to_string()
            }
            Self::Checkout(err @ CheckoutError::InvalidTransition { .. }) => err.to_string(),
            Self::Newsletter(_) => "Please enter a valid email address.".to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Cart(CartError::Storage(_))
            | Self::Checkout(CheckoutError::Storage(_))
            | Self::Storage(_)
            | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut body = json!({ "error": self.message() });
        match &self {
            Self::Checkout(CheckoutError::InvalidAddress(errors)) => {
                body["fields"] = json!(errors);
            }
            Self::Checkout(CheckoutError::EmptyCart) => {
                body["redirect"] = json!("/cart");
                return (status, [(header::LOCATION, "/cart")], Json(body)).into_response();
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
