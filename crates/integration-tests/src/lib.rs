//! Integration tests for ElectroVerse.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`,
//! so no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p electroverse-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart snapshots across store reopen
//! - `checkout_api` - cart and checkout HTTP flow

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use electroverse_storefront::config::StorefrontConfig;
use electroverse_storefront::routes;
use electroverse_storefront::state::{AppState, SharedStore};
use electroverse_storefront::storage::MemoryStore;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

/// A storefront router over an in-memory store the test can inspect.
///
/// Clones share the same router state, so a clone can be moved into a
/// spawned task to overlap requests.
#[derive(Clone)]
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

/// A response decoded for assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestContext {
    /// Build a context with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Build a context over an existing store.
    #[must_use]
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let shared: SharedStore = store.clone();
        let state = AppState::new(StorefrontConfig::default(), shared);
        Self {
            app: routes::app(state),
            store,
        }
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// Send a POST request with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post(&self, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(Method::POST, uri, body).await
    }

    #[allow(clippy::unwrap_used)]
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a money field (serialized as a decimal string) from a JSON value.
///
/// # Panics
///
/// Panics if the value is not a decimal string.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn money(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

/// A shipping address that passes validation.
#[must_use]
pub fn valid_address() -> Value {
    serde_json::json!({
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "address": "12 Analytical Way",
        "city": "London",
        "state": "LDN",
        "zipCode": "10001",
        "country": "United States"
    })
}
