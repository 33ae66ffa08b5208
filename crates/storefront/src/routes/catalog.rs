//! Catalog route handlers.

use axum::{Json, extract::Path};
use electroverse_core::ProductId;
use tracing::instrument;

use crate::catalog::{self, Product};
use crate::error::{AppError, Result};

/// List every product.
pub async fn index() -> Json<Vec<Product>> {
    Json(catalog::all())
}

/// Show one product.
#[instrument]
pub async fn show(Path(id): Path<ProductId>) -> Result<Json<Product>> {
    catalog::find(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
