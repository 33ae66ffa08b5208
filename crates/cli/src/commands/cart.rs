//! Inspect and maintain the persisted cart.
//!
//! These commands operate directly on the store file used by the
//! storefront server. Stop the server first; it caches the file contents
//! in memory and would overwrite changes made here.

use std::path::Path;

use electroverse_storefront::cart::{Cart, CartRepository};
use electroverse_storefront::storage::FileStore;
use tracing::info;

use super::CommandError;

fn open(path: &Path) -> Result<CartRepository<FileStore>, CommandError> {
    let store = FileStore::open(path)?;
    info!(path = %path.display(), "Opened cart store");
    Ok(CartRepository::new(store))
}

/// Log the stored items and totals.
///
/// # Errors
///
/// Returns an error if the store file cannot be opened.
pub fn show(path: &Path) -> Result<(), CommandError> {
    let repo = open(path)?;

    let items = repo.load_items().unwrap_or_default();
    if items.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    for item in &items {
        info!(
            id = %item.id,
            quantity = item.quantity,
            unit_price = %item.unit_price,
            line_total = %item.line_total(),
            "{}",
            item.name
        );
    }

    let summary = repo.load_summary();
    info!(
        subtotal = %summary.subtotal,
        shipping = %summary.shipping,
        discount = %summary.discount,
        total = %summary.total,
        "Stored totals"
    );
    Ok(())
}

/// Replace the stored cart with the default seed items.
///
/// Any applied coupon is dropped.
///
/// # Errors
///
/// Returns an error if the store file cannot be opened or written.
pub fn seed(path: &Path) -> Result<(), CommandError> {
    let repo = open(path)?;
    repo.clear()?;

    // Initializing an empty store seeds it and writes the snapshot.
    let cart = Cart::initialize(repo);

    let summary = cart.compute_totals();
    info!(
        items = cart.items().len(),
        total = %summary.total,
        "Cart seeded"
    );
    Ok(())
}

/// Empty the stored cart and remove its totals.
///
/// # Errors
///
/// Returns an error if the store file cannot be opened or written.
pub fn clear(path: &Path) -> Result<(), CommandError> {
    open(path)?.clear()?;
    info!("Cart cleared");
    Ok(())
}
