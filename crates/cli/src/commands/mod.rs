//! Command implementations.

pub mod cart;

use electroverse_storefront::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cart store error: {0}")]
    Storage(#[from] StorageError),
}
