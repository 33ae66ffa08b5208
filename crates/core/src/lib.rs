//! ElectroVerse Core - Shared types library.
//!
//! This crate provides common types used across all ElectroVerse components:
//! - `storefront` - Cart model, checkout flow, and the JSON storefront API
//! - `cli` - Command-line tools for inspecting and resetting persisted carts
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
