//! ElectroVerse Storefront library.
//!
//! Cart and checkout state for the ElectroVerse demo store, plus the JSON
//! API that exposes them.
//!
//! # Modules
//!
//! - [`storage`] - string-keyed persistent store (memory or file backed)
//! - [`catalog`] - static product table and the default cart seed
//! - [`cart`] - line items, pricing, persistence, the cart model
//! - [`checkout`] - address validation and the checkout state machine
//! - [`services`] - simulated newsletter signup
//! - [`routes`] - axum handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
