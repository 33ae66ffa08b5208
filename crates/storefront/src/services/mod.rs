//! Storefront services.
//!
//! Services stand in for backends the storefront would call in production.

pub mod newsletter;

pub use newsletter::{NewsletterError, NewsletterService};
