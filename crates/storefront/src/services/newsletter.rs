//! Newsletter subscription.
//!
//! There is no mailing list provider behind this: a subscription is
//! validated, held for a simulated round trip, and always accepted.

use std::time::Duration;

use electroverse_core::{Email, EmailError};
use thiserror::Error;

/// Errors that can occur when subscribing.
#[derive(Debug, Error)]
pub enum NewsletterError {
    /// The address is not a usable email.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Simulated newsletter signup.
#[derive(Debug, Clone)]
pub struct NewsletterService {
    latency: Duration,
}

impl NewsletterService {
    /// Create a service that takes `latency` to confirm each signup.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Subscribe `email`. The address is trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns `NewsletterError::InvalidEmail` before any waiting if the
    /// address is malformed.
    #[tracing::instrument(skip(self))]
    pub async fn subscribe(&self, email: &str) -> Result<Email, NewsletterError> {
        let email = Email::parse(&email.trim().to_lowercase())?;
        tokio::time::sleep(self.latency).await;
        tracing::info!(email = %email, "Newsletter subscription successful");
        Ok(email)
    }
}
