//! Shipping address entry and validation.

use std::collections::BTreeMap;
use std::fmt;

use electroverse_core::Email;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Country pre-filled on a new address form.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Address form fields as submitted.
///
/// Kept in memory for the checkout session only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

/// A form field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    FullName,
    Email,
    Address,
    City,
    State,
    ZipCode,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zipCode",
        };
        f.write_str(name)
    }
}

/// Per-field validation messages for a rejected address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Error)]
#[error("invalid shipping address ({} field errors)", .fields.len())]
#[serde(transparent)]
pub struct AddressErrors {
    fields: BTreeMap<AddressField, &'static str>,
}

impl AddressErrors {
    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: AddressField) -> Option<&'static str> {
        self.fields.get(&field).copied()
    }

    /// Failed fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (AddressField, &'static str)> + '_ {
        self.fields.iter().map(|(field, msg)| (*field, *msg))
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&mut self, field: AddressField, value: &str, message: &'static str) {
        if value.trim().is_empty() {
            self.fields.insert(field, message);
        }
    }
}

impl ShippingAddress {
    /// Check every field and collect all failures at once.
    ///
    /// # Errors
    ///
    /// Returns `AddressErrors` listing each field that is blank (after
    /// trimming) or, for the email, not shaped like `local@domain.tld`.
    pub fn validate(&self) -> Result<(), AddressErrors> {
        let mut errors = AddressErrors::default();

        errors.require(AddressField::FullName, &self.full_name, "Full name is required");

        let email = self.email.trim();
        if email.is_empty() {
            errors.fields.insert(AddressField::Email, "Email is required");
        } else if Email::parse(email).is_err() {
            errors.fields.insert(AddressField::Email, "Email is invalid");
        }

        errors.require(AddressField::Address, &self.address, "Address is required");
        errors.require(AddressField::City, &self.city, "City is required");
        errors.require(AddressField::State, &self.state, "State is required");
        errors.require(AddressField::ZipCode, &self.zip_code, "ZIP code is required");

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
