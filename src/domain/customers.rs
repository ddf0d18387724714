//! Customers
//!
//! Contact details a member submits with a checkout or a gear request.

use jiff::{Span, civil::Date};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Contact details entered on the checkout and request forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Full name.
    #[serde(default)]
    pub name: String,

    /// Club membership number, if the customer gave one.
    #[serde(default)]
    pub member_number: String,

    /// Email address.
    #[serde(default)]
    pub email: String,

    /// Date the customer will collect the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<Date>,
}

/// Reasons a submitted form is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is not plausible.
    #[error("email address must contain '@'")]
    InvalidEmail,

    /// The pickup date falls inside the preparation lead time.
    #[error("pickup date {requested} is too soon, the earliest is {earliest}")]
    PickupTooSoon {
        /// Date the customer asked for.
        requested: Date,

        /// First acceptable date.
        earliest: Date,
    },

    /// The earliest pickup date cannot be represented.
    #[error("pickup date is out of range")]
    DateOutOfRange,
}

impl CustomerInfo {
    /// Check the fields a checkout needs and return the pickup date.
    ///
    /// Name, email and pickup date are required. The pickup date must be at
    /// least `pickup_lead_days` after `today`.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, checking fields in form order.
    pub fn validate(&self, today: Date, pickup_lead_days: u16) -> Result<Date, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingField("name"));
        }

        let email = self.email.trim();

        if email.is_empty() {
            return Err(FormError::MissingField("email"));
        }

        if !email.contains('@') {
            return Err(FormError::InvalidEmail);
        }

        let requested = self.pickup_date.ok_or(FormError::MissingField("pickup date"))?;

        let earliest = today
            .checked_add(Span::new().days(i64::from(pickup_lead_days)))
            .map_err(|error| {
                debug!(%today, %error, "pickup lead time overflows the calendar");
                FormError::DateOutOfRange
            })?;

        if requested < earliest {
            return Err(FormError::PickupTooSoon { requested, earliest });
        }

        Ok(requested)
    }
}
