//! Checkout confirmation.

use jiff::civil::Date;
use uuid::Uuid;

use crate::{
    domain::{carts::models::CartLine, customers::CustomerInfo},
    pricing::Totals,
};

/// Record of a completed checkout.
///
/// Nothing is sent anywhere: the confirmation is what the member is shown
/// before the cart is emptied.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Order reference quoted at pickup.
    pub reference: Uuid,

    /// Who placed the order.
    pub customer: CustomerInfo,

    /// Lines that were in the cart.
    pub lines: Vec<CartLine>,

    /// Totals of those lines.
    pub totals: Totals,

    /// Date the order was placed.
    pub placed_on: Date,

    /// Date the member collects the order.
    pub pickup_date: Date,
}

impl OrderConfirmation {
    /// Total number of units ordered.
    pub fn units(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Short reference printed on the confirmation, the last 8 hex digits.
    pub fn short_reference(&self) -> String {
        let simple = self.reference.simple().to_string().to_uppercase();

        simple
            .get(simple.len().saturating_sub(8)..)
            .unwrap_or_default()
            .to_string()
    }
}
