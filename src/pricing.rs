//! Pricing
//!
//! Cart totals and the request markdown. All arithmetic is exact decimal
//! arithmetic; only the markdown is rounded, to whole cents.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};

use crate::domain::carts::models::CartLine;

/// Sales tax applied to the cart subtotal, as a fraction (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Share of the original price a requested item is offered at (85%).
pub const REQUEST_PRICE_FACTOR: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

/// Markdown granted on requested items, in whole percent.
pub const REQUEST_DISCOUNT_PERCENT: u8 = 15;

/// Subtotal, tax and total of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Tax on the subtotal.
    pub tax: Decimal,

    /// Subtotal plus tax.
    pub total: Decimal,
}

impl Totals {
    /// Subtotal as money in `currency`.
    pub fn subtotal_in<'a>(&self, currency: &'a Currency) -> Money<'a, Currency> {
        Money::from_decimal(self.subtotal, currency)
    }

    /// Tax as money in `currency`.
    pub fn tax_in<'a>(&self, currency: &'a Currency) -> Money<'a, Currency> {
        Money::from_decimal(self.tax, currency)
    }

    /// Total as money in `currency`.
    pub fn total_in<'a>(&self, currency: &'a Currency) -> Money<'a, Currency> {
        Money::from_decimal(self.total, currency)
    }
}

/// Compute the totals of a set of cart lines.
///
/// A line decoded without a quantity carries quantity 1, so it counts once.
pub fn compute_totals(lines: &[CartLine]) -> Totals {
    let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
    let tax = subtotal * TAX_RATE;

    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Price a requested item is offered at: 85% of `original`, rounded to cents.
pub fn discounted_price(original: Decimal) -> Decimal {
    (original * REQUEST_PRICE_FACTOR)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
