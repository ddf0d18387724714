//! Receipt
//!
//! Tabular rendering of the catalog, the cart, the request queue and order
//! confirmations. Amounts are shown rounded to the currency's minor unit;
//! the underlying totals stay exact.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    domain::{
        carts::{checkout::OrderConfirmation, models::CartLine},
        requests::models::RequestedItem,
    },
    pricing::Totals,
    products::Product,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The output could not be written.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Format `amount` in `currency`, rounded to the currency's minor unit.
pub fn format_money(amount: Decimal, currency: &Currency) -> String {
    Money::from_decimal(amount.round_dp(currency.exponent), currency).to_string()
}

/// Write the product listing.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_products<'a>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'a Product>,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Category", "Price", "Stock"]);

    for product in products {
        let category = match (product.category, product.gender) {
            (Some(category), Some(gender)) => format!("{category} ({gender})"),
            (Some(category), None) => category.to_string(),
            (None, Some(gender)) => gender.to_string(),
            (None, None) => String::new(),
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            category,
            format_money(product.price, currency),
            if product.in_stock { "In Stock" } else { "Not in Stock" }.to_string(),
        ]);
    }

    let mut table = builder.build();
    style_table(&mut table, &[3]);

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write the cart lines followed by the subtotal, tax and total.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    lines: &[CartLine],
    totals: &Totals,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    if lines.is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Item", "Unit Price", "Qty", "Line Total"]);

    for line in lines {
        builder.push_record([
            line.id().to_string(),
            line.product.name.clone(),
            format_money(line.product.price, currency),
            line.quantity.to_string(),
            format_money(line.line_total(), currency),
        ]);
    }

    let mut table = builder.build();
    style_table(&mut table, &[2, 3, 4]);

    writeln!(out, "{table}")?;
    write_totals(&mut out, totals, currency)
}

/// Write the request queue.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_requests(
    mut out: impl io::Write,
    requests: &[RequestedItem],
    currency: &Currency,
) -> Result<(), ReceiptError> {
    if requests.is_empty() {
        writeln!(out, "No gear requested.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record([
        "#",
        "Item",
        "Price",
        "Original Price",
        "Status",
        "Requested",
        "ETA",
    ]);

    for item in requests {
        builder.push_record([
            item.id().to_string(),
            item.product.name.clone(),
            format_money(item.price(), currency),
            item.original_price
                .map_or_else(String::new, |price| format_money(price, currency)),
            item.status.to_string(),
            item.request_date.to_string(),
            item.estimated_arrival.to_string(),
        ]);
    }

    let mut table = builder.build();
    style_table(&mut table, &[2, 3]);

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write an order confirmation.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_confirmation(
    mut out: impl io::Write,
    confirmation: &OrderConfirmation,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    writeln!(
        out,
        "Order {} confirmed for {}",
        confirmation.short_reference(),
        confirmation.customer.name
    )?;
    writeln!(
        out,
        "Placed {}, ready for pickup on {}",
        confirmation.placed_on, confirmation.pickup_date
    )?;

    write_cart(&mut out, &confirmation.lines, &confirmation.totals, currency)
}

fn write_totals(
    out: &mut impl io::Write,
    totals: &Totals,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    let rows = [
        ("Subtotal:", format_money(totals.subtotal, currency)),
        ("Tax (8%):", format_money(totals.tax, currency)),
        ("Total:", format_money(totals.total, currency)),
    ];

    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:<10}{value:>value_width$}")?;
    }

    Ok(())
}

fn style_table(table: &mut Table, money_columns: &[usize]) {
    table.with(Style::rounded());
    table.modify(Rows::first(), Color::BOLD);

    for &column in money_columns {
        table.modify(Columns::new(column..=column), Alignment::right());
    }
}
