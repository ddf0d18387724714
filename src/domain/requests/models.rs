//! Gear request models.

use std::fmt;

use clap::ValueEnum;
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::{
    domain::customers::CustomerInfo,
    products::{Product, ProductId},
};

/// Progress of a gear request. Set when the request is made and changed only
/// by pro-shop staff outside the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum RequestStatus {
    /// Waiting for the pro-shop.
    #[default]
    Pending,

    /// Being sourced.
    Processing,

    /// Ordered from the supplier.
    Ordered,

    /// On its way to the club.
    Shipped,
}

impl RequestStatus {
    /// Display name used in persisted documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Ordered => "Ordered",
            Self::Shipped => "Shipped",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product requested by a member, offered at the request markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedItem {
    /// The product. Its price is the discounted price.
    #[serde(flatten)]
    pub product: Product,

    /// Catalog price before the markdown.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<Decimal>,

    /// Markdown in whole percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,

    /// Date the request was made.
    #[serde(deserialize_with = "civil_date")]
    pub request_date: Date,

    /// Date the item is expected at the club.
    #[serde(deserialize_with = "civil_date")]
    pub estimated_arrival: Date,

    /// Progress of the request.
    #[serde(default)]
    pub status: RequestStatus,

    /// Contact details submitted with the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
}

impl RequestedItem {
    /// Product identifier of the request.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Discounted price the item is offered at.
    pub fn price(&self) -> Decimal {
        self.product.price
    }

    /// Amount saved against the original price, zero when it is unknown.
    pub fn savings(&self) -> Decimal {
        self.original_price
            .map_or(Decimal::ZERO, |original| original - self.product.price)
    }
}

/// Reads a `YYYY-MM-DD` date, or the UTC date of an RFC 3339 timestamp.
fn civil_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let raw = String::deserialize(deserializer)?;

    if let Ok(date) = raw.parse::<Date>() {
        return Ok(date);
    }

    raw.parse::<Timestamp>()
        .map(|timestamp| timestamp.to_zoned(TimeZone::UTC).date())
        .map_err(D::Error::custom)
}
