//! Product Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Category, Gender, Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<u32, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Product price (e.g., "399.99 USD")
    pub price: String,

    /// Product category
    #[serde(default)]
    pub category: Option<Category>,

    /// Gender tag
    #[serde(default)]
    pub gender: Option<Gender>,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Whether the product is on the shelves
    #[serde(default)]
    pub in_stock: bool,
}

impl ProductFixture {
    /// Convert to a [`Product`] with the given id, returning its currency too.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn into_product(self, id: u32) -> Result<(Product, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        let product = Product {
            id: ProductId::new(id),
            name: self.name,
            description: self.description,
            price,
            category: self.category,
            gender: self.gender,
            image: self.image,
            in_stock: self.in_stock,
        };

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "24.99 USD") into a decimal amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((amount, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("24.99USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_negative_amount() {
        let result = parse_price("-1.00 USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_keeps_exact_amount() -> Result<(), FixtureError> {
        let (amount, currency) = parse_price("399.99 USD")?;

        assert_eq!(amount, Decimal::new(39_999, 2));
        assert_eq!(currency, USD);

        Ok(())
    }

    #[test]
    fn fixture_converts_to_product() -> Result<(), FixtureError> {
        let fixture = ProductFixture {
            name: "Ping Putter".to_string(),
            description: "Precision putter".to_string(),
            price: "249.99 USD".to_string(),
            category: Some(Category::Clubs),
            gender: Some(Gender::Mens),
            image: String::new(),
            in_stock: false,
        };

        let (product, currency) = fixture.into_product(9)?;

        assert_eq!(product.id, ProductId::new(9));
        assert_eq!(product.price, Decimal::new(24_999, 2));
        assert_eq!(currency, USD);

        Ok(())
    }
}
