//! Fixtures
//!
//! The storefront's product catalog is kept as YAML so it can be edited
//! without touching code. The catalog shipped with the crate is embedded at
//! build time; another one can be loaded from disk.

use std::{fs, path::Path};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::products::Catalog;

pub mod products;

const BUILTIN_CATALOG: &str = include_str!("../../fixtures/products/catalog.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The fixture holds no products
    #[error("Catalog fixture has no products")]
    Empty,
}

impl Catalog {
    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price cannot be parsed,
    /// products are priced in different currencies or there are no products.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let fixture: products::CatalogFixture = serde_norway::from_str(contents)?;

        let mut currency: Option<&'static Currency> = None;
        let mut catalog = Vec::with_capacity(fixture.products.len());

        for (id, product_fixture) in fixture.products {
            let (product, product_currency) = product_fixture.into_product(id)?;

            match currency {
                Some(existing) if existing != product_currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        product_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(product_currency),
            }

            catalog.push(product);
        }

        let currency = currency.ok_or(FixtureError::Empty)?;

        debug!(products = catalog.len(), currency = currency.iso_alpha_code, "catalog loaded");

        Ok(Self::new(catalog, currency))
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixture is invalid.
    pub fn builtin() -> Result<Self, FixtureError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::products::{Category, Gender, ProductFilter, ProductId, Selection};

    use super::*;

    #[test]
    fn builtin_catalog_loads() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.currency(), USD);

        let driver = catalog.get(ProductId::new(1)).ok_or("missing driver")?;

        assert_eq!(driver.name, "TaylorMade Driver");
        assert_eq!(driver.price, Decimal::new(39_999, 2));
        assert_eq!(driver.category, Some(Category::Clubs));
        assert_eq!(driver.gender, Some(Gender::Mens));
        assert!(driver.in_stock);

        Ok(())
    }

    #[test]
    fn builtin_catalog_has_out_of_stock_gear() -> TestResult {
        let catalog = Catalog::builtin()?;

        let putter = catalog.get(ProductId::new(9)).ok_or("missing putter")?;

        assert!(!putter.in_stock);

        Ok(())
    }

    #[test]
    fn builtin_catalog_filters_like_the_listing() -> TestResult {
        let catalog = Catalog::builtin()?;

        let filter = ProductFilter {
            search: Some("set".to_string()),
            selection: Selection::Category(Category::Clubs),
        };

        let ids: Vec<u32> = catalog.filter(&filter).map(|product| product.id.get()).collect();

        assert_eq!(ids, [3, 10]);

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let result = Catalog::from_yaml(concat!(
            "products:\n",
            "  1:\n    name: Tee\n    price: 1.00 USD\n",
            "  2:\n    name: Ball\n    price: 2.00 GBP\n",
        ));

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = Catalog::from_yaml("products: {}\n");

        assert!(matches!(result, Err(FixtureError::Empty)));
    }

    #[test]
    fn catalog_loads_from_path() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("catalog.yml");

        fs::write(&path, "products:\n  7:\n    name: Tee Pack\n    price: 4.99 USD\n")?;

        let catalog = Catalog::from_path(&path)?;

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.iter().any(|product| product.in_stock));

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Catalog::from_path("/nonexistent/catalog.yml");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
