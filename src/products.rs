//! Products

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Wrap a raw identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Drivers, irons, wedges and putters.
    Clubs,

    /// Golf shoes.
    Shoes,

    /// Shirts, outerwear and headwear.
    Apparel,

    /// Gloves, bags, balls and the rest.
    Accessories,
}

impl Category {
    /// Display name used in the catalog and persisted documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clubs => "Clubs",
            Self::Shoes => "Shoes",
            Self::Apparel => "Apparel",
            Self::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a product is cut for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Men's fit.
    #[serde(rename = "Men's")]
    Mens,

    /// Women's fit.
    #[serde(rename = "Women's")]
    Womens,

    /// Fits anyone.
    Unisex,
}

impl Gender {
    /// Display name used in the catalog and persisted documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mens => "Men's",
            Self::Womens => "Women's",
            Self::Unisex => "Unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product.
///
/// The same shape is embedded in cart lines and requested items. Documents
/// written by older storefront pages may lack some fields, so those are
/// optional when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,

    /// Product name.
    pub name: String,

    /// Short description.
    #[serde(default)]
    pub description: String,

    /// Unit price in the catalog currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Product category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Gender tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Image reference.
    #[serde(default)]
    pub image: String,

    /// Whether the pro-shop has the product on its shelves.
    #[serde(default)]
    pub in_stock: bool,
}

/// Category selector value that matched nothing.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category selection: {0}")]
pub struct UnknownSelection(pub String);

/// Category selector of the product listing.
///
/// A selection matches a product's category or its gender tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every product.
    #[default]
    All,

    /// Products in a category.
    Category(Category),

    /// Products with a gender tag.
    Gender(Gender),
}

impl Selection {
    /// Selector values in listing order.
    pub const ALL: [Self; 7] = [
        Self::All,
        Self::Gender(Gender::Mens),
        Self::Gender(Gender::Womens),
        Self::Category(Category::Clubs),
        Self::Category(Category::Shoes),
        Self::Category(Category::Apparel),
        Self::Category(Category::Accessories),
    ];

    /// Whether `product` falls under this selection.
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => product.category == Some(category),
            Self::Gender(gender) => product.gender == Some(gender),
        }
    }

    /// Display name of the selector.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Category(category) => category.as_str(),
            Self::Gender(gender) => gender.as_str(),
        }
    }
}

impl FromStr for Selection {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        Self::ALL
            .into_iter()
            .find(|selection| {
                let name = selection.as_str();

                name.eq_ignore_ascii_case(wanted)
                    || name.replace('\'', "").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownSelection(s.to_string()))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search and category filter of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive text looked up in names and descriptions.
    pub search: Option<String>,

    /// Category selector.
    pub selection: Selection,
}

impl ProductFilter {
    /// Whether `product` passes both the search and the selection.
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|search| {
            let needle = search.to_lowercase();

            product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle)
        });

        matches_search && self.selection.matches(product)
    }
}

/// The static product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog priced in `currency`, ordered by product id.
    pub fn new(products: impl Into<Vec<Product>>, currency: &'static Currency) -> Self {
        let mut products = products.into();
        products.sort_by_key(|product| product.id);

        Self { products, currency }
    }

    /// Look up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products
            .binary_search_by_key(&id, |product| product.id)
            .ok()
            .and_then(|index| self.products.get(index))
    }

    /// Products passing `filter`, in id order.
    pub fn filter<'a>(&'a self, filter: &'a ProductFilter) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| filter.matches(product))
    }

    /// All products, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Currency the catalog is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new(), iso::USD)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use testresult::TestResult;

    use super::*;

    fn product(id: u32, name: &str, category: Category, gender: Gender) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} for the course"),
            price: Decimal::new(4999, 2),
            category: Some(category),
            gender: Some(gender),
            image: String::new(),
            in_stock: true,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            [
                product(9, "Ping Putter", Category::Clubs, Gender::Mens),
                product(1, "TaylorMade Driver", Category::Clubs, Gender::Mens),
                product(4, "Leather Golf Glove", Category::Accessories, Gender::Womens),
            ],
            iso::USD,
        )
    }

    #[test]
    fn catalog_orders_products_by_id() {
        let ids: Vec<u32> = catalog().iter().map(|product| product.id.get()).collect();

        assert_eq!(ids, [1, 4, 9]);
    }

    #[test]
    fn get_finds_product_by_id() {
        let catalog = catalog();

        assert_eq!(
            catalog.get(ProductId::new(9)).map(|product| product.name.as_str()),
            Some("Ping Putter")
        );
        assert!(catalog.get(ProductId::new(2)).is_none());
    }

    #[test]
    fn search_matches_name_or_description_case_insensitively() {
        let catalog = catalog();
        let filter = ProductFilter {
            search: Some("PUTTER".to_string()),
            selection: Selection::All,
        };

        let names: Vec<&str> = catalog.filter(&filter).map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["Ping Putter"]);
    }

    #[test]
    fn selection_matches_category_or_gender() {
        let catalog = catalog();

        let clubs = ProductFilter {
            search: None,
            selection: Selection::Category(Category::Clubs),
        };
        let womens = ProductFilter {
            search: None,
            selection: Selection::Gender(Gender::Womens),
        };

        assert_eq!(catalog.filter(&clubs).count(), 2);
        assert_eq!(catalog.filter(&womens).count(), 1);
        assert_eq!(catalog.filter(&ProductFilter::default()).count(), 3);
    }

    #[test]
    fn selection_parses_display_names() -> TestResult {
        assert_eq!("All".parse::<Selection>()?, Selection::All);
        assert_eq!("men's".parse::<Selection>()?, Selection::Gender(Gender::Mens));
        assert_eq!("Womens".parse::<Selection>()?, Selection::Gender(Gender::Womens));
        assert_eq!(
            "accessories".parse::<Selection>()?,
            Selection::Category(Category::Accessories)
        );

        Ok(())
    }

    #[test]
    fn selection_rejects_unknown_names() {
        assert_eq!(
            "Trolleys".parse::<Selection>(),
            Err(UnknownSelection("Trolleys".to_string()))
        );
    }

    #[test]
    fn product_json_uses_camel_case_and_numeric_price() -> TestResult {
        let product = product(1, "TaylorMade Driver", Category::Clubs, Gender::Mens);

        let json = serde_json::to_value(&product)?;

        assert_eq!(json.get("inStock").and_then(Value::as_bool), Some(true));
        assert_eq!(json.get("gender").and_then(Value::as_str), Some("Men's"));
        assert_eq!(json.get("price").and_then(Value::as_f64), Some(49.99));

        Ok(())
    }

    #[test]
    fn product_json_tolerates_missing_optional_fields() -> TestResult {
        let product: Product =
            serde_json::from_str(r#"{"id": 4, "name": "Leather Golf Glove", "price": 24.99}"#)?;

        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.price, Decimal::new(2499, 2));
        assert!(product.category.is_none());
        assert!(!product.in_stock);

        Ok(())
    }
}
