//! Cart models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductId};

const fn default_quantity() -> u32 {
    1
}

/// A product in the cart with the number of units wanted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product, stored in full alongside the quantity.
    #[serde(flatten)]
    pub product: Product,

    /// Units wanted, at least 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    /// A new line holding one unit of `product`.
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Product identifier of the line.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_without_quantity_holds_one_unit() -> TestResult {
        let line: CartLine = serde_json::from_str(
            r#"{"id": 3, "name": "Titleist Wedge Set", "price": 449.99, "inStock": true}"#,
        )?;

        assert_eq!(line.quantity, 1);
        assert_eq!(line.id(), ProductId::new(3));
        assert_eq!(line.line_total(), Decimal::new(44_999, 2));

        Ok(())
    }

    #[test]
    fn line_serializes_flat() -> TestResult {
        let line: CartLine = serde_json::from_str(
            r#"{"id": 3, "name": "Titleist Wedge Set", "price": 449.99, "quantity": 2}"#,
        )?;

        let json = serde_json::to_value(&line)?;

        assert_eq!(json.get("quantity").and_then(serde_json::Value::as_u64), Some(2));
        assert_eq!(json.get("id").and_then(serde_json::Value::as_u64), Some(3));
        assert!(json.get("product").is_none());

        Ok(())
    }
}
