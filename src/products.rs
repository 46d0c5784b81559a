//! Products

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Image variants served for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    /// Mobile-sized image URL
    #[serde(default)]
    pub mobile: String,

    /// Tablet-sized image URL
    #[serde(default)]
    pub tablet: String,

    /// Desktop-sized image URL
    #[serde(default)]
    pub desktop: String,

    /// Thumbnail image URL
    #[serde(default)]
    pub thumbnail: String,
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier
    pub id: String,

    /// Business key used to correlate cart items
    pub sku: String,

    /// Product name
    pub name: String,

    /// Product category
    #[serde(default)]
    pub category: String,

    /// Unit price in the major unit of the cart currency
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product images
    #[serde(default)]
    pub images: ProductImages,

    /// Units of this product currently in the local cart.
    ///
    /// Tracked locally only; never read from or sent to the server.
    #[serde(skip)]
    pub quantity_in_cart: u32,
}

impl Product {
    /// Image snapshotted onto cart items when the product is added.
    pub fn cart_image(&self) -> &str {
        &self.images.mobile
    }

    pub(crate) fn increment_in_cart(&mut self) {
        self.quantity_in_cart = self.quantity_in_cart.saturating_add(1);
    }

    pub(crate) fn decrement_in_cart(&mut self) {
        self.quantity_in_cart = self.quantity_in_cart.saturating_sub(1);
    }
}

/// One page of the product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page
    #[serde(default)]
    pub items: Vec<Product>,

    /// Total number of products across all pages
    #[serde(default)]
    pub total: Option<u64>,

    /// Current page number
    #[serde(default)]
    pub page: Option<u32>,

    /// Page size
    #[serde(default)]
    pub limit: Option<u32>,
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn quantity_in_cart_is_never_read_from_server() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": "1",
            "sku": "A1",
            "name": "Waffle",
            "price": 650,
            "quantityInCart": 7
        }))?;

        assert_eq!(product.quantity_in_cart, 0);
        assert_eq!(product.category, "");
        assert_eq!(product.price, Decimal::from(650));

        Ok(())
    }

    #[test]
    fn quantity_in_cart_is_never_serialized() -> TestResult {
        let mut product = fixtures::product("A1", 100);
        product.quantity_in_cart = 3;

        let value = serde_json::to_value(&product)?;

        assert!(value.get("quantityInCart").is_none());

        Ok(())
    }

    #[test]
    fn decrement_floors_at_zero() {
        let mut product = fixtures::product("A1", 100);

        product.decrement_in_cart();
        product.increment_in_cart();
        product.decrement_in_cart();
        product.decrement_in_cart();

        assert_eq!(product.quantity_in_cart, 0);
    }

    #[test]
    fn fractional_price_is_kept_exactly() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": "1",
            "sku": "A1",
            "name": "Waffle",
            "price": 6.5
        }))?;

        assert_eq!(product.price, Decimal::new(65, 1));

        Ok(())
    }

    #[test]
    fn page_defaults_missing_fields() -> TestResult {
        let page: ProductPage = serde_json::from_value(json!({ "items": [] }))?;

        assert!(page.items.is_empty());
        assert_eq!(page.total, None);

        Ok(())
    }
}
