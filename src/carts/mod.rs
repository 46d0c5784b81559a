//! Carts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::Product;

pub mod merge;

/// Currency used for carts until the server says otherwise.
pub const DEFAULT_CURRENCY: &str = "VND";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// A promotion the server resolved from one of the entered codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// The promotion code as entered
    pub code: String,

    /// Server-defined promotion type
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Amount discounted by this promotion
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_amount: Option<Decimal>,

    /// Human readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Skus this promotion was applied to
    #[serde(default)]
    pub applied_to_items: Vec<String>,
}

/// A line of the cart, one per sku.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Sku of the product this line refers to
    pub product_sku: String,

    /// Product name at the time the item was added
    pub product_name: String,

    /// Product image at the time the item was added
    #[serde(default)]
    pub product_image: String,

    /// Unit price at the time the item was added
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Server-computed line total
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub total_price: Option<Decimal>,

    /// Units of the product in the cart, always greater than zero
    pub quantity: u32,

    /// Server-computed line discount
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount: Option<Decimal>,

    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CartItem {
    fn from_product(product: &Product) -> Self {
        Self {
            product_sku: product.sku.clone(),
            product_name: product.name.clone(),
            product_image: product.cart_image().to_string(),
            price: product.price,
            total_price: None,
            quantity: 1,
            discount: None,
            note: None,
        }
    }

    /// Line total, preferring the server's figure over `price × quantity`.
    pub fn line_total(&self) -> Decimal {
        self.total_price
            .unwrap_or_else(|| self.price.saturating_mul(Decimal::from(self.quantity)))
    }
}

/// Cart
///
/// Aggregate fields are absent until the server has priced the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Server-side cart identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// Total discount over all items and promotions
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_discount: Option<Decimal>,

    /// Total before discounts
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sub_total_amount: Option<Decimal>,

    /// Total after discounts
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_amount: Option<Decimal>,

    /// Number of units across all items
    #[serde(default)]
    pub total_items: Option<u32>,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Cart items
    #[serde(default)]
    pub items: Vec<CartItem>,

    /// Codes entered by the user, in entry order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promotion_codes: Vec<String>,

    /// Promotions resolved by the server
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promotions: Vec<Promotion>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty(DEFAULT_CURRENCY)
    }
}

impl Cart {
    /// The canonical empty cart for the given currency.
    pub fn empty(currency: impl Into<String>) -> Self {
        Self {
            uuid: None,
            total_discount: None,
            sub_total_amount: None,
            total_amount: None,
            total_items: None,
            currency: currency.into(),
            items: Vec::new(),
            promotion_codes: Vec::new(),
            promotions: Vec::new(),
        }
    }

    /// Whether the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the item for the given sku.
    pub fn item(&self, sku: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_sku == sku)
    }

    /// Sum of item quantities.
    pub fn quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Add one unit of `product`, snapshotting its name, image and price
    /// when the sku is new to the cart.
    pub(crate) fn add_product(&mut self, product: &Product) {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_sku == product.sku)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem::from_product(product)),
        }
    }

    /// Remove one unit of the given sku.
    ///
    /// Returns `false` when the sku is not in the cart.
    pub(crate) fn remove_product(&mut self, sku: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.product_sku == sku) else {
            return false;
        };

        item.quantity = item.quantity.saturating_sub(1);

        self.prune();

        true
    }

    /// Remove the item for the given sku regardless of its quantity.
    ///
    /// Returns `false` when the sku is not in the cart.
    pub(crate) fn remove_item(&mut self, sku: &str) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.product_sku != sku);

        if self.items.len() == before {
            return false;
        }

        self.prune();

        true
    }

    /// Append a promotion code unless an identical one was already entered.
    ///
    /// Returns `false` for duplicates.
    pub(crate) fn add_promotion_code(&mut self, code: &str) -> bool {
        if self.promotion_codes.iter().any(|existing| existing == code) {
            return false;
        }

        self.promotion_codes.push(code.to_string());

        true
    }

    /// Drop zero-quantity items, collapsing to the canonical empty cart when
    /// nothing is left.
    fn prune(&mut self) {
        self.items.retain(|item| item.quantity > 0);

        if self.items.is_empty() {
            *self = Self::empty(std::mem::take(&mut self.currency));
        }
    }

    /// Wire body for preview and checkout, or `None` for an empty cart.
    pub fn request(&self) -> Option<CartRequest> {
        if self.is_empty() {
            return None;
        }

        Some(CartRequest {
            currency: self.currency.clone(),
            promotion_codes: self.promotion_codes.clone(),
            items: self.items.iter().map(CartLine::from).collect(),
        })
    }
}

/// Item as sent to the preview and checkout endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product name snapshot
    pub product_name: String,

    /// Product image snapshot
    pub product_image: String,

    /// Product sku
    pub product_sku: String,

    /// Unit price snapshot
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Units requested
    pub quantity: u32,
}

impl From<&CartItem> for CartLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            product_image: item.product_image.clone(),
            product_sku: item.product_sku.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Body of the preview and checkout requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    /// Cart currency
    pub currency: String,

    /// Entered promotion codes, omitted when none were entered
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promotion_codes: Vec<String>,

    /// Cart lines
    pub items: Vec<CartLine>,
}
