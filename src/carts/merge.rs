//! Preview merge policy.
//!
//! A preview response is authoritative for pricing only. The fields listed
//! in [`SERVER_OWNED_CART_FIELDS`] and [`SERVER_OWNED_ITEM_FIELDS`] are
//! copied from the server; every other field of the local cart, including
//! the item list, item quantities and entered promotion codes, is owned by
//! the client and left as it was.

use std::mem;

use rustc_hash::FxHashMap;

use crate::carts::{Cart, CartItem};

/// Cart-level fields computed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartField {
    /// `subTotalAmount`
    SubTotalAmount,

    /// `totalDiscount`
    TotalDiscount,

    /// `totalAmount`
    TotalAmount,

    /// `totalItems`
    TotalItems,

    /// `promotions`
    Promotions,
}

/// Item-level fields computed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    /// `totalPrice`
    TotalPrice,

    /// `discount`
    Discount,
}

/// Cart fields a preview overwrites.
pub const SERVER_OWNED_CART_FIELDS: [CartField; 5] = [
    CartField::SubTotalAmount,
    CartField::TotalDiscount,
    CartField::TotalAmount,
    CartField::TotalItems,
    CartField::Promotions,
];

/// Item fields a preview overwrites, matched by `productSku`.
pub const SERVER_OWNED_ITEM_FIELDS: [ItemField; 2] = [ItemField::TotalPrice, ItemField::Discount];

impl CartField {
    fn take(self, local: &mut Cart, server: &mut Cart) {
        match self {
            Self::SubTotalAmount => local.sub_total_amount = server.sub_total_amount,
            Self::TotalDiscount => local.total_discount = server.total_discount,
            Self::TotalAmount => local.total_amount = server.total_amount,
            Self::TotalItems => local.total_items = server.total_items,
            Self::Promotions => local.promotions = mem::take(&mut server.promotions),
        }
    }
}

impl ItemField {
    fn copy(self, local: &mut CartItem, server: &CartItem) {
        match self {
            Self::TotalPrice => local.total_price = server.total_price,
            Self::Discount => local.discount = server.discount,
        }
    }
}

/// Merge a server preview into the local cart.
///
/// Local items the preview does not mention keep their previous computed
/// fields; preview items with no local counterpart are ignored.
pub fn merge_preview(local: &mut Cart, mut preview: Cart) {
    for field in SERVER_OWNED_CART_FIELDS {
        field.take(local, &mut preview);
    }

    let priced: FxHashMap<&str, &CartItem> = preview
        .items
        .iter()
        .map(|item| (item.product_sku.as_str(), item))
        .collect();

    for item in &mut local.items {
        let Some(server) = priced.get(item.product_sku.as_str()) else {
            continue;
        };

        for field in SERVER_OWNED_ITEM_FIELDS {
            field.copy(item, server);
        }
    }
}
