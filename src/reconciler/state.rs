//! Observable reconciler state.

use crate::{carts::Cart, notifier::Recovery, products::Product, receipt::Receipt};

/// What the storefront is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    /// Catalog and cart.
    #[default]
    Shopping,

    /// Order confirmation holding the server's receipt.
    OrderConfirmed(Cart),
}

/// Snapshot of everything the reconciler owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Product catalog with local cart counters
    pub products: Vec<Product>,

    /// The local cart
    pub cart: Cart,

    /// Current view
    pub view: View,

    /// Whether a preview or checkout request is in flight
    pub loading: bool,
}

impl CartState {
    /// Find a catalog product by sku.
    pub fn product(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.sku == sku)
    }

    pub(crate) fn product_mut(&mut self, sku: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.sku == sku)
    }

    /// Receipt of the confirmed order, when the confirmation is showing.
    pub fn receipt(&self) -> Option<Receipt> {
        match &self.view {
            View::OrderConfirmed(order) => Some(Receipt::from_cart(order)),
            View::Shopping => None,
        }
    }
}

/// Result of [`confirm_order`](super::CartReconciler::confirm_order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to check out; no request was sent.
    EmptyCart,

    /// The order was placed; holds the server's receipt.
    Confirmed(Cart),

    /// The order was rejected; local state is unchanged.
    Failed(Recovery),
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::products::fixtures::product;

    use super::*;

    #[test]
    fn receipt_only_while_confirmed() {
        let mut state = CartState::default();

        assert!(state.receipt().is_none());

        let mut order = Cart::default();
        order.total_amount = Some(Decimal::from(1000));
        state.view = View::OrderConfirmed(order);

        assert_eq!(state.receipt().as_ref().map(Receipt::total), Some(Decimal::from(1000)));
    }

    #[test]
    fn finds_products_by_sku() {
        let state = CartState {
            products: vec![product("A1", 100), product("B2", 200)],
            ..CartState::default()
        };

        assert_eq!(state.product("B2").map(|product| product.price), Some(Decimal::from(200)));
        assert!(state.product("C3").is_none());
    }
}
