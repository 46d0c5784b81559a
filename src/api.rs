//! Storefront API
//!
//! The four backend operations the client consumes, behind a trait so the
//! reconciler can be driven by a mock in tests.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    carts::{Cart, CartRequest},
    products::ProductPage,
    transport::{ApiClient, ApiError},
};

/// `GET` the product catalog.
pub const PRODUCTS_PATH: &str = "/v1/products";

/// `GET` the current user's cart.
pub const CURRENT_CART_PATH: &str = "/v1/carts/user";

/// `POST` a cart for pricing.
pub const PREVIEW_PATH: &str = "/v1/carts/preview";

/// `POST` a cart to place the order.
pub const CHECKOUT_PATH: &str = "/v1/carts/checkout";

/// Backend operations consumed by the storefront.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// List the product catalog.
    async fn list_products(&self) -> Result<ProductPage, ApiError>;

    /// Fetch the current cart, `None` when the user has none.
    async fn current_cart(&self) -> Result<Option<Cart>, ApiError>;

    /// Price a proposed cart without finalizing it.
    async fn preview_cart(&self, request: &CartRequest) -> Result<Cart, ApiError>;

    /// Finalize a cart into an order, returning the receipt.
    async fn checkout(&self, request: &CartRequest) -> Result<Cart, ApiError>;
}

/// [`StorefrontApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: ApiClient,
}

impl HttpStorefrontApi {
    /// Wrap a transport client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Underlying transport client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_products(&self) -> Result<ProductPage, ApiError> {
        self.client.get(PRODUCTS_PATH).await
    }

    async fn current_cart(&self) -> Result<Option<Cart>, ApiError> {
        self.client.get(CURRENT_CART_PATH).await
    }

    async fn preview_cart(&self, request: &CartRequest) -> Result<Cart, ApiError> {
        self.client.post(PREVIEW_PATH, request).await
    }

    async fn checkout(&self, request: &CartRequest) -> Result<Cart, ApiError> {
        self.client.post(CHECKOUT_PATH, request).await
    }
}
