//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    api::{HttpStorefrontApi, StorefrontApi},
    carts::{
        Cart, CartItem, CartLine, CartRequest, DEFAULT_CURRENCY, Promotion, merge::merge_preview,
    },
    config::StorefrontConfig,
    context::{ContextError, StorefrontContext},
    notifier::{
        ErrorPage, ErrorState, ErrorView, Notifier, Recovery, RecoveryAction, classify,
    },
    observability::ObservabilityError,
    pricing::{PriceFormatError, format_price},
    products::{Product, ProductImages, ProductPage},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    reconciler::{CartReconciler, CartState, CheckoutOutcome, ReconcilerOptions, View},
    transport::{ApiClient, ApiError, ApiErrorKind, ErrorInfo, MemoryTokenStore, TokenStore},
};
