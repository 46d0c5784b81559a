//! Optimistic cart reconciliation.
//!
//! Every user edit is applied to the local [`CartState`] immediately and
//! published to subscribers. Edits that change the cart's items or
//! promotion codes restart a debounce window; when it elapses the cart as
//! it is at that moment is sent for a server preview and the pricing fields
//! of the response are merged back.
//!
//! Responses are guarded by a [`RequestSequence`]: only the response to the
//! most recently dispatched request is merged, so a slow preview can never
//! overwrite a newer one. Failures are handed to the [`Notifier`] untouched.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    api::StorefrontApi,
    carts::{Cart, DEFAULT_CURRENCY, merge::merge_preview},
    notifier::Notifier,
    products::Product,
};

pub mod debounce;
pub mod sequence;
pub mod state;

pub use debounce::Debouncer;
pub use sequence::{RequestSequence, Ticket};
pub use state::{CartState, CheckoutOutcome, View};

/// Quiet window between the last cart edit and its preview request.
pub const DEFAULT_PREVIEW_DEBOUNCE: Duration = Duration::from_millis(500);

/// Reconciler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerOptions {
    /// Quiet window before a preview is requested
    pub preview_debounce: Duration,

    /// Currency of new carts
    pub currency: String,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            preview_debounce: DEFAULT_PREVIEW_DEBOUNCE,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

struct Inner {
    api: Arc<dyn StorefrontApi>,
    notifier: Notifier,
    state: watch::Sender<CartState>,
    debouncer: Debouncer,
    sequence: RequestSequence,
    in_flight: AtomicUsize,
    currency: String,
}

impl Inner {
    fn empty_cart(&self) -> Cart {
        Cart::empty(self.currency.as_str())
    }
}

/// Marks a request as in flight until dropped.
struct InFlight<'a> {
    inner: &'a Inner,
}

impl<'a> InFlight<'a> {
    fn start(inner: &'a Inner) -> Self {
        if inner.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            inner.state.send_if_modified(|state| !std::mem::replace(&mut state.loading, true));
        }

        Self { inner }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner
                .state
                .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
        }
    }
}

/// Owner of the local cart and product catalog.
///
/// Clones share the same state. Mutating operations must be called from
/// within a Tokio runtime since they schedule previews.
#[derive(Clone)]
pub struct CartReconciler {
    inner: Arc<Inner>,
}

impl fmt::Debug for CartReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartReconciler")
            .field("state", &*self.inner.state.borrow())
            .field("currency", &self.inner.currency)
            .finish_non_exhaustive()
    }
}

impl CartReconciler {
    /// Create a reconciler with an empty catalog and cart.
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        notifier: Notifier,
        options: ReconcilerOptions,
    ) -> Self {
        let state = CartState {
            cart: Cart::empty(options.currency.as_str()),
            ..CartState::default()
        };

        Self {
            inner: Arc::new(Inner {
                api,
                notifier,
                state: watch::Sender::new(state),
                debouncer: Debouncer::new(options.preview_debounce),
                sequence: RequestSequence::default(),
                in_flight: AtomicUsize::new(0),
                currency: options.currency,
            }),
        }
    }

    /// Create a reconciler and load the catalog and current cart.
    pub async fn bootstrap(
        api: Arc<dyn StorefrontApi>,
        notifier: Notifier,
        options: ReconcilerOptions,
    ) -> Self {
        let reconciler = Self::new(api, notifier, options);

        reconciler.load().await;

        reconciler
    }

    /// Replace the catalog and cart with the server's.
    ///
    /// A failed fetch is reported and leaves the corresponding collection
    /// empty.
    pub async fn load(&self) {
        let inner = &*self.inner;

        let products = match inner.api.list_products().await {
            Ok(page) => page.items,
            Err(failure) => {
                inner.notifier.report(&failure);

                Vec::new()
            }
        };

        let cart = match inner.api.current_cart().await {
            Ok(Some(cart)) if !cart.is_empty() => cart,
            Ok(_) => inner.empty_cart(),
            Err(failure) => {
                inner.notifier.report(&failure);

                inner.empty_cart()
            }
        };

        info!(
            products = products.len(),
            cart_items = cart.items.len(),
            "storefront loaded"
        );

        inner.state.send_modify(|state| {
            state.products = products;
            state.cart = cart;
            state.view = View::Shopping;
        });
    }

    /// Current state.
    pub fn snapshot(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// The notifier failures are reported to.
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Whether a preview is waiting for the debounce window to elapse.
    pub fn preview_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Add one unit of `product` to the cart.
    pub fn add_to_cart(&self, product: &Product) {
        self.inner.state.send_modify(|state| {
            state.cart.add_product(product);

            if let Some(listed) = state.product_mut(&product.sku) {
                listed.increment_in_cart();
            }
        });

        debug!(sku = %product.sku, "added to cart");

        self.schedule_preview();
    }

    /// Remove one unit of `product` from the cart.
    ///
    /// Returns `false`, changing nothing, when the product is not in the
    /// cart.
    pub fn remove_from_cart(&self, product: &Product) -> bool {
        let removed = self.inner.state.send_if_modified(|state| {
            if !state.cart.remove_product(&product.sku) {
                return false;
            }

            if let Some(listed) = state.product_mut(&product.sku) {
                listed.decrement_in_cart();
            }

            true
        });

        if removed {
            debug!(sku = %product.sku, "removed from cart");

            self.schedule_preview();
        }

        removed
    }

    /// Remove every unit of `sku` from the cart.
    ///
    /// Returns `false` when the sku is not in the cart.
    pub fn remove_item(&self, sku: &str) -> bool {
        let removed = self.inner.state.send_if_modified(|state| {
            if !state.cart.remove_item(sku) {
                return false;
            }

            if let Some(listed) = state.product_mut(sku) {
                listed.quantity_in_cart = 0;
            }

            true
        });

        if removed {
            debug!(sku, "item removed from cart");

            self.schedule_preview();
        }

        removed
    }

    /// Enter a promotion code; the server decides whether it applies.
    ///
    /// Surrounding whitespace is ignored. Returns `false` for blank codes,
    /// codes already entered and when the cart is empty.
    pub fn enter_promotion_code(&self, code: &str) -> bool {
        let code = code.trim();

        if code.is_empty() {
            return false;
        }

        let entered = self.inner.state.send_if_modified(|state| {
            !state.cart.is_empty() && state.cart.add_promotion_code(code)
        });

        if entered {
            debug!(code, "promotion code entered");

            self.schedule_preview();
        }

        entered
    }

    /// Place the order for the current cart.
    ///
    /// On success the cart is reset, every product counter is zeroed and the
    /// confirmation view shows the server's receipt. On failure local state
    /// is left as it was and the failure is reported.
    pub async fn confirm_order(&self) -> CheckoutOutcome {
        let inner = &*self.inner;

        let request = inner.state.borrow().cart.request();

        let Some(request) = request else {
            return CheckoutOutcome::EmptyCart;
        };

        let ticket = inner.sequence.issue();
        let _in_flight = InFlight::start(inner);

        debug!(?ticket, items = request.items.len(), "checking out");

        match inner.api.checkout(&request).await {
            Ok(order) => {
                inner.debouncer.cancel();

                info!(
                    uuid = order.uuid.as_deref().unwrap_or_default(),
                    total = ?order.total_amount,
                    "order confirmed"
                );

                inner.state.send_modify(|state| {
                    state.cart = inner.empty_cart();

                    for product in &mut state.products {
                        product.quantity_in_cart = 0;
                    }

                    state.view = View::OrderConfirmed(order.clone());
                });

                CheckoutOutcome::Confirmed(order)
            }
            Err(failure) => CheckoutOutcome::Failed(inner.notifier.report(&failure)),
        }
    }

    /// Leave the confirmation view to start shopping again.
    ///
    /// Returns `false` when no confirmation is showing.
    pub fn start_new_order(&self) -> bool {
        self.inner.state.send_if_modified(|state| {
            if !matches!(state.view, View::OrderConfirmed(_)) {
                return false;
            }

            state.view = View::Shopping;

            true
        })
    }

    /// Close the confirmation view; same as
    /// [`start_new_order`](Self::start_new_order).
    pub fn close_confirmation(&self) -> bool {
        self.start_new_order()
    }

    /// Send the waiting preview now instead of at the end of the window.
    ///
    /// Does nothing when no preview is waiting.
    pub async fn flush_preview(&self) {
        if self.inner.debouncer.cancel() {
            self.preview().await;
        }
    }

    fn schedule_preview(&self) {
        let reconciler = self.clone();

        self.inner.debouncer.schedule(async move {
            reconciler.preview().await;
        });
    }

    /// Request a preview of the cart as it is now and merge the response if
    /// it is still current.
    pub async fn preview(&self) {
        let inner = &*self.inner;

        let request = inner.state.borrow().cart.request();

        let Some(request) = request else {
            debug!("cart is empty, skipping preview");

            return;
        };

        let ticket = inner.sequence.issue();
        let _in_flight = InFlight::start(inner);

        debug!(?ticket, items = request.items.len(), "requesting preview");

        match inner.api.preview_cart(&request).await {
            Ok(preview) => {
                if !inner.sequence.is_latest(ticket) {
                    debug!(?ticket, "discarding superseded preview");

                    return;
                }

                let merged = inner.state.send_if_modified(|state| {
                    if state.cart.is_empty() {
                        return false;
                    }

                    merge_preview(&mut state.cart, preview);

                    true
                });

                debug!(?ticket, merged, "preview received");
            }
            Err(failure) => {
                inner.notifier.report(&failure);
            }
        }
    }
}
