//! Debounce, ordering and expiry behaviour under a paused clock.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use testresult::TestResult;
use tokio::{
    task::yield_now,
    time::{advance, sleep},
};

use storefront::prelude::*;

/// Backend whose previews resolve after scripted delays.
#[derive(Debug, Default)]
struct ScriptedApi {
    previews: Mutex<VecDeque<(Duration, Result<Cart, ApiError>)>>,
    preview_calls: AtomicUsize,
    checkout_delay: Duration,
}

impl ScriptedApi {
    fn with_previews(previews: impl IntoIterator<Item = (u64, Result<Cart, ApiError>)>) -> Self {
        Self {
            previews: Mutex::new(
                previews
                    .into_iter()
                    .map(|(delay, result)| (Duration::from_millis(delay), result))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

#[async_trait]
impl StorefrontApi for ScriptedApi {
    async fn list_products(&self) -> Result<ProductPage, ApiError> {
        Ok(ProductPage {
            items: vec![waffle()],
            total: Some(1),
            ..ProductPage::default()
        })
    }

    async fn current_cart(&self) -> Result<Option<Cart>, ApiError> {
        Ok(None)
    }

    async fn preview_cart(&self, _request: &CartRequest) -> Result<Cart, ApiError> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self
            .previews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        let (delay, result) = scripted.unwrap_or((Duration::ZERO, Err(ApiError::network())));

        sleep(delay).await;

        result
    }

    async fn checkout(&self, request: &CartRequest) -> Result<Cart, ApiError> {
        sleep(self.checkout_delay).await;

        Ok(Cart {
            uuid: Some("order-1".to_string()),
            total_amount: Some(Decimal::from(1000)),
            total_items: Some(request.items.iter().map(|line| line.quantity).sum()),
            ..Cart::default()
        })
    }
}

fn waffle() -> Product {
    Product {
        id: "p-1".to_string(),
        sku: "A1".to_string(),
        name: "Waffle".to_string(),
        category: "Waffle".to_string(),
        price: Decimal::from(1000),
        description: String::new(),
        images: ProductImages::default(),
        quantity_in_cart: 0,
    }
}

fn priced(total: i64) -> Result<Cart, ApiError> {
    Ok(Cart {
        total_amount: Some(Decimal::from(total)),
        ..Cart::default()
    })
}

async fn elapse(millis: u64) {
    advance(Duration::from_millis(millis)).await;

    for _ in 0..8 {
        yield_now().await;
    }
}

async fn storefront(api: &Arc<ScriptedApi>) -> CartReconciler {
    CartReconciler::bootstrap(
        Arc::clone(api) as Arc<dyn StorefrontApi>,
        Notifier::default(),
        ReconcilerOptions::default(),
    )
    .await
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_sends_one_preview() {
    let api = Arc::new(ScriptedApi::with_previews([(0, priced(3000))]));
    let reconciler = storefront(&api).await;

    for _ in 0..3 {
        reconciler.add_to_cart(&waffle());
        elapse(100).await;
    }

    reconciler.enter_promotion_code("SAVE10");

    elapse(499).await;
    assert_eq!(api.preview_calls.load(Ordering::SeqCst), 0);

    elapse(1).await;
    assert_eq!(api.preview_calls.load(Ordering::SeqCst), 1);
    assert_eq!(reconciler.snapshot().cart.total_amount, Some(Decimal::from(3000)));
}

#[tokio::test(start_paused = true)]
async fn slower_earlier_preview_is_discarded() {
    let api = Arc::new(ScriptedApi::with_previews([
        (800, priced(1000)),
        (100, priced(2000)),
    ]));
    let reconciler = storefront(&api).await;

    reconciler.add_to_cart(&waffle());
    elapse(500).await;
    assert_eq!(api.preview_calls.load(Ordering::SeqCst), 1);

    elapse(100).await;
    reconciler.add_to_cart(&waffle());
    elapse(500).await;
    assert_eq!(api.preview_calls.load(Ordering::SeqCst), 2);

    elapse(100).await;

    let state = reconciler.snapshot();

    assert_eq!(state.cart.total_amount, Some(Decimal::from(2000)));
    assert!(state.loading);

    elapse(100).await;

    let state = reconciler.snapshot();

    assert_eq!(state.cart.total_amount, Some(Decimal::from(2000)));
    assert_eq!(state.cart.quantity(), 2);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn checkout_supersedes_preview_in_flight() -> TestResult {
    let api = Arc::new(ScriptedApi {
        checkout_delay: Duration::from_millis(100),
        ..ScriptedApi::with_previews([(800, priced(1000))])
    });
    let reconciler = storefront(&api).await;

    reconciler.add_to_cart(&waffle());
    elapse(500).await;
    assert!(reconciler.snapshot().loading);

    let checkout = tokio::spawn({
        let reconciler = reconciler.clone();

        async move { reconciler.confirm_order().await }
    });

    elapse(100).await;

    let outcome = checkout.await?;

    assert!(matches!(outcome, CheckoutOutcome::Confirmed(_)));

    elapse(1_000).await;

    let state = reconciler.snapshot();

    assert_eq!(state.cart, Cart::empty(DEFAULT_CURRENCY));
    assert!(matches!(state.view, View::OrderConfirmed(_)));
    assert!(!state.loading);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn preview_rejection_notifies_then_expires() {
    let api = Arc::new(ScriptedApi::with_previews([(
        0,
        Err(ApiError::from_response(ErrorInfo::new(
            400,
            "INVALID_PROMOTION",
            "Invalid promotion code",
        ))),
    )]));
    let reconciler = storefront(&api).await;

    reconciler.add_to_cart(&waffle());
    reconciler.enter_promotion_code("BOGUS");
    elapse(500).await;

    assert!(matches!(
        reconciler.notifier().current(),
        ErrorState::Notification(ref info) if info.message == "Invalid promotion code"
    ));

    elapse(4_999).await;
    assert!(matches!(
        reconciler.notifier().current(),
        ErrorState::Notification(_)
    ));

    elapse(1).await;
    assert_eq!(reconciler.notifier().current(), ErrorState::NoError);
    assert_eq!(reconciler.snapshot().cart.quantity(), 1);
}

#[tokio::test(start_paused = true)]
async fn preview_for_emptied_cart_is_dropped() {
    let api = Arc::new(ScriptedApi::with_previews([(300, priced(1000))]));
    let reconciler = storefront(&api).await;

    reconciler.add_to_cart(&waffle());
    elapse(500).await;

    reconciler.remove_item("A1");
    elapse(300).await;

    assert_eq!(reconciler.snapshot().cart, Cart::empty(DEFAULT_CURRENCY));

    elapse(1_000).await;
    assert_eq!(api.preview_calls.load(Ordering::SeqCst), 1);
}
