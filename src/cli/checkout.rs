use std::io::{self, Write};

use clap::Args;
use storefront::{
    context::StorefrontContext,
    notifier::{ErrorState, Recovery},
    receipt::Receipt,
    reconciler::CheckoutOutcome,
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Sku to add; repeat to add more units
    #[arg(long = "add", value_name = "SKU", required = true)]
    skus: Vec<String>,

    /// Promotion code to enter
    #[arg(long = "promo", value_name = "CODE")]
    promotion_codes: Vec<String>,
}

pub(crate) async fn run(context: &StorefrontContext, args: CheckoutArgs) -> Result<(), String> {
    let reconciler = context.reconciler().await;

    if let ErrorState::Redirecting(view) = context.notifier.current() {
        return Err(format!(
            "failed to load storefront: {} {}",
            view.page().code,
            view.page().title
        ));
    }

    let catalog = reconciler.snapshot();

    for sku in args.skus {
        let product = catalog
            .product(&sku)
            .ok_or_else(|| format!("unknown product sku {sku:?}"))?;

        reconciler.add_to_cart(product);
    }

    for code in args.promotion_codes {
        reconciler.enter_promotion_code(&code);
    }

    reconciler.flush_preview().await;

    let mut out = io::stdout().lock();

    match context.notifier.current() {
        ErrorState::Notification(info) => {
            writeln!(out, "Notice: {}", info.message)
                .map_err(|error| format!("failed to write output: {error}"))?;

            context.notifier.dismiss();
        }
        ErrorState::Redirecting(view) => {
            return Err(format!(
                "preview failed: {} {}",
                view.page().code,
                view.page().title
            ));
        }
        ErrorState::NoError => {}
    }

    match reconciler.confirm_order().await {
        CheckoutOutcome::Confirmed(order) => {
            writeln!(out, "Order confirmed")
                .map_err(|error| format!("failed to write output: {error}"))?;

            Receipt::from_cart(&order)
                .write_to(&mut out)
                .map_err(|error| format!("failed to render receipt: {error}"))
        }
        CheckoutOutcome::EmptyCart => Err("cart is empty".to_string()),
        CheckoutOutcome::Failed(Recovery::Navigate(view)) => Err(format!(
            "checkout failed: {} {} ({})",
            view.page().code,
            view.page().title,
            view.path()
        )),
        CheckoutOutcome::Failed(Recovery::Notify) => match context.notifier.current() {
            ErrorState::Notification(info) => Err(format!("checkout rejected: {}", info.message)),
            _ => Err("checkout rejected".to_string()),
        },
    }
}
