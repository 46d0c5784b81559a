use std::io::{self, Write};

use storefront::{context::StorefrontContext, receipt::Receipt};

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    let cart = context
        .api
        .current_cart()
        .await
        .map_err(|failure| super::describe_failure(context, &failure))?;

    let mut out = io::stdout().lock();

    match cart {
        Some(cart) if !cart.is_empty() => Receipt::from_cart(&cart)
            .write_to(&mut out)
            .map_err(|error| format!("failed to render cart: {error}")),
        _ => writeln!(out, "Your cart is empty.")
            .map_err(|error| format!("failed to write output: {error}")),
    }
}
