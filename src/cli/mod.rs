use std::io::{self, Write};

use clap::{Parser, Subcommand};
use storefront::{
    config::StorefrontConfig,
    context::StorefrontContext,
    notifier::Recovery,
    transport::ApiError,
};
use tabled::{Table, settings::Style};

mod cart;
mod checkout;
mod products;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Shopping cart storefront", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the product catalog
    Products,

    /// Show the current server cart
    Cart,

    /// Build a cart, preview it and place the order
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let context = StorefrontContext::from_config(&self.config)
            .map_err(|error| format!("failed to initialise storefront: {error}"))?;

        match self.command {
            Commands::Products => products::run(&context).await,
            Commands::Cart => cart::run(&context).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
        }
    }
}

/// Route a failure through the notifier and describe what the user sees.
fn describe_failure(context: &StorefrontContext, failure: &ApiError) -> String {
    describe_recovery(context.notifier.report(failure), failure)
}

fn describe_recovery(recovery: Recovery, failure: &ApiError) -> String {
    match recovery {
        Recovery::Navigate(view) => {
            let page = view.page();

            format!(
                "{} {} ({}): {} [{failure}]",
                page.code,
                page.title,
                view.path(),
                page.description
            )
        }
        Recovery::Notify => failure.to_string(),
    }
}

fn write_table(mut table: Table) -> Result<(), String> {
    table.with(Style::modern_rounded());

    writeln!(io::stdout().lock(), "{table}")
        .map_err(|error| format!("failed to write output: {error}"))
}
