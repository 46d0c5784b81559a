//! Cart Config

use std::time::Duration;

use clap::Args;

use crate::pricing::find_currency;

/// Cart behaviour settings.
#[derive(Debug, Args)]
pub struct CartConfig {
    /// ISO currency code of new carts
    #[arg(long, env = "DEFAULT_CURRENCY", default_value = "VND", value_parser = parse_currency)]
    pub currency: String,

    /// Quiet window in milliseconds between the last cart edit and its preview
    #[arg(long, env = "PREVIEW_DEBOUNCE_MS", default_value_t = 500_u64)]
    pub preview_debounce_ms: u64,

    /// How long inline notifications stay visible, in milliseconds
    #[arg(long, env = "NOTIFICATION_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub notification_timeout_ms: u64,
}

impl CartConfig {
    /// Preview debounce window.
    #[must_use]
    pub fn preview_debounce(&self) -> Duration {
        Duration::from_millis(self.preview_debounce_ms)
    }

    /// Notification display window.
    #[must_use]
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

fn parse_currency(code: &str) -> Result<String, String> {
    find_currency(code)
        .map(|currency| currency.iso_alpha_code.to_string())
        .map_err(|error| error.to_string())
}
