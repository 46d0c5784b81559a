//! Backend API Config

use std::time::Duration;

use clap::Args;
use reqwest::Url;

/// Backend API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Origin of the storefront API; requests go to `{url}/api`
    #[arg(long = "api-url", env = "API_URL", default_value = "http://localhost:3000")]
    pub url: Url,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 10_000_u64)]
    pub request_timeout_ms: u64,

    /// Bearer token sent with every request
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,
}

impl ApiConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
