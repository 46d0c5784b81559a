//! Application Config

use clap::Args;

/// Application identity, reported in logs and the `User-Agent` header.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Application name
    #[arg(long = "app-name", env = "APP_NAME", default_value = "Shopping Cart Demo")]
    pub name: String,

    /// Application version
    #[arg(long = "app-version", env = "APP_VERSION", default_value = "1.0.0")]
    pub version: String,

    /// Deployment environment
    #[arg(long = "app-env", env = "APP_ENV", default_value = "development")]
    pub environment: String,
}
