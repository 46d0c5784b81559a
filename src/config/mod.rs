//! Storefront configuration

use clap::Parser;

use crate::config::{
    api::ApiConfig, app::AppConfig, cart::CartConfig, observability::LoggingConfig,
};

pub mod api;
pub mod app;
pub mod cart;
pub mod observability;

pub use observability::LogFormat;

/// Storefront configuration, read once at process start.
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Shopping cart storefront client", long_about = None)]
pub struct StorefrontConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Application identity.
    #[command(flatten)]
    pub app: AppConfig,

    /// Cart behaviour.
    #[command(flatten)]
    pub cart: CartConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Parse configuration from explicit arguments, still honouring the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }
}
