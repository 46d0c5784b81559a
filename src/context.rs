//! Storefront Context

use std::{fmt, sync::Arc};

use reqwest::Client;
use thiserror::Error;

use crate::{
    api::{HttpStorefrontApi, StorefrontApi},
    config::StorefrontConfig,
    notifier::Notifier,
    reconciler::{CartReconciler, ReconcilerOptions},
    transport::{ApiClient, MemoryTokenStore},
};

/// Errors raised while wiring the storefront together.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Shared collaborators of a storefront session.
#[derive(Clone)]
pub struct StorefrontContext {
    /// Backend operations
    pub api: Arc<dyn StorefrontApi>,

    /// Error slot shared by every component
    pub notifier: Notifier,

    /// Settings for reconcilers built from this context
    pub options: ReconcilerOptions,
}

impl fmt::Debug for StorefrontContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontContext")
            .field("notifier", &self.notifier)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl StorefrontContext {
    /// Assemble a context from explicit collaborators.
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        notifier: Notifier,
        options: ReconcilerOptions,
    ) -> Self {
        Self {
            api,
            notifier,
            options,
        }
    }

    /// Build the HTTP-backed context described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ContextError> {
        let http = Client::builder()
            .user_agent(format!(
                "{}/{}",
                config.app.name.replace(' ', "-"),
                config.app.version
            ))
            .build()
            .map_err(ContextError::HttpClient)?;

        let client = ApiClient::with_http_client(
            config.api.url.as_str(),
            config.api.request_timeout(),
            Arc::new(MemoryTokenStore::new(config.api.auth_token.clone())),
            http,
        );

        Ok(Self::new(
            Arc::new(HttpStorefrontApi::new(client)),
            Notifier::new(config.cart.notification_timeout()),
            ReconcilerOptions {
                preview_debounce: config.cart.preview_debounce(),
                currency: config.cart.currency.clone(),
            },
        ))
    }

    /// Build a reconciler and load the catalog and current cart.
    pub async fn reconciler(&self) -> CartReconciler {
        CartReconciler::bootstrap(
            Arc::clone(&self.api),
            self.notifier.clone(),
            self.options.clone(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_config_carries_cart_settings() -> TestResult {
        let config = StorefrontConfig::load_from([
            "storefront",
            "--preview-debounce-ms",
            "100",
            "--currency",
            "USD",
        ])?;

        let context = StorefrontContext::from_config(&config)?;

        assert_eq!(context.options.preview_debounce, Duration::from_millis(100));
        assert_eq!(context.options.currency, "USD");

        Ok(())
    }
}
