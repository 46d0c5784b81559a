//! HTTP transport.
//!
//! [`ApiClient`] never recovers from failures itself: every non-success
//! response, timeout or connection failure is returned to the caller as an
//! [`ApiError`].

use std::{fmt, sync::Arc, time::Duration, time::Instant};

use humanize_duration::{Truncate, prelude::DurationExt};
use reqwest::{Client, Method, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::transport::envelope::Envelope;

mod envelope;
pub mod errors;
pub mod token;

pub use errors::{ApiError, ApiErrorKind, ErrorInfo};
pub use token::{MemoryTokenStore, MockTokenStore, TokenStore};

/// Timeout applied to every request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP verbs supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,

    /// POST
    Post,

    /// PUT
    Put,

    /// PATCH
    Patch,

    /// DELETE
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// JSON client for the storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    timeout: Duration,
    tokens: Arc<dyn TokenStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API served under `{api_url}/api`.
    pub fn new(api_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_http_client(api_url, timeout, tokens, Client::new())
    }

    /// Like [`ApiClient::new`], reusing a preconfigured HTTP client.
    pub fn with_http_client(
        api_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
        http: Client,
    ) -> Self {
        Self {
            base_url: format!("{}/api", api_url.trim_end_matches('/')),
            http,
            timeout,
            tokens,
        }
    }

    /// Base URL every endpoint is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store the bearer token sent with subsequent requests.
    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.tokens.set_token(token.into());
    }

    /// Forget the bearer token; subsequent requests are anonymous.
    pub fn clear_auth_token(&self) {
        self.tokens.clear_token();
    }

    /// Issue a request and unwrap the `data` of the success envelope.
    ///
    /// # Errors
    ///
    /// - [`ApiErrorKind::Timeout`]: no response within the configured timeout.
    /// - [`ApiErrorKind::Network`]: no response was received at all.
    /// - [`ApiErrorKind::InvalidResponse`]: the success body could not be decoded.
    /// - Any other kind: the server answered with a non-success status.
    pub async fn request<T, B>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let started = Instant::now();

        let mut request = self
            .http
            .request(method.into(), &url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|error| {
            warn!(?method, %url, %error, "request failed without a response");

            ApiError::from(error)
        })?;

        let status = response.status();

        let bytes = response.bytes().await.map_err(|error| {
            warn!(?method, %url, %error, "failed to read response body");

            ApiError::from(error)
        })?;

        debug!(
            ?method,
            %url,
            status = status.as_u16(),
            elapsed = %started.elapsed().human(Truncate::Nano),
            "request completed"
        );

        if !status.is_success() {
            return Err(ApiError::from_response(errors::error_info(status, &bytes)));
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes).map_err(|error| {
            warn!(?method, %url, %error, "failed to decode response envelope");

            ApiError::invalid_response()
        })?;

        if let Some(message) = envelope.message() {
            debug!(%url, message, "server message");
        }

        Ok(envelope.into_data())
    }

    /// GET `endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(HttpMethod::Get, endpoint, None).await
    }

    /// POST `body` to `endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, endpoint, Some(body)).await
    }

    /// PUT `body` to `endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, endpoint, Some(body)).await
    }

    /// PATCH `body` to `endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Patch, endpoint, Some(body)).await
    }

    /// DELETE `endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(HttpMethod::Delete, endpoint, None).await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::{Value, json};
    use testresult::TestResult;
    use tokio::net::TcpListener;

    use super::*;

    fn client(url: &str, token: Option<&str>) -> ApiClient {
        ApiClient::new(
            url,
            DEFAULT_TIMEOUT,
            Arc::new(MemoryTokenStore::new(token.map(str::to_string))),
        )
    }

    #[test]
    fn base_url_appends_api_prefix() {
        assert_eq!(
            client("http://shop.test/", None).base_url(),
            "http://shop.test/api"
        );
    }

    #[tokio::test]
    async fn unwraps_success_envelope() -> TestResult {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/ping")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "code": 200, "message": "ok", "data": { "pong": true } }).to_string(),
            )
            .create_async()
            .await;

        let data: Value = client(&server.url(), None).get("/v1/ping").await?;

        assert_eq!(data, json!({ "pong": true }));
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn sends_bearer_token_when_stored() -> TestResult {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/api/v1/echo")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Json(json!({ "value": 1 })))
            .with_status(200)
            .with_body(json!({ "data": 1 }).to_string())
            .create_async()
            .await;

        let data: u32 = client(&server.url(), Some("secret"))
            .post("/v1/echo", &json!({ "value": 1 }))
            .await?;

        assert_eq!(data, 1);
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn reads_token_store_on_every_request() -> TestResult {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/ping")
            .match_header("authorization", "Bearer rotated")
            .with_status(200)
            .with_body(json!({ "data": true }).to_string())
            .expect(2)
            .create_async()
            .await;

        let mut tokens = MockTokenStore::new();

        tokens
            .expect_token()
            .times(2)
            .returning(|| Some("rotated".to_string()));

        let api = ApiClient::new(&server.url(), DEFAULT_TIMEOUT, Arc::new(tokens));

        let first: bool = api.get("/v1/ping").await?;
        let second: bool = api.get("/v1/ping").await?;

        assert!(first && second);
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn anonymous_without_token() -> TestResult {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/ping")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(json!({ "data": null }).to_string())
            .create_async()
            .await;

        let api = client(&server.url(), Some("secret"));
        api.clear_auth_token();

        let data: Option<u32> = api.get("/v1/ping").await?;

        assert_eq!(data, None);
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn structured_error_body_is_surfaced() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/api/v1/carts/preview")
            .with_status(400)
            .with_body(
                json!({
                    "errorCode": "PROMO_INVALID",
                    "message": "Invalid promotion code",
                    "details": null
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result: Result<Value, ApiError> = client(&server.url(), None)
            .post("/v1/carts/preview", &json!({}))
            .await;

        let error = result.err();

        assert_eq!(error.as_ref().map(ApiError::kind), Some(ApiErrorKind::Validation));
        assert_eq!(
            error.map(|error| error.into_info().message),
            Some("Invalid promotion code".to_string())
        );
    }

    #[tokio::test]
    async fn plain_text_error_falls_back_to_reason() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/api/v1/products")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let result: Result<Value, ApiError> = client(&server.url(), None).get("/v1/products").await;

        let info = result.err().map(ApiError::into_info);

        assert_eq!(info.as_ref().map(|info| info.status), Some(503));
        assert_eq!(
            info.as_ref().map(|info| info.error_code.as_str()),
            Some("503")
        );
        assert_eq!(
            info.map(|info| info.message),
            Some("Service Unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn undecodable_success_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/api/v1/products")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result: Result<Value, ApiError> = client(&server.url(), None).get("/v1/products").await;

        assert_eq!(
            result.err().as_ref().map(ApiError::kind),
            Some(ApiErrorKind::InvalidResponse)
        );
    }

    #[tokio::test]
    async fn unresponsive_server_times_out() -> TestResult {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server = tokio::spawn(async move {
            let mut held = Vec::new();

            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let api = ApiClient::new(
            &format!("http://{addr}"),
            Duration::from_millis(100),
            Arc::new(MemoryTokenStore::default()),
        );

        let result: Result<Value, ApiError> = api.get("/v1/products").await;

        server.abort();

        let error = result.err();

        assert_eq!(error.as_ref().map(ApiError::kind), Some(ApiErrorKind::Timeout));
        assert_eq!(error.as_ref().map(ApiError::status), Some(408));

        Ok(())
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() -> TestResult {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let result: Result<Value, ApiError> =
            client(&format!("http://{addr}"), None).get("/v1/products").await;

        let error = result.err();

        assert_eq!(error.as_ref().map(ApiError::kind), Some(ApiErrorKind::Network));
        assert_eq!(error.as_ref().map(ApiError::status), Some(500));

        Ok(())
    }
}
