//! Transport errors.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Message used when an error body carries none of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Message used when a request exceeds its timeout.
pub const TIMEOUT_MESSAGE: &str = "Request timeout";

/// Message used when no response was received.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Message used when a success body could not be decoded.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response received";

/// Failure details as surfaced to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    /// HTTP status, the primary discriminant
    pub status: u16,

    /// Server-defined error classifier
    pub error_code: String,

    /// User-facing message
    pub message: String,

    /// Transport status rendered as text
    pub code: Option<String>,

    /// Server-provided structured details
    pub details: Option<Value>,
}

impl ErrorInfo {
    /// Build an error with no code or details.
    pub fn new(status: u16, error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: error_code.into(),
            message: message.into(),
            code: None,
            details: None,
        }
    }
}

/// Classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400
    Validation,

    /// 403
    Forbidden,

    /// 404
    NotFound,

    /// Any status of 500 or above.
    Server,

    /// The request timed out; reported as 408.
    Timeout,

    /// No response was received; reported as 500.
    Network,

    /// A success response could not be decoded; reported as 500.
    InvalidResponse,

    /// Any other non-success status.
    Client(u16),
}

impl ApiErrorKind {
    /// Classify a non-success response status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500.. => Self::Server,
            other => Self::Client(other),
        }
    }
}

/// Error returned by every transport operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} ({})", .info.message, .info.status)]
pub struct ApiError {
    kind: ApiErrorKind,
    info: ErrorInfo,
}

impl ApiError {
    /// Build an error from a non-success response.
    pub fn from_response(info: ErrorInfo) -> Self {
        Self {
            kind: ApiErrorKind::from_status(info.status),
            info,
        }
    }

    /// The request timed out.
    pub fn timeout() -> Self {
        Self {
            kind: ApiErrorKind::Timeout,
            info: ErrorInfo::new(408, "408", TIMEOUT_MESSAGE),
        }
    }

    /// No response was received.
    pub fn network() -> Self {
        Self {
            kind: ApiErrorKind::Network,
            info: ErrorInfo::new(500, "500", NETWORK_ERROR_MESSAGE),
        }
    }

    /// A success response body could not be decoded.
    pub fn invalid_response() -> Self {
        Self {
            kind: ApiErrorKind::InvalidResponse,
            info: ErrorInfo::new(500, "500", INVALID_RESPONSE_MESSAGE),
        }
    }

    /// Error classification
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// HTTP status, synthesized for local failures
    pub fn status(&self) -> u16 {
        self.info.status
    }

    /// Failure details
    pub fn info(&self) -> &ErrorInfo {
        &self.info
    }

    /// Consume the error, keeping its details.
    pub fn into_info(self) -> ErrorInfo {
        self.info
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout()
        } else if error.is_decode() {
            Self::invalid_response()
        } else {
            Self::network()
        }
    }
}

/// Structured error body `{errorCode, message, details}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    error_code: Option<Value>,

    #[serde(default)]
    message: Option<Value>,

    #[serde(default)]
    details: Option<Value>,
}

/// Build [`ErrorInfo`] for a non-success response from its raw body.
///
/// Unparseable bodies fall back to the status reason phrase.
pub(crate) fn error_info(status: StatusCode, body: &[u8]) -> ErrorInfo {
    let fallback_code = status.as_u16().to_string();

    let (error_code, message, details) = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => (
            parsed
                .error_code
                .and_then(|code| match code {
                    Value::String(code) if !code.is_empty() => Some(code),
                    Value::Number(code) => Some(code.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| fallback_code.clone()),
            parsed
                .message
                .and_then(|message| match message {
                    Value::String(message) if !message.is_empty() => Some(message),
                    _ => None,
                })
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            parsed.details.filter(|details| !details.is_null()),
        ),
        Err(_) => (
            fallback_code.clone(),
            status
                .canonical_reason()
                .unwrap_or(DEFAULT_ERROR_MESSAGE)
                .to_string(),
            None,
        ),
    };

    ErrorInfo {
        status: status.as_u16(),
        error_code,
        message,
        code: Some(fallback_code),
        details,
    }
}
