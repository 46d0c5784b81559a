//! Success envelope `{code, message, data}`.

use serde::Deserialize;

/// Wrapper the server puts around every success payload.
///
/// The envelope's `code` is not interpreted; the HTTP status already says
/// the request succeeded.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    message: Option<String>,

    data: T,
}

impl<T> Envelope<T> {
    pub(crate) fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn into_data(self) -> T {
        self.data
    }
}
