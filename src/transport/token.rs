//! Bearer token storage.

use std::sync::{PoisonError, RwLock};

use mockall::automock;
use zeroize::Zeroizing;

/// Client-side storage for the bearer credential.
#[automock]
pub trait TokenStore: Send + Sync {
    /// Current token, if one is stored.
    fn token(&self) -> Option<String>;

    /// Store a token, replacing any previous one.
    fn set_token(&self, token: String);

    /// Forget the stored token.
    fn clear_token(&self);
}

/// In-memory [`TokenStore`]; the secret is zeroized when replaced or dropped.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<Zeroizing<String>>>,
}

impl MemoryTokenStore {
    /// Create a store seeded with an optional token.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.map(Zeroizing::new)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.as_str().to_string())
    }

    fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(Zeroizing::new(token));
    }

    fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
