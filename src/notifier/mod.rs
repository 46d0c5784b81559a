//! Error classification and notification.
//!
//! The [`Notifier`] is the single place deciding how a failed request is
//! shown to the user. It owns one error slot, published through a
//! [`watch`] channel so rendering code can follow it:
//!
//! - 403, 404 and 5xx replace the current view ([`ErrorState::Redirecting`]).
//! - Everything else becomes an inline [`ErrorState::Notification`] that
//!   clears itself after the display window unless dismissed first.
//!
//! A newer failure always overwrites the slot.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::watch,
    time::{Instant, sleep_until},
};
use tracing::{debug, error, warn};

use crate::transport::{ApiError, ErrorInfo};

pub mod classifier;

pub use classifier::{ErrorPage, ErrorView, Recovery, RecoveryAction, classify};

/// How long an inline notification stays visible.
pub const DEFAULT_DISPLAY_WINDOW: Duration = Duration::from_secs(5);

/// Contents of the error slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ErrorState {
    /// Nothing to show.
    #[default]
    NoError,

    /// An inline, dismissible notification.
    Notification(ErrorInfo),

    /// The current view has been replaced by an error page.
    Redirecting(ErrorView),
}

#[derive(Debug)]
struct Inner {
    state: watch::Sender<ErrorState>,
    generation: AtomicU64,
    display_window: Duration,
}

impl Inner {
    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn expire(&self, generation: u64) {
        let expired = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation
                || !matches!(state, ErrorState::Notification(_))
            {
                return false;
            }

            *state = ErrorState::NoError;

            true
        });

        if expired {
            debug!(generation, "notification expired");
        }
    }
}

/// Handle to the error slot; clones share the same slot.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_WINDOW)
    }
}

impl Notifier {
    /// Create a notifier whose notifications expire after `display_window`.
    pub fn new(display_window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: watch::Sender::new(ErrorState::NoError),
                generation: AtomicU64::new(0),
                display_window,
            }),
        }
    }

    /// Follow changes to the error slot.
    pub fn subscribe(&self) -> watch::Receiver<ErrorState> {
        self.inner.state.subscribe()
    }

    /// Current contents of the error slot.
    pub fn current(&self) -> ErrorState {
        self.inner.state.borrow().clone()
    }

    /// Classify a failure and update the error slot accordingly.
    ///
    /// Must be called from within a Tokio runtime; notifications schedule
    /// their own expiry.
    pub fn report(&self, failure: &ApiError) -> Recovery {
        let info = failure.info();
        let recovery = classify(info.status);
        let generation = self.inner.bump();

        match recovery {
            Recovery::Navigate(view) => {
                if info.status >= 500 {
                    error!(
                        status = info.status,
                        error_code = %info.error_code,
                        message = %info.message,
                        path = view.path(),
                        "request failed, showing error page"
                    );
                } else {
                    warn!(
                        status = info.status,
                        error_code = %info.error_code,
                        path = view.path(),
                        "request rejected, showing error page"
                    );
                }

                self.inner.state.send_replace(ErrorState::Redirecting(view));
            }
            Recovery::Notify => {
                warn!(
                    status = info.status,
                    error_code = %info.error_code,
                    message = %info.message,
                    "request rejected, notifying"
                );

                self.inner
                    .state
                    .send_replace(ErrorState::Notification(info.clone()));

                self.schedule_expiry(generation);
            }
        }

        recovery
    }

    fn schedule_expiry(&self, generation: u64) {
        let deadline = Instant::now() + self.inner.display_window;
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            sleep_until(deadline).await;

            inner.expire(generation);
        });
    }

    /// Close the active notification.
    ///
    /// Returns `false` when no notification is showing; error pages are not
    /// dismissible.
    pub fn dismiss(&self) -> bool {
        let dismissed = self.inner.state.send_if_modified(|state| {
            if !matches!(state, ErrorState::Notification(_)) {
                return false;
            }

            *state = ErrorState::NoError;

            true
        });

        if dismissed {
            self.inner.bump();
        }

        dismissed
    }

    /// Escape gesture; behaves like [`Notifier::dismiss`].
    pub fn escape(&self) -> bool {
        self.dismiss()
    }

    /// Follow one of the actions offered by the current error page.
    ///
    /// Returns the page that was left, or `None` when no error page is
    /// showing or it does not offer `action`.
    pub fn leave_error_view(&self, action: RecoveryAction) -> Option<ErrorView> {
        let mut left = None;

        self.inner.state.send_if_modified(|state| {
            let ErrorState::Redirecting(view) = *state else {
                return false;
            };

            if !view.offers(action) {
                return false;
            }

            left = Some(view);
            *state = ErrorState::NoError;

            true
        });

        if let Some(view) = left {
            debug!(path = view.path(), ?action, "left error page");
        }

        left
    }
}
