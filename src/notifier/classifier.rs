//! Status classification.

/// A dedicated page that replaces the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorView {
    /// 403
    Forbidden,

    /// 404
    NotFound,

    /// 500 and above
    ServerError,
}

/// What the user can do from an [`ErrorView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Navigate to the storefront home.
    GoHome,

    /// Return to the previous view.
    GoBack,

    /// Reload the current view.
    Retry,
}

/// Static content of an [`ErrorView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPage {
    /// Status shown as the page heading
    pub code: u16,

    /// Page title
    pub title: &'static str,

    /// Explanatory text
    pub description: &'static str,

    /// Available actions, primary first
    pub actions: &'static [RecoveryAction],
}

const FORBIDDEN_PAGE: ErrorPage = ErrorPage {
    code: 403,
    title: "Access Forbidden",
    description: "You don't have permission to access this resource. \
        Please contact your administrator if you believe this is an error.",
    actions: &[RecoveryAction::GoHome, RecoveryAction::GoBack],
};

const NOT_FOUND_PAGE: ErrorPage = ErrorPage {
    code: 404,
    title: "Page Not Found",
    description: "The page you're looking for doesn't exist. \
        It might have been moved, deleted, or you entered the wrong URL.",
    actions: &[RecoveryAction::GoHome, RecoveryAction::GoBack],
};

const SERVER_ERROR_PAGE: ErrorPage = ErrorPage {
    code: 500,
    title: "Server Error",
    description: "Something went wrong on our end. We're working to fix the issue. \
        Please try again later or contact support if the problem persists.",
    actions: &[RecoveryAction::GoHome, RecoveryAction::Retry],
};

impl ErrorView {
    /// Route of the page.
    pub fn path(self) -> &'static str {
        match self {
            Self::Forbidden => "/error/403",
            Self::NotFound => "/error/404",
            Self::ServerError => "/error/500",
        }
    }

    /// Content of the page.
    pub fn page(self) -> &'static ErrorPage {
        match self {
            Self::Forbidden => &FORBIDDEN_PAGE,
            Self::NotFound => &NOT_FOUND_PAGE,
            Self::ServerError => &SERVER_ERROR_PAGE,
        }
    }

    /// Whether the user can take `action` from this view.
    pub fn offers(self, action: RecoveryAction) -> bool {
        self.page().actions.contains(&action)
    }
}

/// User-visible response to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Replace the current view with an error page.
    Navigate(ErrorView),

    /// Keep the current view and show a dismissible notification.
    Notify,
}

/// Decide how a failure with the given status is surfaced.
///
/// Statuses without a dedicated page, including locally synthesized
/// timeouts, are shown inline.
pub fn classify(status: u16) -> Recovery {
    match status {
        403 => Recovery::Navigate(ErrorView::Forbidden),
        404 => Recovery::Navigate(ErrorView::NotFound),
        500.. => Recovery::Navigate(ErrorView::ServerError),
        _ => Recovery::Notify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_dedicated_statuses_to_pages() {
        assert_eq!(classify(403), Recovery::Navigate(ErrorView::Forbidden));
        assert_eq!(classify(404), Recovery::Navigate(ErrorView::NotFound));
        assert_eq!(classify(500), Recovery::Navigate(ErrorView::ServerError));
        assert_eq!(classify(502), Recovery::Navigate(ErrorView::ServerError));
        assert_eq!(classify(599), Recovery::Navigate(ErrorView::ServerError));
    }

    #[test]
    fn other_statuses_notify_inline() {
        assert_eq!(classify(400), Recovery::Notify);
        assert_eq!(classify(401), Recovery::Notify);
        assert_eq!(classify(408), Recovery::Notify);
        assert_eq!(classify(409), Recovery::Notify);
        assert_eq!(classify(422), Recovery::Notify);
    }

    #[test]
    fn pages_match_their_routes() {
        for view in [ErrorView::Forbidden, ErrorView::NotFound, ErrorView::ServerError] {
            assert!(view.path().ends_with(&view.page().code.to_string()));
            assert!(view.offers(RecoveryAction::GoHome));
        }
    }

    #[test]
    fn only_server_error_offers_retry() {
        assert!(ErrorView::ServerError.offers(RecoveryAction::Retry));
        assert!(!ErrorView::NotFound.offers(RecoveryAction::Retry));
        assert!(!ErrorView::Forbidden.offers(RecoveryAction::Retry));
    }
}
