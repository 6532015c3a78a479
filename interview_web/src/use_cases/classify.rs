use crate::domain::{
    Browser, ErrorCode, NormalizedError, SessionStore, TOKEN_KEY, Toast, ToastSink, ToastVariant,
    TransportFailure, USERNAME_KEY,
};
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/";
pub const TOAST_TITLE: &str = "Request failed";

pub const MSG_BAD_REQUEST: &str = "bad request parameters";
pub const MSG_UNAUTHORIZED: &str = "unauthorized, please log in again";
pub const MSG_FORBIDDEN: &str = "access denied";
pub const MSG_NOT_FOUND: &str = "resource not found";
pub const MSG_INTERNAL: &str = "internal server error";
pub const MSG_BAD_GATEWAY: &str = "gateway error";
pub const MSG_UNAVAILABLE: &str = "service unavailable";
pub const MSG_NETWORK: &str = "network connection failed, please check your network settings";
pub const MSG_REQUEST_CONFIG: &str = "request configuration error";

// Total mapping from a raw failure to its code and user-facing message.
pub fn classify(failure: &TransportFailure) -> (ErrorCode, String) {
    match failure {
        TransportFailure::ServerError { status, .. } => {
            let server_message = failure.server_message();
            let message = match status {
                400 => server_message.unwrap_or(MSG_BAD_REQUEST).to_string(),
                401 => MSG_UNAUTHORIZED.to_string(),
                403 => MSG_FORBIDDEN.to_string(),
                404 => MSG_NOT_FOUND.to_string(),
                500 => MSG_INTERNAL.to_string(),
                502 => MSG_BAD_GATEWAY.to_string(),
                503 => MSG_UNAVAILABLE.to_string(),
                other => server_message
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("request failed ({other})")),
            };
            (ErrorCode::Status(*status), message)
        }
        TransportFailure::NoResponse { .. } => (ErrorCode::NetworkError, MSG_NETWORK.to_string()),
        TransportFailure::Construction { message } => (
            ErrorCode::RequestError,
            message
                .as_deref()
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(MSG_REQUEST_CONFIG)
                .to_string(),
        ),
    }
}

// Classifies transport failures and runs the user-visible side effects.
#[derive(Clone)]
pub struct ErrorClassifier {
    store: Arc<dyn SessionStore>,
    browser: Arc<dyn Browser>,
    toasts: Option<Arc<dyn ToastSink>>,
}

impl ErrorClassifier {
    pub fn new(
        store: Arc<dyn SessionStore>,
        browser: Arc<dyn Browser>,
        toasts: Option<Arc<dyn ToastSink>>,
    ) -> Self {
        Self {
            store,
            browser,
            toasts,
        }
    }

    // Side effects complete before the error is returned to the caller.
    pub fn handle(&self, failure: TransportFailure) -> NormalizedError {
        let (code, message) = classify(&failure);

        if code == ErrorCode::Status(401) {
            self.clear_session_and_redirect();
        }

        tracing::warn!(code = %code, message = %message, cause = %failure, "request failed");
        self.notify(&message);

        NormalizedError {
            code,
            message,
            original_error: failure,
        }
    }

    fn clear_session_and_redirect(&self) {
        // Both removals are no-ops when a concurrent 401 already cleared them.
        let token_removed = self.store.remove(TOKEN_KEY);
        let username_removed = self.store.remove(USERNAME_KEY);
        tracing::info!(token_removed, username_removed, "session cleared after 401");

        if self.browser.current_path() != LOGIN_PATH {
            self.browser.navigate(LOGIN_PATH);
        }
    }

    fn notify(&self, message: &str) {
        let Some(toasts) = &self.toasts else {
            tracing::debug!("no toast sink registered; notification dropped");
            return;
        };
        toasts.show(Toast {
            title: TOAST_TITLE.to_string(),
            description: message.to_string(),
            variant: ToastVariant::Destructive,
        });
    }
}
