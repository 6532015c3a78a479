use serde_json::Value;
use std::fmt;

// Raw failure shapes produced by the request transport before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    // The server answered with a non-2xx status.
    ServerError { status: u16, body: Option<Value> },
    // The request went out but nothing came back (refused, reset, timed out).
    NoResponse { reason: String },
    // The request could not be built (bad url, bad header, unreadable file).
    Construction { message: Option<String> },
}

impl TransportFailure {
    // Server-supplied `message` field, when the error body carries a non-empty one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportFailure::ServerError {
                body: Some(body), ..
            } => body
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.trim().is_empty()),
            _ => None,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::ServerError { status, .. } => write!(f, "server responded {status}"),
            TransportFailure::NoResponse { reason } => write!(f, "no response: {reason}"),
            TransportFailure::Construction { message } => match message {
                Some(message) => write!(f, "request construction failed: {message}"),
                None => write!(f, "request construction failed"),
            },
        }
    }
}

// Either an HTTP status or one of the symbolic transport tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Status(u16),
    NetworkError,
    RequestError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Status(status) => write!(f, "{status}"),
            ErrorCode::NetworkError => f.write_str("NETWORK_ERROR"),
            ErrorCode::RequestError => f.write_str("REQUEST_ERROR"),
        }
    }
}

// Uniform error handed back to callers for every failed request.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedError {
    pub code: ErrorCode,
    pub message: String,
    pub original_error: TransportFailure,
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for NormalizedError {}

// Failures while resolving a navigation target to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    UnknownPath(String),
    UnknownName(String),
    MalformedTarget(String),
    RedirectLoop(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::UnknownPath(path) => write!(f, "no route matches path {path}"),
            RouteError::UnknownName(name) => write!(f, "no route named {name}"),
            RouteError::MalformedTarget(target) => write!(f, "malformed navigation target {target}"),
            RouteError::RedirectLoop(target) => write!(f, "too many guard redirects reaching {target}"),
        }
    }
}

impl std::error::Error for RouteError {}
