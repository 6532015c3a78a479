use crate::domain::errors::NormalizedError;
use async_trait::async_trait;
use serde_json::Value;

// Storage key holding the bearer session token.
pub const TOKEN_KEY: &str = "token";
// Storage key holding the logged-in username; its presence means "authenticated".
pub const USERNAME_KEY: &str = "username";

// Port for client-side key-value storage shared by transport, classifier and guard.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    // Returns whether a value was actually removed.
    fn remove(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

// Notification shown to the user by the hosting shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

// Port for the notification sink registered by the hosting application.
pub trait ToastSink: Send + Sync {
    fn show(&self, toast: Toast);
}

// Port for the hosting shell: current location, forced navigation, document title.
pub trait Browser: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, full_path: &str);
    fn set_title(&self, title: &str);
}

// The API facade depends on this trait, not on the concrete reqwest client.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, NormalizedError>;
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, NormalizedError>;
}
