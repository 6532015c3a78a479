pub mod errors;
pub mod ports;
pub mod routes;

// Re-export the domain boundary types and ports.
pub use errors::{ErrorCode, NormalizedError, RouteError, TransportFailure};
pub use ports::{
    ApiTransport, Browser, SessionStore, TOKEN_KEY, Toast, ToastSink, ToastVariant, USERNAME_KEY,
};
pub use routes::{Layout, NavigationTarget, Resolution, RouteDescriptor, RouteMeta, ViewKey};
