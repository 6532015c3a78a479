// Interface adapters: HTTP transport, API facade, route table and host-side ports.

pub mod api;
pub mod browser;
pub mod http;
pub mod notify;
pub mod routes;
pub mod storage;
