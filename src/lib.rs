//! Authenticated gateway between the EASY marketplace frontend and its backend API.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod loaders;
pub mod observability;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
