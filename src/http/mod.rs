//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Browser request
//!     → server.rs (Axum setup, request ID, tracing, timeout, body limit)
//!     → routes.rs / pages.rs (capture headers, params, query, body)
//!     → gateway.rs
//!         → target.rs   (backend URL)
//!         → cookies.rs  (session relay)
//!         → body.rs     (payload shaping)
//!         → invoker.rs  (one upstream call)
//!     → response.rs (relay or fallback envelope)
//!     → Send to browser
//! ```

pub mod body;
pub mod cookies;
pub mod error;
pub mod gateway;
pub mod invoker;
pub mod pages;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;
pub mod target;

pub use error::GatewayError;
pub use gateway::Gateway;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
