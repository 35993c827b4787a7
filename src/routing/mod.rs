//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → axum router (http/routes.rs) picks a handler
//!     → handler names a RouteSpec from table.rs
//!     → http/gateway.rs forwards according to that spec
//! ```
//!
//! # Design Decisions
//! - Routes are static data, immutable at runtime
//! - One spec per backend endpoint; behaviour differences are fields, not code
//! - Deterministic: same spec and input always produce the same upstream call

pub mod table;

pub use table::{QueryMode, ReplyMode, RouteSpec, Verb};
