//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, gateway and loaders produce:
//!     → logging.rs (structured log events, per-request spans from TraceLayer)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line and to the backend
//! - Loader fallbacks are always logged and counted

pub mod logging;
pub mod metrics;
