//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http + upstream produce:
//!     → logging.rs (structured log events, request ID on every line)
//!     → metrics.rs (request counter and latency histogram)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_tracing;
pub use metrics::init_metrics;
