//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyConfig.upstream
//!     → target.rs (parse once into UpstreamTarget)
//!     → client.rs (shared reqwest client, per-request fetch under deadline)
//!     → FetchedResponse (status, content-type, cache-control, body)
//! ```

pub mod client;
pub mod target;

pub use client::{is_html, FetchedBody, FetchedResponse, UpstreamClient};
pub use target::{TargetError, UpstreamTarget};
