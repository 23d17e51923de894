//! Embedding proxy.
//!
//! Fetches one fixed upstream site and serves it from this origin so a host
//! page can show it in an iframe, with its references routed back through
//! the proxy and a sizing script reporting the document's dimensions.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────┐    ┌───────────┐    ┌──────────┐
//!     ─────────────────────▶│   http   │───▶│ upstream  │───▶│ upstream │
//!                           │  server  │    │  client   │◀───│   site   │
//!                           └────┬─────┘    └─────┬─────┘    └──────────┘
//!                                │                │ text/html?
//!                                │                ▼
//!     Client Response       ┌────┴─────┐    ┌───────────┐
//!     ◀─────────────────────│ response │◀───│  rewrite  │
//!                           └──────────┘    └───────────┘
//!
//!     Host page + bridge script (bridge) ◀──── postMessage ──── sizing script
//! ```

// Core subsystems
pub mod bridge;
pub mod config;
pub mod error;
pub mod http;
pub mod rewrite;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
