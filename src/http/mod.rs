//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (request ID, user agent, `url` parameter)
//!     → [upstream fetch + rewrite pipeline]
//!     → response.rs (HTML or passthrough, error mapping)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ResponseKind, HTML_CONTENT_TYPE};
pub use server::{AppState, HttpServer};
