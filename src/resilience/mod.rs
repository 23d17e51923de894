//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (deadline over connect, headers and body)
//!     → on expiry: ProxyError::Timeout → 504 Gateway Timeout
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; the upstream fetch always has a deadline
//! - No retries: a failed fetch is reported once, as it happened

pub mod timeouts;

pub use timeouts::with_deadline;
