//! Sizing bridge subsystem.
//!
//! # Data Flow
//! ```text
//! host page (assets.rs)
//!     → mounts <iframe src="/api/proxy">
//!     → iframe load: request-size at 0ms and 1000ms
//!     → window resize: request-size after 250ms quiet
//!
//! proxied document (injected sizing script)
//!     → proxied-size {width, height} to parent on load, +500ms, +1500ms,
//!       on DOM mutation and on every request-size
//!
//! host page
//!     → layout.rs policy: scale (fit width) or native (grow height)
//! ```

pub mod assets;
pub mod layout;
pub mod protocol;

pub use assets::{BridgeAssets, BRIDGE_SCRIPT_PATH};
pub use layout::{Debounce, FrameLayout, FrameSizer, LayoutPolicy, SizerState};
pub use protocol::{BridgeMessage, SizeReport};
