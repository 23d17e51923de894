//! Window-message protocol between the embedded document and the host page.
//!
//! Messages are fire-and-forget and uncorrelated: a request may be answered
//! zero, one or several times, and reports may arrive unsolicited.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `type` of the message the embedded document posts to its parent.
pub const SIZE_REPORT: &str = "proxied-size";

/// `type` of the message the host page posts into the iframe.
pub const SIZE_REQUEST: &str = "request-size";

/// Reported when the document measures zero width.
pub const FALLBACK_WIDTH: u32 = 1200;

/// Reported when the document measures zero height.
pub const FALLBACK_HEIGHT: u32 = 800;

/// Extra reports sent after `load` to catch late content.
pub const REPORT_RESEND_DELAYS_MS: [u64; 2] = [500, 1500];

/// Size requests sent after the iframe fires `load`.
pub const LOAD_REQUEST_DELAYS_MS: [u64; 2] = [0, 1000];

/// Quiet period after the last window resize before asking again.
pub const RESIZE_DEBOUNCE_MS: u64 = 250;

/// A message on the bridge, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    #[serde(rename = "proxied-size")]
    ProxiedSize { width: f64, height: f64 },

    #[serde(rename = "request-size")]
    RequestSize,
}

/// A usable content size reported by the embedded document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeReport {
    pub width: f64,
    pub height: f64,
}

impl SizeReport {
    /// Extract a report from an arbitrary incoming message.
    ///
    /// Anything that is not a `proxied-size` message with positive, finite
    /// numeric dimensions yields `None`.
    pub fn from_message(message: &Value) -> Option<Self> {
        match BridgeMessage::deserialize(message).ok()? {
            BridgeMessage::ProxiedSize { width, height } => Self::new(width, height),
            BridgeMessage::RequestSize => None,
        }
    }

    /// Build a report, rejecting zero, negative, or non-finite sizes.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        (usable(width) && usable(height)).then_some(Self { width, height })
    }
}
