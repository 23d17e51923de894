//! Fitting the iframe to reported content sizes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::protocol::{SizeReport, LOAD_REQUEST_DELAYS_MS, RESIZE_DEBOUNCE_MS};

/// Minimum iframe height in native mode, in CSS pixels.
pub const NATIVE_MIN_HEIGHT: f64 = 300.0;

/// How reported sizes are applied to the iframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Shrink the content to the container width, never enlarge.
    #[default]
    Scale,
    /// Render 1:1 and grow the iframe to the content height.
    Native,
}

impl LayoutPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutPolicy::Scale => "scale",
            LayoutPolicy::Native => "native",
        }
    }

    /// Compute the iframe layout for a report inside a container.
    pub fn layout(self, report: SizeReport, container_width: f64) -> FrameLayout {
        match self {
            LayoutPolicy::Scale => {
                let scale = (container_width / report.width).min(1.0);
                FrameLayout {
                    scale: Some(scale),
                    height_px: report.height * scale,
                }
            }
            LayoutPolicy::Native => FrameLayout {
                scale: None,
                height_px: report.height.max(NATIVE_MIN_HEIGHT),
            },
        }
    }
}

/// Styles applied to the iframe for one report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    /// Scale transform (top-center origin), or none for native rendering.
    pub scale: Option<f64>,
    pub height_px: f64,
}

impl FrameLayout {
    /// CSS `transform` value, empty when unscaled.
    pub fn transform(&self) -> String {
        self.scale.map(|s| format!("scale({})", s)).unwrap_or_default()
    }

    /// CSS `transform-origin` value, empty when unscaled.
    pub fn transform_origin(&self) -> &'static str {
        if self.scale.is_some() {
            "top center"
        } else {
            ""
        }
    }
}

/// Trailing-edge debounce on a millisecond clock.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Restart the quiet period at `now_ms`.
    pub fn trigger(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// True once, when the quiet period has elapsed.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now_ms => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Where the bridge stands with one iframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizerState {
    Idle,
    /// A size request went out and no report has arrived since.
    AwaitingReport,
    Synced,
}

/// Host-side controller for one iframe.
///
/// Driven by explicit events and a millisecond clock; `poll` returns how
/// many `request-size` messages are due.
#[derive(Debug, Clone)]
pub struct FrameSizer {
    policy: LayoutPolicy,
    state: SizerState,
    layout: Option<FrameLayout>,
    scheduled: Vec<u64>,
    resize: Debounce,
}

impl FrameSizer {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self {
            policy,
            state: SizerState::Idle,
            layout: None,
            scheduled: Vec::new(),
            resize: Debounce::new(RESIZE_DEBOUNCE_MS),
        }
    }

    pub fn state(&self) -> SizerState {
        self.state
    }

    /// Layout currently applied, if any report has been accepted.
    pub fn layout(&self) -> Option<FrameLayout> {
        self.layout
    }

    /// The iframe fired `load`.
    pub fn on_load(&mut self, now_ms: u64) {
        self.scheduled
            .extend(LOAD_REQUEST_DELAYS_MS.iter().map(|delay| now_ms + delay));
    }

    /// The host window was resized.
    pub fn on_resize(&mut self, now_ms: u64) {
        self.resize.trigger(now_ms);
    }

    /// Number of size requests to send at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> usize {
        let before = self.scheduled.len();
        self.scheduled.retain(|due| *due > now_ms);
        let mut due = before - self.scheduled.len();
        if self.resize.fire(now_ms) {
            due += 1;
        }
        if due > 0 {
            self.state = SizerState::AwaitingReport;
        }
        due
    }

    /// Handle any incoming window message.
    ///
    /// Returns the new layout when the message was a usable size report;
    /// everything else leaves the state untouched.
    pub fn on_message(&mut self, message: &Value, container_width: f64) -> Option<FrameLayout> {
        let report = SizeReport::from_message(message)?;
        let layout = self.policy.layout(report, container_width);
        self.layout = Some(layout);
        self.state = SizerState::Synced;
        Some(layout)
    }
}
