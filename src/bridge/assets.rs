//! Browser-side assets: the host page and the bridge script it loads.
//!
//! Both are templates filled with the protocol constants so the script the
//! browser runs always agrees with the Rust side.

use super::layout::{LayoutPolicy, NATIVE_MIN_HEIGHT};
use super::protocol::{LOAD_REQUEST_DELAYS_MS, RESIZE_DEBOUNCE_MS, SIZE_REPORT, SIZE_REQUEST};
use crate::rewrite::PROXY_ENDPOINT;

/// Path the host page loads the bridge script from.
pub const BRIDGE_SCRIPT_PATH: &str = "/js/iframe-handler.js";

const HOST_PAGE_TEMPLATE: &str = include_str!("../../assets/index.html");
const HANDLER_TEMPLATE: &str = include_str!("../../assets/iframe-handler.js");

/// Replace every `{{key}}` in `template`.
pub(crate) fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    })
}

/// Comma-separated list for a JS array literal.
pub(crate) fn js_list(values: &[u64]) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Rendered host page and bridge script for one layout policy.
#[derive(Debug, Clone)]
pub struct BridgeAssets {
    host_page: String,
    handler_script: String,
}

impl BridgeAssets {
    pub fn render(mode: LayoutPolicy) -> Self {
        let min_height = NATIVE_MIN_HEIGHT.to_string();
        let load_delays = js_list(&LOAD_REQUEST_DELAYS_MS);
        let debounce = RESIZE_DEBOUNCE_MS.to_string();

        let host_page = render_template(
            HOST_PAGE_TEMPLATE,
            &[
                ("native_min_height", min_height.as_str()),
                ("proxy_endpoint", PROXY_ENDPOINT),
                ("script_path", BRIDGE_SCRIPT_PATH),
            ],
        );
        let handler_script = render_template(
            HANDLER_TEMPLATE,
            &[
                ("mode", mode.as_str()),
                ("size_report", SIZE_REPORT),
                ("size_request", SIZE_REQUEST),
                ("native_min_height", min_height.as_str()),
                ("load_delays", load_delays.as_str()),
                ("resize_debounce", debounce.as_str()),
            ],
        );

        Self {
            host_page,
            handler_script,
        }
    }

    pub fn host_page(&self) -> &str {
        &self.host_page
    }

    pub fn handler_script(&self) -> &str {
        &self.handler_script
    }
}
