//! Markup inserted into proxied documents.

use std::sync::OnceLock;

use crate::bridge::assets::{js_list, render_template};
use crate::bridge::protocol::{
    FALLBACK_HEIGHT, FALLBACK_WIDTH, REPORT_RESEND_DELAYS_MS, SIZE_REPORT, SIZE_REQUEST,
};

const SIZING_TEMPLATE: &str = include_str!("../../assets/sizing-script.html");

/// Viewport tag placed after `<base>`.
pub const VIEWPORT_META: &str = r#"<meta name="viewport" content="width=device-width,initial-scale=1">"#;

/// `<base>` + viewport markup inserted right after the opening `<head>`.
pub fn head_injection(origin: &str) -> String {
    format!(r#"<base href="{}">{}"#, origin, VIEWPORT_META)
}

/// Script that reports the document size to the parent window.
///
/// Every step is wrapped so a failure can never surface in the page.
pub fn sizing_script() -> &'static str {
    static SCRIPT: OnceLock<String> = OnceLock::new();
    SCRIPT.get_or_init(|| {
        render_template(
            SIZING_TEMPLATE,
            &[
                ("size_report", SIZE_REPORT),
                ("size_request", SIZE_REQUEST),
                ("fallback_width", FALLBACK_WIDTH.to_string().as_str()),
                ("fallback_height", FALLBACK_HEIGHT.to_string().as_str()),
                ("resend_delays", js_list(&REPORT_RESEND_DELAYS_MS).as_str()),
            ],
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_markup_is_base_then_viewport() {
        assert_eq!(
            head_injection("https://example.com"),
            r#"<base href="https://example.com"><meta name="viewport" content="width=device-width,initial-scale=1">"#
        );
    }

    #[test]
    fn script_is_rendered_with_protocol_values() {
        let script = sizing_script();
        assert!(script.trim_start().starts_with("<script>"));
        assert!(script.trim_end().ends_with("</script>"));
        assert!(!script.contains("{{"));
        assert!(script.contains("type: 'proxied-size'"));
        assert!(script.contains("=== 'request-size'"));
        assert!(script.contains("|| 1200"));
        assert!(script.contains("|| 800"));
        assert!(script.contains("[500,1500]"));
        assert!(script.contains("subtree: true"));
    }
}
