//! Embedding restrictions declared in markup.

/// `http-equiv` values that would stop the document rendering in a frame.
const BLOCKING_HTTP_EQUIV: [&str; 2] = ["content-security-policy", "x-frame-options"];

/// True when a `<meta http-equiv>` value must be stripped.
pub fn blocks_embedding(http_equiv: &str) -> bool {
    let value = http_equiv.trim();
    BLOCKING_HTTP_EQUIV
        .iter()
        .any(|blocked| value.eq_ignore_ascii_case(blocked))
}
