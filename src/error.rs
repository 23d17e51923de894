//! Error kinds surfaced by the proxy endpoint.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while serving one proxied request.
///
/// Fetch and transform failures both surface as 500 with the description as
/// text; the timeout and a rejected `url` parameter carry their own status.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Network failure or malformed upstream response.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream did not answer within the configured deadline.
    #[error("upstream did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The HTML rewriter rejected the document.
    #[error("failed to rewrite document: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),

    /// A caller-supplied `url` parameter was not a usable URL.
    #[error("invalid target url: {0}")]
    InvalidTarget(String),

    /// A caller-supplied `url` parameter pointed outside the upstream origin.
    #[error("target `{0}` is outside the proxied origin")]
    ForeignTarget(String),
}
