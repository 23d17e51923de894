//! Response construction.
//!
//! # Responsibilities
//! - Rewritten HTML: 200 with a fixed UTF-8 HTML content type
//! - Everything else: upstream status, content type and cache control, raw body
//! - Map proxy errors to status codes with a plain-text description

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ProxyError;

/// Content type of every rewritten document.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Which path a proxied response took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Html,
    Passthrough,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Html => "html",
            ResponseKind::Passthrough => "passthrough",
        }
    }
}

/// A rewritten document.
pub fn html_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response()
}

/// An upstream resource forwarded unchanged.
///
/// Only `content-type` and `cache-control` survive from the upstream headers.
pub fn passthrough_response(
    status: StatusCode,
    content_type: Option<&str>,
    cache_control: Option<&str>,
    body: Bytes,
) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Some(value) = content_type.and_then(|v| HeaderValue::from_str(v).ok()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Some(value) = cache_control.and_then(|v| HeaderValue::from_str(v).ok()) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    response
}

impl ProxyError {
    /// Status returned to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::InvalidTarget(_) | ProxyError::ForeignTarget(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) | ProxyError::Rewrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Proxy error: {}", self),
        )
            .into_response()
    }
}
