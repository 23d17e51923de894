//! Outbound fetch of the upstream document.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::error::ProxyError;
use crate::resilience::with_deadline;

/// Body of an upstream response, decoded only when it will be rewritten.
#[derive(Debug, Clone)]
pub enum FetchedBody {
    /// `text/html` content, decoded to text.
    Html(String),
    /// Anything else, untouched.
    Raw(Bytes),
}

/// One upstream response, consumed once by the handler.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// URL that was requested upstream.
    pub url: Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub body: FetchedBody,
}

/// Returns true when a declared content type should go through the rewriter.
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

/// Shared HTTP client for upstream fetches.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    timeout: Duration,
    default_user_agent: String,
}

impl UpstreamClient {
    /// Build the client from configuration.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, ProxyError> {
        let mut builder = reqwest::Client::builder().redirect(Policy::limited(upstream.max_redirects));
        if !upstream.use_env_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            timeout: Duration::from_secs(timeouts.upstream_secs),
            default_user_agent: upstream.default_user_agent.clone(),
        })
    }

    /// Upstream deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url`, forwarding `user_agent` or the configured default.
    ///
    /// Headers and body are both read under the upstream deadline.
    pub async fn fetch(
        &self,
        url: &Url,
        user_agent: Option<&str>,
    ) -> Result<FetchedResponse, ProxyError> {
        let user_agent = user_agent.unwrap_or(self.default_user_agent.as_str());

        with_deadline(self.timeout, async {
            let response = self
                .client
                .get(url.clone())
                .header(USER_AGENT, user_agent)
                .send()
                .await?;

            let status = response.status();
            let content_type = header_text(response.headers(), &CONTENT_TYPE);
            let cache_control = header_text(response.headers(), &CACHE_CONTROL);

            tracing::debug!(
                upstream = %url,
                status = %status,
                content_type = content_type.as_deref().unwrap_or(""),
                "Upstream responded"
            );

            let body = if is_html(content_type.as_deref()) {
                FetchedBody::Html(response.text().await?)
            } else {
                FetchedBody::Raw(response.bytes().await?)
            };

            Ok::<_, ProxyError>(FetchedResponse {
                url: url.clone(),
                status,
                content_type,
                cache_control,
                body,
            })
        })
        .await
    }
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
