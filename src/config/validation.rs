//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics and reports every
//! problem at once so a broken file can be fixed in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::upstream::UpstreamTarget;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("upstream.target_url: {0}")]
    TargetUrl(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error(
        "timeouts.request_secs ({request_secs}) must be greater than timeouts.upstream_secs ({upstream_secs})"
    )]
    RequestTimeoutTooShort { upstream_secs: u64, request_secs: u64 },

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(e) = UpstreamTarget::parse(&config.upstream.target_url) {
        errors.push(ValidationError::TargetUrl(e.to_string()));
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    // inbound deadline must outlast the upstream one
    if config.timeouts.upstream_secs > 0
        && config.timeouts.request_secs > 0
        && config.timeouts.request_secs <= config.timeouts.upstream_secs
    {
        errors.push(ValidationError::RequestTimeoutTooShort {
            upstream_secs: config.timeouts.upstream_secs,
            request_secs: config.timeouts.request_secs,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
