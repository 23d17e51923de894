//! The fixed upstream target.

use thiserror::Error;
use url::Url;

/// Why a target URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("`{0}` is not an absolute URL")]
    NotAbsolute(String),

    #[error("scheme `{0}` is not http or https")]
    UnsupportedScheme(String),

    #[error("`{0}` has no host")]
    MissingHost(String),
}

/// The single origin a deployment proxies.
///
/// Built once from configuration and shared read-only; nothing derived from
/// a request ever replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    url: Url,
    origin: String,
}

impl UpstreamTarget {
    /// Parse an absolute http(s) URL.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let url = Url::parse(input).map_err(|_| TargetError::NotAbsolute(input.to_string()))?;
        Self::from_url(url)
    }

    /// Wrap an already parsed URL.
    pub fn from_url(url: Url) -> Result<Self, TargetError> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(TargetError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().is_none() {
            return Err(TargetError::MissingHost(url.to_string()));
        }
        let origin = url.origin().ascii_serialization();
        Ok(Self { url, origin })
    }

    /// Full target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `scheme://host[:port]`, no trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// True when `candidate` lives on the same origin as the target.
    pub fn admits(&self, candidate: &Url) -> bool {
        candidate.origin().ascii_serialization() == self.origin
    }
}

impl std::fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_strips_path() {
        let target = UpstreamTarget::parse("https://noah.up.edu.ph/noah-studio").unwrap();
        assert_eq!(target.origin(), "https://noah.up.edu.ph");
        assert_eq!(target.url().as_str(), "https://noah.up.edu.ph/noah-studio");
    }

    #[test]
    fn origin_keeps_non_default_port() {
        let target = UpstreamTarget::parse("http://127.0.0.1:8081/a/b.html").unwrap();
        assert_eq!(target.origin(), "http://127.0.0.1:8081");
    }

    #[test]
    fn rejects_non_http_targets() {
        assert_eq!(
            UpstreamTarget::parse("ftp://example.com/file"),
            Err(TargetError::UnsupportedScheme("ftp".into()))
        );
        assert!(matches!(
            UpstreamTarget::parse("/relative/path"),
            Err(TargetError::NotAbsolute(_))
        ));
    }

    #[test]
    fn admits_same_origin_only() {
        let target = UpstreamTarget::parse("https://example.com/docs/").unwrap();
        assert!(target.admits(&Url::parse("https://example.com/img/a.png").unwrap()));
        assert!(target.admits(&Url::parse("https://EXAMPLE.com:443/x").unwrap()));
        assert!(!target.admits(&Url::parse("http://example.com/x").unwrap()));
        assert!(!target.admits(&Url::parse("https://example.com.evil.net/x").unwrap()));
    }
}
