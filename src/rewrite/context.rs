//! Reference resolution against the proxied document.

use url::Url;

/// Path of the proxy endpoint every rewritten reference points at.
pub const PROXY_ENDPOINT: &str = "/api/proxy";

const PROXIED_PREFIX: &str = "/api/proxy?url=";

/// Per-request view of the upstream document used by every rewrite stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteContext {
    origin: String,
    document_base: String,
}

impl RewriteContext {
    /// Derive the context from the URL the document was fetched from.
    pub fn new(document: &Url) -> Self {
        let origin = document.origin().ascii_serialization();

        let mut href = document.clone();
        href.set_query(None);
        href.set_fragment(None);
        let href = href.as_str();
        let document_base = match href.rfind('/') {
            Some(idx) if idx >= origin.len() => href[..=idx].to_string(),
            _ => format!("{}/", origin),
        };

        Self {
            origin,
            document_base,
        }
    }

    /// `scheme://host[:port]` of the document.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Document URL with its last path segment removed, ending in `/`.
    pub fn document_base(&self) -> &str {
        &self.document_base
    }

    /// Resolve a non-absolute reference.
    ///
    /// `/x` and `./x` both resolve against the origin; anything else is
    /// relative to the document base.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.starts_with("./") {
            format!("{}{}", self.origin, &reference[1..])
        } else if reference.starts_with('/') {
            format!("{}{}", self.origin, reference)
        } else {
            format!("{}{}", self.document_base, reference)
        }
    }

    /// Proxy-relative form of an absolute URL.
    pub fn proxied(&self, absolute: &str) -> String {
        format!("{}{}", PROXIED_PREFIX, urlencoding::encode(absolute))
    }

    /// True when `value` is an absolute URL on this document's origin.
    ///
    /// Literal prefix match on the origin, requiring the origin to end at a
    /// path, query, or fragment boundary.
    pub fn is_same_origin(&self, value: &str) -> bool {
        if !starts_with_ignore_case(value, &self.origin) {
            return false;
        }
        matches!(value.as_bytes().get(self.origin.len()), None | Some(b'/' | b'?' | b'#'))
    }

    /// Rewrite a `src`/`href` value, or `None` to leave it untouched.
    pub fn rewrite_reference(&self, value: &str) -> Option<String> {
        let value = value.trim_matches(|c: char| c.is_ascii_whitespace());
        if value.is_empty()
            || value.starts_with('#')
            || starts_with_ignore_case(value, "data:")
            || is_proxied(value)
        {
            return None;
        }

        if is_absolute_http(value) {
            return self.is_same_origin(value).then(|| self.proxied(value));
        }

        Some(self.proxied(&self.resolve(value)))
    }
}

/// True when `value` already points at the proxy endpoint.
pub fn is_proxied(value: &str) -> bool {
    value.starts_with(PROXIED_PREFIX)
}

/// `http://` or `https://`, any case.
pub fn is_absolute_http(value: &str) -> bool {
    starts_with_ignore_case(value, "http://") || starts_with_ignore_case(value, "https://")
}

pub(crate) fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
