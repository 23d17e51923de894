//! `srcset` candidate rewriting.
//!
//! A candidate URL runs up to the next whitespace or comma, so `a.png,b.png`
//! is two candidates. `data:` URLs run to the next whitespace and keep their
//! inner commas. Descriptors follow up to the next comma outside parentheses.
//! Only the URL of each candidate changes; separators and descriptors are
//! copied through.

use super::context::{is_absolute_http, is_proxied, starts_with_ignore_case, RewriteContext};

/// Rewrite every candidate URL in a `srcset` value.
pub fn rewrite_srcset(value: &str, ctx: &RewriteContext) -> String {
    let mut out = String::with_capacity(value.len() * 2);
    let mut rest = value;

    loop {
        let separators = rest
            .len()
            .saturating_sub(rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',').len());
        out.push_str(&rest[..separators]);
        rest = &rest[separators..];
        if rest.is_empty() {
            break;
        }

        let url_len = if starts_with_ignore_case(rest, "data:") {
            rest.find(|c: char| c.is_ascii_whitespace())
        } else {
            rest.find(|c: char| c.is_ascii_whitespace() || c == ',')
        }
        .unwrap_or(rest.len());
        let url = rest[..url_len].trim_end_matches(',');
        out.push_str(&rewrite_candidate(url, ctx));
        rest = &rest[url.len()..];

        let descriptors = descriptor_len(rest);
        out.push_str(&rest[..descriptors]);
        rest = &rest[descriptors..];
    }

    out
}

fn descriptor_len(rest: &str) -> usize {
    let mut depth = 0usize;
    for (idx, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return idx,
            _ => {}
        }
    }
    rest.len()
}

// Absolute candidates are proxied whatever their origin.
fn rewrite_candidate(url: &str, ctx: &RewriteContext) -> String {
    if is_proxied(url) || starts_with_ignore_case(url, "data:") {
        url.to_string()
    } else if is_absolute_http(url) {
        ctx.proxied(url)
    } else {
        ctx.proxied(&ctx.resolve(url))
    }
}
