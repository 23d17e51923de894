//! HTML rewriting pipeline.
//!
//! # Stages
//! ```text
//! fetched HTML
//!     → head: <base href=origin> + viewport meta after the first <head>
//!     → src/href: relative → resolved → /api/proxy?url=…
//!     → src/href: absolute on the upstream origin → /api/proxy?url=…
//!     → srcset: every candidate URL proxied, descriptors kept
//!     → sizing script before the first </body>, else at document end
//!     → <meta http-equiv> CSP / X-Frame-Options removed
//! ```
//!
//! # Design Decisions
//! - One pass of a tolerant streaming tokenizer (lol_html) over the buffered
//!   document instead of regexes over raw text: attribute-looking text inside
//!   inline scripts and styles is never touched
//! - Attribute names ending in `src`/`href` count as references (`data-src`,
//!   `xlink:href`); names ending in `srcset` use candidate rules
//! - Inserted markup is never itself rewritten

pub mod context;
pub mod embedding;
pub mod inject;
pub mod srcset;

use std::cell::Cell;
use std::rc::Rc;

use lol_html::errors::RewritingError;
use lol_html::html_content::ContentType;
use lol_html::{element, end, rewrite_str, EndTagHandler, RewriteStrSettings};

pub use context::{RewriteContext, PROXY_ENDPOINT};
pub use embedding::blocks_embedding;
pub use inject::{head_injection, sizing_script};
pub use srcset::rewrite_srcset;

/// Compute new values for the reference-bearing attributes of one element.
///
/// Takes `(name, value)` pairs as found in the markup, character references
/// included, and returns only the pairs whose value changes. Values are
/// entity-decoded before they are resolved and percent-encoded.
pub fn reference_updates<I>(attributes: I, ctx: &RewriteContext) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    attributes
        .into_iter()
        .filter_map(|(name, raw)| {
            let name_lc = name.to_ascii_lowercase();
            let value = html_escape::decode_html_entities(&raw);
            let rewritten = if name_lc.ends_with("srcset") {
                Some(rewrite_srcset(&value, ctx)).filter(|v| *v != value)
            } else if name_lc.ends_with("src") || name_lc.ends_with("href") {
                ctx.rewrite_reference(&value)
            } else {
                None
            };
            rewritten.map(|v| (name, v))
        })
        .collect()
}

/// Run the whole pipeline over a buffered HTML document.
pub fn rewrite_document(html: &str, ctx: &RewriteContext) -> Result<String, RewritingError> {
    let head_markup = head_injection(ctx.origin());
    let head_injected = Cell::new(false);
    let body_seen = Cell::new(false);
    let script_placed = Rc::new(Cell::new(false));
    let placed_at_end = Rc::clone(&script_placed);

    let element_content_handlers = vec![
        element!("meta[http-equiv]", |el| {
            if el
                .get_attribute("http-equiv")
                .is_some_and(|value| blocks_embedding(&value))
            {
                el.remove();
            }
            Ok(())
        }),
        element!("head", |el| {
            if !head_injected.replace(true) {
                el.prepend(&head_markup, ContentType::Html);
            }
            Ok(())
        }),
        element!("*", |el| {
            let attributes = el
                .attributes()
                .iter()
                .map(|attr| (attr.name(), attr.value()))
                .collect::<Vec<_>>();
            for (name, value) in reference_updates(attributes, ctx) {
                el.set_attribute(&name, &value)?;
            }
            Ok(())
        }),
        element!("body", |el| {
            if body_seen.replace(true) {
                return Ok(());
            }
            let placed = Rc::clone(&script_placed);
            let handler: EndTagHandler<'static> = Box::new(move |end| {
                if !placed.replace(true) {
                    end.before(sizing_script(), ContentType::Html);
                }
                Ok(())
            });
            if let Some(handlers) = el.end_tag_handlers() {
                handlers.push(handler);
            }
            Ok(())
        }),
    ];

    let document_content_handlers = vec![end!(|end| {
        if !placed_at_end.replace(true) {
            end.append(sizing_script(), ContentType::Html);
        }
        Ok(())
    })];

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers,
            document_content_handlers,
            strict: false,
            ..RewriteStrSettings::default()
        },
    )
}
