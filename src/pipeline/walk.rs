//! Document walk: rewrite every `href`/`src` in one streaming pass.
//!
//! lol_html visits elements in document order and re-emits every byte it is
//! not asked to change, so the output differs from the input only in the
//! rewritten attributes and the dropped `srcset`/`sizes`.
//!
//! Attribute values arrive as written in the page, entities included. The
//! rules, the records and the trace all work on the decoded value (`&amp;`
//! is `&`); the new URL is escaped again when it is written back.
//!
//! ## Per-call state
//!
//! The trace and the URL records live in a [`WalkContext`] created inside
//! [`process_html`] and consumed when it returns. Nothing is kept between
//! calls, so one set of options can be shared by any number of concurrent
//! walks.

use super::rewrite::{classify_and_rewrite, RewriteRule};
use crate::config::RewriteOptions;
use crate::error::MigrateError;
use crate::output::{RewriteOutput, UrlRecord};
use crate::trace::TraceLog;
use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use lol_html::{element, HtmlRewriter, Settings};
use std::cell::RefCell;
use tracing::{debug, info};

/// Responsive-image attributes that would keep pointing at the old files.
const DROPPED_ATTRIBUTES: &[&str] = &["srcset", "sizes"];

#[derive(Default)]
struct WalkContext {
    trace: TraceLog,
    records: Vec<UrlRecord>,
}

impl WalkContext {
    fn into_output(self, html: String) -> RewriteOutput {
        RewriteOutput {
            html,
            trace: self.trace.to_text(),
            urls_normalized: self.records.len(),
            urls_processed: self.records,
        }
    }
}

fn decode_attribute(raw: String) -> String {
    decode_html_entities(&raw).into_owned()
}

/// Rewrite all link and image URLs of `html` according to `options`.
///
/// For each element the URL is read from `href`, or from `src` when there is
/// no `href`; an empty value skips the element. When the rewritten URL
/// differs, it replaces every one of the two attributes that held the
/// original value and one [`UrlRecord`] is appended. `srcset` and `sizes` are
/// removed from every element.
///
/// Empty input returns an empty output without running the rewriter.
pub fn process_html(html: &str, options: &RewriteOptions) -> Result<RewriteOutput, MigrateError> {
    if html.is_empty() {
        return Ok(RewriteOutput::default());
    }

    let context = RefCell::new(WalkContext::default());
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("*", |el| {
                let href = el.get_attribute("href").map(decode_attribute);
                let src = el.get_attribute("src").map(decode_attribute);

                let value = href.as_deref().or(src.as_deref());
                if let Some(original) = value.filter(|u| !u.is_empty()) {
                    let mut ctx = context.borrow_mut();
                    let rewritten = classify_and_rewrite(original, options, &mut ctx.trace);

                    if rewritten.rule != RewriteRule::Unchanged && rewritten.url != original {
                        debug!(
                            "{:?}: {} -> {}",
                            rewritten.rule, original, rewritten.url
                        );
                        let escaped = encode_double_quoted_attribute(&rewritten.url);
                        if href.as_deref() == Some(original) {
                            el.set_attribute("href", &escaped)?;
                        }
                        if src.as_deref() == Some(original) {
                            el.set_attribute("src", &escaped)?;
                        }
                        ctx.records.push(UrlRecord {
                            original: original.to_string(),
                            rewritten: rewritten.url,
                        });
                    }
                }

                for name in DROPPED_ATTRIBUTES {
                    if el.has_attribute(name) {
                        el.remove_attribute(name);
                    }
                }
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| MigrateError::RewriteFailed(e.to_string()))?;
    rewriter
        .end()
        .map_err(|e| MigrateError::RewriteFailed(e.to_string()))?;

    let html = String::from_utf8(output)
        .map_err(|e| MigrateError::RewriteFailed(format!("rewritten HTML is not UTF-8: {e}")))?;
    let result = context.into_inner().into_output(html);

    info!(
        "Rewrote {} URL(s) for secretaria '{}'",
        result.urls_normalized, options.secretaria
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(normalize: bool, relativize: bool) -> RewriteOptions {
        RewriteOptions::builder()
            .secretaria("saude")
            .normalize_special_chars(normalize)
            .relativize_links(relativize)
            .build()
            .unwrap()
    }

    #[test]
    fn document_link_rewritten_in_place() {
        let out = process_html(
            r#"<a href="/documents/37101/0/529%C2%AA+RE.pdf/abc">x</a>"#,
            &opts(true, false),
        )
        .unwrap();
        assert_eq!(out.html, r#"<a href="/documents/d/saude/529-re-pdf">x</a>"#);
        assert_eq!(out.urls_normalized, 1);
        assert_eq!(out.urls_processed.len(), 1);
        assert_eq!(
            out.urls_processed[0].original,
            "/documents/37101/0/529%C2%AA+RE.pdf/abc"
        );
    }

    #[test]
    fn image_src_relativized() {
        let out = process_html(r#"<img src="http://x.df.gov.br/a/b.png">"#, &opts(false, true)).unwrap();
        assert_eq!(out.html, r#"<img src="/a/b.png">"#);
        assert_eq!(out.urls_normalized, 1);
    }

    #[test]
    fn excepted_host_not_counted() {
        let html = r#"<a href="https://info.saude.df.gov.br/x.pdf">info</a>"#;
        let out = process_html(html, &opts(true, true)).unwrap();
        assert_eq!(out.html, html);
        assert_eq!(out.urls_normalized, 0);
        assert!(out.urls_processed.is_empty());
        assert!(out.trace.contains("normalize-url-excepted"));
    }

    #[test]
    fn srcset_and_sizes_always_removed() {
        let html = r#"<img src="/logo.png" srcset="/logo-2x.png 2x" sizes="100vw" alt="logo">"#;
        let out = process_html(html, &opts(false, false)).unwrap();
        assert_eq!(out.html, r#"<img src="/logo.png" alt="logo">"#);
        assert_eq!(out.urls_normalized, 0);
    }

    #[test]
    fn href_preferred_and_src_written_only_when_equal() {
        let html = r#"<x-link href="/wp-content/a.png" src="/wp-content/b.png"></x-link>"#;
        let out = process_html(html, &opts(false, false)).unwrap();
        assert_eq!(
            out.html,
            r#"<x-link href="/documents/d/saude/a-png" src="/wp-content/b.png"></x-link>"#
        );
        assert_eq!(out.urls_normalized, 1);
    }

    #[test]
    fn same_value_in_both_attributes_rewritten_once() {
        let html = r#"<x-link href="/wp-content/a.png" src="/wp-content/a.png"></x-link>"#;
        let out = process_html(html, &opts(false, false)).unwrap();
        assert!(out.html.contains(r#"href="/documents/d/saude/a-png""#));
        assert!(out.html.contains(r#"src="/documents/d/saude/a-png""#));
        assert_eq!(out.urls_normalized, 1);
    }

    #[test]
    fn records_follow_document_order() {
        let html = r#"
            <p><a href="/documents/1/0/b.pdf">b</a></p>
            <img src="/wp-content/uploads/a.jpg">
            <a href="/contato">contato</a>
            <a href="/documents/2/0/c.doc">c</a>"#;
        let out = process_html(html, &opts(false, false)).unwrap();
        let rewritten: Vec<_> = out.urls_processed.iter().map(|r| r.rewritten.as_str()).collect();
        assert_eq!(
            rewritten,
            [
                "/documents/d/saude/b-pdf",
                "/documents/d/saude/a-jpg",
                "/documents/d/saude/c-doc",
            ]
        );
        assert_eq!(out.urls_normalized, out.urls_processed.len());
        assert!(out.html.contains(r#"<a href="/contato">contato</a>"#));
    }

    #[test]
    fn untouched_markup_is_preserved() {
        let html = "<!-- nav -->\n<div class=\"a\"  id=b><span>Olá</span></div>";
        let out = process_html(html, &opts(true, true)).unwrap();
        assert_eq!(out.html, html);
    }

    #[test]
    fn empty_href_skipped() {
        let out = process_html(r#"<a href="">vazio</a>"#, &opts(true, true)).unwrap();
        assert_eq!(out.urls_normalized, 0);
        assert!(out.trace.is_empty());
    }

    #[test]
    fn empty_href_skips_element_even_with_src() {
        let html = r#"<img href="" src="/wp-content/uploads/a.jpg">"#;
        let out = process_html(html, &opts(false, false)).unwrap();
        assert_eq!(out.html, html);
        assert_eq!(out.urls_normalized, 0);
        assert!(out.trace.is_empty());
    }

    #[test]
    fn src_used_when_href_absent() {
        let out = process_html(r#"<img src="/wp-content/uploads/a.jpg">"#, &opts(false, false)).unwrap();
        assert_eq!(out.html, r#"<img src="/documents/d/saude/a-jpg">"#);
        assert_eq!(out.urls_normalized, 1);
    }

    #[test]
    fn entities_decoded_for_rules_and_records() {
        let html = r#"<a href="https://www.saude.df.gov.br/busca?a=1&amp;b=2">busca</a>"#;
        let out = process_html(html, &opts(false, true)).unwrap();
        assert_eq!(
            out.urls_processed,
            [UrlRecord {
                original: "https://www.saude.df.gov.br/busca?a=1&b=2".into(),
                rewritten: "/busca?a=1&b=2".into(),
            }]
        );
        assert!(out.trace.contains("normalize-url-relativized: /busca?a=1&b=2\n"));
        assert_eq!(out.html, r#"<a href="/busca?a=1&amp;b=2">busca</a>"#);
    }

    #[test]
    fn entities_in_document_names_are_escaped_on_write_back() {
        let html = r#"<a href="/documents/1/0/Ata&amp;Edital.pdf">ata</a>"#;
        let out = process_html(html, &opts(false, false)).unwrap();
        assert_eq!(out.urls_processed[0].rewritten, "/documents/d/saude/ata&edital-pdf");
        assert_eq!(out.html, r#"<a href="/documents/d/saude/ata&amp;edital-pdf">ata</a>"#);
    }

    #[test]
    fn empty_input_short_circuits() {
        let out = process_html("", &opts(true, true)).unwrap();
        assert!(out.html.is_empty());
        assert!(out.trace.is_empty());
        assert_eq!(out.urls_normalized, 0);
    }

    #[test]
    fn whitespace_only_input_passes_through() {
        let out = process_html("   \n", &opts(true, true)).unwrap();
        assert_eq!(out.html, "   \n");
        assert!(out.trace.is_empty());
        assert_eq!(out.urls_normalized, 0);
    }

    #[test]
    fn each_call_starts_with_a_fresh_trace() {
        let o = opts(false, false);
        let html = r#"<a href="/documents/1/0/a.pdf">a</a>"#;
        let first = process_html(html, &o).unwrap();
        let second = process_html(html, &o).unwrap();
        assert_eq!(first.trace, second.trace);
        assert_eq!(second.urls_normalized, 1);
    }
}
