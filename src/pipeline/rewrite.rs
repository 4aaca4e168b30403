//! URL rewrite rules.
//!
//! [`rewrite_url`] decides, for one `href`/`src` value, whether and how it
//! moves to the `/documents/d/{secretaria}/{slug}{-ext}` scheme.
//!
//! ## Rule Order
//!
//! First match wins:
//!
//! 1. **Excepted host** — `info.saude.df.gov.br` and
//!    `amamentabrasilia.saude.df.gov.br` are never touched, not even
//!    relativized.
//! 2. **Relativize** — absolute `*.df.gov.br` URL, only with
//!    `relativize_links`; keeps path and query.
//! 3. **Document** — `/documents/` link with a dotted file segment.
//! 4. **Asset** — `/wp-content/` or `/wp-conteudo` link with a dotted file
//!    segment.
//! 5. **Unchanged**.
//!
//! A `/documents/` link without a file segment falls through to rule 4.
//!
//! Rewritten document paths end in `-ext` with no dot, so feeding them back
//! through the rules leaves them unchanged.

use super::normalize::normalize_special_chars;
use super::segment::{
    adjust_file_name, extract_file_name, get_extension, remove_url_params, strip_extension,
};
use crate::config::RewriteOptions;
use crate::trace::TraceLog;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Internal domain suffix eligible for relativization.
pub const INTERNAL_DOMAIN: &str = ".df.gov.br";

/// Hosts whose links are kept verbatim.
pub const EXCEPTED_HOSTS: &[&str] = &["info.saude.df.gov.br", "amamentabrasilia.saude.df.gov.br"];

static RE_ABSOLUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^/]+(/.*)?").unwrap());
static RE_PLUS_OR_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+\s]").unwrap());

/// The rule that produced a rewrite decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteRule {
    Relativized,
    Excepted,
    Document,
    Asset,
    Unchanged,
}

/// Outcome of [`classify_and_rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub url: String,
    pub rule: RewriteRule,
}

/// Slug fallback used when `normalize_special_chars` is off.
///
/// The two link families have always been treated differently here: document
/// names are lower-cased with `+`/whitespace turned into `-`, asset names are
/// left as they are. Both behaviours are observable in migrated pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    Document,
    Asset,
}

impl Fallback {
    fn apply(self, stem: &str) -> String {
        match self {
            Fallback::Document => RE_PLUS_OR_SPACE.replace_all(stem, "-").to_lowercase(),
            Fallback::Asset => stem.to_string(),
        }
    }
}

/// Rewrite one URL. Returns the input unchanged when no rule applies.
pub fn rewrite_url(original: &str, options: &RewriteOptions, trace: &mut TraceLog) -> String {
    classify_and_rewrite(original, options, trace).url
}

/// Rewrite one URL and report which rule fired.
pub fn classify_and_rewrite(
    original: &str,
    options: &RewriteOptions,
    trace: &mut TraceLog,
) -> Rewritten {
    trace.record("normalize-url-input", original.to_string());

    if EXCEPTED_HOSTS.iter().any(|host| original.contains(host)) {
        return Rewritten {
            url: trace.record("normalize-url-excepted", original.to_string()),
            rule: RewriteRule::Excepted,
        };
    }

    if options.relativize_links {
        if let Some(path) = relativize(original) {
            return Rewritten {
                url: trace.record("normalize-url-relativized", path),
                rule: RewriteRule::Relativized,
            };
        }
    }

    if original.contains("/documents/") {
        if let Some(url) = rebase(original, options, Fallback::Document, trace) {
            return Rewritten {
                url: trace.record("normalize-url-document", url),
                rule: RewriteRule::Document,
            };
        }
    }

    if original.contains("/wp-content/") || original.contains("/wp-conteudo") {
        if let Some(url) = rebase(original, options, Fallback::Asset, trace) {
            return Rewritten {
                url: trace.record("normalize-url-asset", url),
                rule: RewriteRule::Asset,
            };
        }
    }

    Rewritten {
        url: trace.record("normalize-url-unchanged", original.to_string()),
        rule: RewriteRule::Unchanged,
    }
}

/// Path-and-query remainder of an absolute internal URL.
fn relativize(url: &str) -> Option<String> {
    if !url.starts_with("http") || !url.contains(INTERNAL_DOMAIN) {
        return None;
    }
    RE_ABSOLUTE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

/// Move a file link under `/documents/d/{secretaria}/`.
///
/// `None` when the URL has no dotted file segment.
fn rebase(
    original: &str,
    options: &RewriteOptions,
    fallback: Fallback,
    trace: &mut TraceLog,
) -> Option<String> {
    let clean = remove_url_params(original, trace);
    let file_name = extract_file_name(&clean, trace);
    if file_name.is_empty() {
        return None;
    }

    let extension = get_extension(&file_name, trace);
    let stem = strip_extension(&file_name);

    let name = if options.normalize_special_chars {
        normalize_special_chars(stem, trace)
    } else {
        fallback.apply(stem)
    };
    let name = adjust_file_name(&name.replace('.', "-"), trace);

    Some(format!(
        "/documents/d/{}/{}{}",
        options.secretaria, name, extension
    ))
}
