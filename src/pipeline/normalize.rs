//! Character normalization of percent-encoded file names.
//!
//! File names in legacy links arrive still percent-encoded
//! (`Relat%C3%B3rio+Anual`). The slug form lower-cases the name, maps each
//! encoded Latin accent to its plain ASCII letter (or drops it when it is a
//! pure diacritic/ordinal mark), turns spaces, `+` and en dashes into `-`,
//! and finally squeezes hyphen runs.
//!
//! ## Rule Order
//!
//! [`REPLACEMENTS`] is applied entry by entry, each entry replacing all of its
//! occurrences before the next entry runs. The order is part of the output
//! contract: keep new entries at the end.

use crate::trace::TraceLog;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered `(pattern, replacement)` pairs.
///
/// Patterns use lower-case hex because the input is lower-cased before the
/// table runs. Upper-case letters (`%c3%8a` = `Ê`, ...) keep their upper-case
/// replacement.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("%c3%a7", "c"),
    ("%c3%a3", "a"),
    ("%c3%b5", "o"),
    ("%c3%a1", "a"),
    ("%c3%a9", "e"),
    ("%c3%ad", "i"),
    ("%c3%b3", "o"),
    ("%c3%ba", "u"),
    ("%c3%a0", "a"),
    ("%c3%a2", "a"),
    ("%c3%aa", "e"),
    ("%c3%ae", "i"),
    ("%c3%b4", "o"),
    ("%c3%bb", "u"),
    ("%c3%b1", "n"),
    ("%c2%ba", ""),
    ("%20", "-"),
    ("%c3%8a", "E"),
    ("%c3%89", "e"),
    ("%c2%b0", ""),
    ("%c3%87", "C"),
    ("%c3%95", "O"),
    ("%c3%81", "A"),
    ("%c3%83", "A"),
    ("%c3%94", "O"),
    ("%c3%8d", "I"),
    ("%c3%93", "O"),
    ("%c2%aa", ""),
    ("%e2%80%93", "-"),
    ("%cc%81", ""),
    ("+", "-"),
];

static RE_HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Normalize a file-name stem (extension already removed) into slug form.
pub fn normalize_special_chars(text: &str, trace: &mut TraceLog) -> String {
    let mut normalized = text.to_lowercase();
    for (from, to) in REPLACEMENTS {
        if normalized.contains(from) {
            normalized = normalized.replace(from, to);
        }
    }
    let normalized = collapse_hyphens(&normalized);
    trace.record("normalize-special-chars", normalized)
}

/// Squeeze every run of two or more `-` into one.
pub fn collapse_hyphens(text: &str) -> String {
    RE_HYPHEN_RUN.replace_all(text, "-").into_owned()
}
