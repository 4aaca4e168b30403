//! Error types for the linkmigrate library.
//!
//! Two distinct error types reflect the two independent phases of a
//! migration:
//!
//! * [`MigrateError`] — the URL phase or its I/O could not complete (bad
//!   options, the HTML rewriter failed, the output file could not be
//!   written). The URL rules themselves never fail; every rule has a
//!   fallback branch.
//!
//! * [`EnhanceError`] — the accessibility pass failed (unparseable HTML on
//!   either side of the call, empty completion, provider error). It is
//!   reported next to the URL-phase result rather than replacing it, so a
//!   failed enhancement never costs the caller the rewritten document.
//!
//! Every [`EnhanceError`] renders as `HTML transformation failed: <reason>`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of the URL phase and of output handling.
#[derive(Debug, Error)]
pub enum MigrateError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── HTML errors ───────────────────────────────────────────────────────
    /// The streaming HTML rewriter rejected the document.
    #[error("HTML rewrite failed: {0}")]
    RewriteFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which side of the enhancement call produced unparseable HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlSide {
    /// The URL-rewritten HTML handed to the service.
    Input,
    /// The HTML the service sent back.
    Response,
}

impl fmt::Display for HtmlSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlSide::Input => f.write_str("input"),
            HtmlSide::Response => f.write_str("returned"),
        }
    }
}

/// Failure of the accessibility enhancement pass.
///
/// There is no retry: the caller sees exactly one outcome per call.
#[derive(Debug, Clone, Error)]
pub enum EnhanceError {
    /// The HTML on one side of the call is not syntactically valid.
    #[error("HTML transformation failed: {side} HTML could not be parsed: {detail}")]
    Parse { side: HtmlSide, detail: String },

    /// The service answered without any content.
    #[error("HTML transformation failed: the service returned no content")]
    EmptyResponse,

    /// The service call itself failed (network, auth, rate limit, ...).
    #[error("HTML transformation failed: {message}")]
    Service { message: String },

    /// No LLM provider could be resolved from config or environment.
    #[error("HTML transformation failed: LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhance_errors_share_the_envelope() {
        let errors = [
            EnhanceError::Parse {
                side: HtmlSide::Response,
                detail: "eof-in-tag".into(),
            },
            EnhanceError::EmptyResponse,
            EnhanceError::Service {
                message: "connection reset".into(),
            },
            EnhanceError::ProviderNotConfigured {
                provider: "auto".into(),
                hint: "set OPENAI_API_KEY".into(),
            },
        ];
        for e in errors {
            assert!(
                e.to_string().starts_with("HTML transformation failed: "),
                "got: {e}"
            );
        }
    }

    #[test]
    fn parse_error_names_the_side() {
        let e = EnhanceError::Parse {
            side: HtmlSide::Input,
            detail: "bad character".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("input HTML"), "got: {msg}");
        assert!(msg.contains("bad character"), "got: {msg}");
    }

    #[test]
    fn service_error_keeps_native_description() {
        let e = EnhanceError::Service {
            message: "HTTP 429 Too Many Requests".into(),
        };
        assert_eq!(
            e.to_string(),
            "HTML transformation failed: HTTP 429 Too Many Requests"
        );
    }

    #[test]
    fn invalid_config_display() {
        let e = MigrateError::InvalidConfig("secretaria must not be empty".into());
        assert!(e.to_string().contains("secretaria"));
    }
}
