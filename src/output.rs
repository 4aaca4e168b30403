//! Result types returned by the migration entry points.
//!
//! All types serialize with `serde`, which is what the CLI's `--json` mode
//! prints.

use serde::{Deserialize, Serialize};

/// One rewritten URL.
///
/// Serialized as `{"original": ..., "new": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub original: String,
    #[serde(rename = "new")]
    pub rewritten: String,
}

/// Result of the URL phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOutput {
    /// The document with rewritten `href`/`src` values and without
    /// `srcset`/`sizes`.
    pub html: String,

    /// Debug trace, one `label: value` line per rewrite step.
    pub trace: String,

    /// Number of URLs that changed. Always `urls_processed.len()`.
    pub urls_normalized: usize,

    /// Changed URLs in document order.
    pub urls_processed: Vec<UrlRecord>,
}

/// Outcome of the accessibility pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Enhancement {
    /// HTML returned by the service, already checked to be parseable.
    Enhanced { html: String },
    /// The rendered [`crate::error::EnhanceError`].
    Failed { error: String },
}

/// Result of [`crate::migrate::Migrator::migrate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationOutput {
    pub rewrite: RewriteOutput,

    /// `None` when enhancement was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhancement: Option<Enhancement>,
}

impl MigrationOutput {
    /// The HTML to publish: the enhanced document when the pass succeeded,
    /// otherwise the URL-rewritten one.
    pub fn final_html(&self) -> &str {
        match &self.enhancement {
            Some(Enhancement::Enhanced { html }) => html,
            _ => &self.rewrite.html,
        }
    }

    /// Error message of a failed enhancement pass.
    pub fn enhancement_error(&self) -> Option<&str> {
        match &self.enhancement {
            Some(Enhancement::Failed { error }) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(html: &str) -> RewriteOutput {
        RewriteOutput {
            html: html.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn url_record_serializes_as_new() {
        let record = UrlRecord {
            original: "/documents/1/0/a.pdf".into(),
            rewritten: "/documents/d/saude/a-pdf".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["original"], "/documents/1/0/a.pdf");
        assert_eq!(json["new"], "/documents/d/saude/a-pdf");
    }

    #[test]
    fn final_html_prefers_enhanced() {
        let out = MigrationOutput {
            rewrite: rewrite("<a href=\"/x\">x</a>"),
            enhancement: Some(Enhancement::Enhanced {
                html: "<a href=\"/x\" aria-label=\"x\">x</a>".into(),
            }),
        };
        assert!(out.final_html().contains("aria-label"));
        assert!(out.enhancement_error().is_none());
    }

    #[test]
    fn final_html_falls_back_on_failure() {
        let out = MigrationOutput {
            rewrite: rewrite("<p>ok</p>"),
            enhancement: Some(Enhancement::Failed {
                error: "HTML transformation failed: the service returned no content".into(),
            }),
        };
        assert_eq!(out.final_html(), "<p>ok</p>");
        assert!(out.enhancement_error().unwrap().starts_with("HTML transformation failed"));
    }

    #[test]
    fn enhancement_is_tagged() {
        let json = serde_json::to_value(Enhancement::Failed { error: "e".into() }).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "e");
    }

    #[test]
    fn missing_enhancement_is_omitted() {
        let out = MigrationOutput {
            rewrite: rewrite(""),
            enhancement: None,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("enhancement").is_none());
    }
}
