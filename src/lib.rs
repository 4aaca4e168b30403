//! # linkmigrate
//!
//! Rewrite the links of legacy DF government pages for the
//! `/documents/d/{secretaria}/` document scheme, and optionally let an LLM add
//! `aria-label`s to the result.
//!
//! ## Why this crate?
//!
//! Pages copied out of the old WordPress and Liferay portals point at files
//! under `/wp-content/`, `/wp-conteudo` and `/documents/{id}/0/{name}.pdf/{uuid}`,
//! often with percent-encoded accents in the file names. In the new portal
//! every file lives under a flat per-department slug. Fixing those links by
//! hand is slow and error-prone; this crate applies the migration rules
//! mechanically and keeps a trace of every step.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML
//!  │
//!  ├─ 1. Walk       stream the document, visit every href / src
//!  ├─ 2. Rewrite    excepted host → relativize → /documents/ → wp-content
//!  ├─ 3. Slug       strip query, split extension, normalize accents
//!  ├─ 4. Validate   tokenizer check before and after the LLM call
//!  ├─ 5. Enhance    optional LLM pass adding aria-label to links
//!  └─ 6. Output     HTML + trace + {original, new} URL pairs
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use linkmigrate::{process_html, RewriteOptions};
//!
//! let options = RewriteOptions::builder()
//!     .secretaria("saude")
//!     .normalize_special_chars(true)
//!     .build()
//!     .unwrap();
//!
//! let out = process_html(
//!     r#"<a href="/documents/37101/0/529%C2%AA+RE.pdf/abc">529ª RE</a>"#,
//!     &options,
//! )
//! .unwrap();
//!
//! assert_eq!(out.urls_normalized, 1);
//! assert!(out.html.contains("/documents/d/saude/529-re-pdf"));
//! ```
//!
//! With the enhancement pass:
//!
//! ```rust,no_run
//! use linkmigrate::{EnhanceConfig, LlmEnhancer, Migrator, RewriteOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / ...
//!     let enhancer = LlmEnhancer::from_config(&EnhanceConfig::default())?;
//!     let migrator = Migrator::new(enhancer);
//!     let options = RewriteOptions::default();
//!     let out = migrator.migrate("<a href=\"/x.pdf\">x</a>", &options, true).await?;
//!     println!("{}", out.final_html());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `linkmigrate` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! linkmigrate = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod departments;
pub mod error;
pub mod migrate;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod trace;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{EnhanceConfig, EnhanceConfigBuilder, RewriteOptions, RewriteOptionsBuilder};
pub use departments::{find_department, Department, DepartmentRegistry, DepartmentRule, DEPARTMENTS};
pub use error::{EnhanceError, HtmlSide, MigrateError};
pub use migrate::{migrate_sync, write_html, Migrator};
pub use output::{Enhancement, MigrationOutput, RewriteOutput, UrlRecord};
pub use pipeline::llm::{Enhancer, LlmEnhancer};
pub use pipeline::rewrite::{rewrite_url, RewriteRule};
pub use pipeline::walk::process_html;
pub use trace::TraceLog;
