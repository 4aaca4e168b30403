//! Pipeline stages for link migration.
//!
//! Each submodule implements exactly one step, so every rule can be tested
//! without HTML or a provider around it.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌────────────── URL phase (sync) ──────────────┐
//! HTML ──▶ walk ──▶ rewrite ──▶ segment ──▶ normalize      │──▶ validate ──▶ llm ──▶ validate
//!          (lol_html) (rules)   (file name)  (slug)        │    (html5ever)   (LLM)
//!            └──────────────────────────────────────────────┘
//! ```
//!
//! 1. [`walk`]      — stream the document, feed every `href`/`src` to the
//!    rules, drop `srcset`/`sizes`
//! 2. [`rewrite`]   — pick the rule for one URL and build its new form
//! 3. [`segment`]   — query stripping, file name and extension extraction
//! 4. [`normalize`] — percent-encoded accents to ASCII slug
//! 5. [`validate`]  — tokenizer-level parse check around the LLM call
//! 6. [`llm`]       — the accessibility pass; the only stage with network I/O

pub mod llm;
pub mod normalize;
pub mod rewrite;
pub mod segment;
pub mod validate;
pub mod walk;
