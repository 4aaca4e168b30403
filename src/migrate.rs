//! Migration entry points.
//!
//! A migration is two independent phases:
//!
//! 1. **URL phase**: [`Migrator::process_html`], synchronous and
//!    deterministic. Its failure is fatal ([`MigrateError`]).
//! 2. **Enhancement phase**: [`Migrator::interpret`], one awaited LLM call
//!    over the rewritten document. Its failure is reported next to the URL
//!    phase result ([`Enhancement::Failed`]) and never replaces it.
//!
//! [`Migrator::migrate`] chains the two.

use crate::config::RewriteOptions;
use crate::departments::DepartmentRegistry;
use crate::error::{EnhanceError, HtmlSide, MigrateError};
use crate::output::{Enhancement, MigrationOutput, RewriteOutput};
use crate::pipeline::llm::Enhancer;
use crate::pipeline::{validate, walk};
use std::path::Path;
use tracing::{info, warn};

/// Runs migrations against one department registry and one enhancer.
///
/// Holds no per-call state, so a single `Migrator` can serve concurrent
/// callers.
pub struct Migrator<E> {
    registry: DepartmentRegistry,
    enhancer: E,
}

impl<E: Enhancer> Migrator<E> {
    /// Migrator with the default registry (`saude` pre-registered).
    pub fn new(enhancer: E) -> Self {
        Self::with_registry(enhancer, DepartmentRegistry::default())
    }

    pub fn with_registry(enhancer: E, registry: DepartmentRegistry) -> Self {
        Self { registry, enhancer }
    }

    pub fn registry(&self) -> &DepartmentRegistry {
        &self.registry
    }

    pub fn enhancer(&self) -> &E {
        &self.enhancer
    }

    /// URL phase. See [`walk::process_html`].
    pub fn process_html(
        &self,
        html: &str,
        options: &RewriteOptions,
    ) -> Result<RewriteOutput, MigrateError> {
        walk::process_html(html, options)
    }

    /// Enhancement phase: add `aria-label`s to the links of `html` using the
    /// prompt of `department`.
    ///
    /// The rule for an unknown department is synthesized and kept. Both the
    /// input and the returned text must be parseable HTML; the returned text
    /// is otherwise passed through untouched.
    pub async fn interpret(&self, html: &str, department: &str) -> Result<String, EnhanceError> {
        let rule = self.registry.get_or_synthesize(department);

        validate::ensure_parseable(html).map_err(|detail| EnhanceError::Parse {
            side: HtmlSide::Input,
            detail,
        })?;

        let response = self.enhancer.enhance(html, &rule).await?;

        if response.trim().is_empty() {
            return Err(EnhanceError::EmptyResponse);
        }

        validate::ensure_parseable(&response).map_err(|detail| EnhanceError::Parse {
            side: HtmlSide::Response,
            detail,
        })?;

        Ok(response)
    }

    /// Run the URL phase and, when `enhance` is set, the enhancement phase
    /// over its output with `options.secretaria` as the department.
    pub async fn migrate(
        &self,
        html: &str,
        options: &RewriteOptions,
        enhance: bool,
    ) -> Result<MigrationOutput, MigrateError> {
        let rewrite = self.process_html(html, options)?;

        let enhancement = if enhance {
            Some(match self.interpret(&rewrite.html, &options.secretaria).await {
                Ok(html) => {
                    info!("Enhancement pass succeeded for '{}'", options.secretaria);
                    Enhancement::Enhanced { html }
                }
                Err(e) => {
                    warn!("{}", e);
                    Enhancement::Failed {
                        error: e.to_string(),
                    }
                }
            })
        } else {
            None
        };

        Ok(MigrationOutput {
            rewrite,
            enhancement,
        })
    }
}

/// Synchronous wrapper around [`Migrator::migrate`].
///
/// Creates a temporary tokio runtime internally.
pub fn migrate_sync<E: Enhancer>(
    migrator: &Migrator<E>,
    html: &str,
    options: &RewriteOptions,
    enhance: bool,
) -> Result<MigrationOutput, MigrateError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| MigrateError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(migrator.migrate(html, options, enhance))
}

/// Write `html` to `path`, creating parent directories.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_html(path: impl AsRef<Path>, html: &str) -> Result<(), MigrateError> {
    let path = path.as_ref();
    let write_err = |source| MigrateError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");

    tokio::fs::write(&tmp_path, html).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    Ok(())
}
