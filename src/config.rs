//! Configuration types for link migration.
//!
//! The two phases are configured separately:
//!
//! * [`RewriteOptions`] — the department code and the two normalization
//!   switches threaded through every URL rule. Immutable for the duration of
//!   a call.
//! * [`EnhanceConfig`] — which LLM provider/model runs the accessibility
//!   pass and with which sampling parameters.
//!
//! Both are built through builders that validate on `build()`, so an empty
//! department code or a zero token budget is rejected before any HTML is
//! touched.

use crate::error::MigrateError;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Department used when none is given.
pub const DEFAULT_SECRETARIA: &str = "saude";

/// Model used when a provider is named without a model.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Options that decide how URLs are rewritten.
///
/// # Example
/// ```rust
/// use linkmigrate::RewriteOptions;
///
/// let options = RewriteOptions::builder()
///     .secretaria("saude")
///     .normalize_special_chars(true)
///     .build()
///     .unwrap();
/// assert!(!options.relativize_links);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOptions {
    /// Department code. Becomes the `{secretaria}` segment of rewritten
    /// document paths and the key of the department prompt.
    pub secretaria: String,

    /// Strip percent-encoded accents and symbols from file names.
    /// When off, a lighter fallback is applied (see [`crate::pipeline::rewrite`]).
    pub normalize_special_chars: bool,

    /// Turn absolute `*.df.gov.br` URLs into host-relative paths.
    pub relativize_links: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            secretaria: DEFAULT_SECRETARIA.to_string(),
            normalize_special_chars: false,
            relativize_links: false,
        }
    }
}

impl RewriteOptions {
    /// Create a new builder for `RewriteOptions`.
    pub fn builder() -> RewriteOptionsBuilder {
        RewriteOptionsBuilder {
            options: Self::default(),
        }
    }
}

/// Builder for [`RewriteOptions`].
#[derive(Debug)]
pub struct RewriteOptionsBuilder {
    options: RewriteOptions,
}

impl RewriteOptionsBuilder {
    pub fn secretaria(mut self, code: impl Into<String>) -> Self {
        self.options.secretaria = code.into();
        self
    }

    pub fn normalize_special_chars(mut self, v: bool) -> Self {
        self.options.normalize_special_chars = v;
        self
    }

    pub fn relativize_links(mut self, v: bool) -> Self {
        self.options.relativize_links = v;
        self
    }

    /// Build the options, validating constraints.
    pub fn build(self) -> Result<RewriteOptions, MigrateError> {
        if self.options.secretaria.trim().is_empty() {
            return Err(MigrateError::InvalidConfig(
                "secretaria (department code) must not be empty".into(),
            ));
        }
        Ok(self.options)
    }
}

/// Configuration for the LLM-backed accessibility pass.
#[derive(Clone)]
pub struct EnhanceConfig {
    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// LLM model identifier. If None, [`DEFAULT_MODEL`] is used.
    pub model: Option<String>,

    /// Sampling temperature. Default: 0.2.
    ///
    /// The model must copy the document back verbatim apart from the added
    /// `aria-label` attributes, so sampling stays close to deterministic.
    pub temperature: f32,

    /// Maximum tokens of the returned document. Default: 2000.
    pub max_tokens: usize,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            provider: None,
            provider_name: None,
            model: None,
            temperature: 0.2,
            max_tokens: 2000,
        }
    }
}

impl fmt::Debug for EnhanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnhanceConfig")
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl EnhanceConfig {
    /// Create a new builder for `EnhanceConfig`.
    pub fn builder() -> EnhanceConfigBuilder {
        EnhanceConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`EnhanceConfig`].
#[derive(Debug)]
pub struct EnhanceConfigBuilder {
    config: EnhanceConfig,
}

impl EnhanceConfigBuilder {
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<EnhanceConfig, MigrateError> {
        if self.config.max_tokens == 0 {
            return Err(MigrateError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
