//! LLM interaction: the accessibility pass over already-rewritten HTML.
//!
//! The rest of the crate only sees the [`Enhancer`] trait. [`LlmEnhancer`]
//! implements it with an `edgequake-llm` provider; tests substitute a fake.
//!
//! ## Message Layout
//!
//! 1. **System message** — the department rule's prompt
//! 2. **User message** — the HTML document, verbatim
//!
//! One call per document. There is no retry and no streaming: a failed call
//! is reported to the caller as is.

use crate::config::{EnhanceConfig, DEFAULT_MODEL};
use crate::departments::DepartmentRule;
use crate::error::EnhanceError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Capability that turns a document into its accessibility-enhanced form.
pub trait Enhancer: Send + Sync {
    /// Send `html` with the prompt of `rule` and return the response text.
    fn enhance(
        &self,
        html: &str,
        rule: &DepartmentRule,
    ) -> impl Future<Output = Result<String, EnhanceError>> + Send;
}

/// [`Enhancer`] backed by a chat-completion provider.
#[derive(Clone)]
pub struct LlmEnhancer {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl LlmEnhancer {
    /// Wrap an already-built provider.
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Resolve the provider described by `config`.
    pub fn from_config(config: &EnhanceConfig) -> Result<Self, EnhanceError> {
        let provider = resolve_provider(config)?;
        Ok(Self::new(provider, config.temperature, config.max_tokens))
    }

    /// Name of the underlying provider, as reported by the provider itself.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl Enhancer for LlmEnhancer {
    async fn enhance(&self, html: &str, rule: &DepartmentRule) -> Result<String, EnhanceError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::system(&rule.prompt), ChatMessage::user(html)];
        let options = build_options(self.temperature, self.max_tokens);

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| EnhanceError::Service {
                message: e.to_string(),
            })?;

        debug!(
            "Enhancement for '{}': {} input tokens, {} output tokens, {:?}",
            rule.name,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        Ok(response.content)
    }
}

/// Build `CompletionOptions` from the sampling parameters.
fn build_options(temperature: f32, max_tokens: usize) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
        ..Default::default()
    }
}

/// Instantiate a named provider with the given model.
fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, EnhanceError> {
    debug!("Using LLM provider '{}' with model '{}'", provider_name, model);
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        EnhanceError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// An environment variable, treating unset and empty alike.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Pick the provider for the accessibility pass. The first match wins:
///
/// 1. `config.provider`, shared as is.
/// 2. `config.provider_name` with `config.model` (or [`DEFAULT_MODEL`]).
/// 3. `EDGEQUAKE_LLM_PROVIDER` with `EDGEQUAKE_MODEL`, only as a pair.
/// 4. `openai` when `OPENAI_API_KEY` is present.
/// 5. Whatever `ProviderFactory::from_env` finds.
fn resolve_provider(config: &EnhanceConfig) -> Result<Arc<dyn LLMProvider>, EnhanceError> {
    if let Some(provider) = &config.provider {
        return Ok(Arc::clone(provider));
    }

    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
    if let Some(name) = &config.provider_name {
        return create_provider(name, model);
    }

    if let (Some(name), Some(env_model)) = (
        non_empty_env("EDGEQUAKE_LLM_PROVIDER"),
        non_empty_env("EDGEQUAKE_MODEL"),
    ) {
        return create_provider(&name, &env_model);
    }

    if non_empty_env("OPENAI_API_KEY").is_some() {
        return create_provider("openai", model);
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| EnhanceError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "nothing found in the environment ({e}); set OPENAI_API_KEY or \
                 ANTHROPIC_API_KEY, or name a provider explicitly"
            ),
        })?;
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = EnhanceConfig::default();
        let opts = build_options(config.temperature, config.max_tokens);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(2000));
    }

    #[test]
    fn build_options_passes_values_through() {
        let opts = build_options(0.0, 512);
        assert_eq!(opts.temperature, Some(0.0));
        assert_eq!(opts.max_tokens, Some(512));
    }

    #[test]
    fn unset_env_reads_as_none() {
        assert_eq!(non_empty_env("LINKMIGRATE_TEST_NEVER_SET_7F3A"), None);
    }
}
