//! LLM provider abstraction and implementations.
//!
//! Supports Google Gemini and any `OpenAI`-compatible `chat/completions`
//! endpoint via a common trait.

pub mod gemini;
pub mod openai;

use crate::AiError;

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Default `OpenAI` model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// A single-turn completion request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionRequest<'a> {
    /// The user prompt.
    pub prompt: &'a str,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Upper bound on generated tokens.
    pub max_output_tokens: Option<u32>,
    /// When set, the model is asked for JSON matching this schema (in
    /// Gemini's `OBJECT`/`ARRAY`/`STRING`/`NUMBER` dialect).
    pub response_schema: Option<&'a serde_json::Value>,
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// The model requests are sent to.
    fn model(&self) -> &str;

    /// Runs one completion and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails or the response carries no
    /// text.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, AiError>;
}

/// Creates a provider from environment variables.
///
/// Returns `Ok(None)` when no credential is configured.
///
/// # Errors
///
/// Returns [`AiError::Config`] if `AI_PROVIDER` names an unknown provider
/// or one whose key is missing.
pub fn create_provider_from_env() -> Result<Option<Box<dyn CompletionProvider>>, AiError> {
    provider_from_lookup(|key| std::env::var(key).ok())
}

/// Creates a provider from an arbitrary variable lookup.
///
/// If `AI_PROVIDER` is set, uses that provider. Otherwise auto-detects from
/// available credentials:
///
/// 1. `API_KEY` or `GEMINI_API_KEY` set -> Gemini
/// 2. `OPENAI_API_KEY` set -> `OpenAI`
///
/// `AI_MODEL` overrides the model and `AI_BASE_URL` the endpoint.
///
/// # Errors
///
/// See [`create_provider_from_env`].
pub fn provider_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<Box<dyn CompletionProvider>>, AiError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let gemini_key = || get("API_KEY").or_else(|| get("GEMINI_API_KEY"));

    let provider = match get("AI_PROVIDER") {
        Some(provider) => provider.to_lowercase(),
        None => match detect_provider(gemini_key().is_some(), get("OPENAI_API_KEY").is_some()) {
            Some(provider) => provider.to_string(),
            None => return Ok(None),
        },
    };

    let model = get("AI_MODEL");
    let base_url = get("AI_BASE_URL");

    match provider.as_str() {
        "gemini" | "google" => {
            let api_key = gemini_key().ok_or_else(|| AiError::Config {
                message: "API_KEY or GEMINI_API_KEY environment variable not set".to_string(),
            })?;
            let mut provider = gemini::GeminiProvider::new(
                api_key,
                model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            );
            if let Some(base_url) = base_url {
                provider = provider.with_base_url(base_url);
            }
            Ok(Some(Box::new(provider)))
        }
        "openai" | "gpt" => {
            let api_key = get("OPENAI_API_KEY").ok_or_else(|| AiError::Config {
                message: "OPENAI_API_KEY environment variable not set".to_string(),
            })?;
            let mut provider = openai::OpenAiProvider::new(
                api_key,
                model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            );
            if let Some(base_url) = base_url {
                provider = provider.with_base_url(base_url);
            }
            Ok(Some(Box::new(provider)))
        }
        other => Err(AiError::Config {
            message: format!("Unknown AI provider: {other}. Use 'gemini' or 'openai'."),
        }),
    }
}

/// Picks a provider name from the credentials present.
fn detect_provider(has_gemini: bool, has_openai: bool) -> Option<&'static str> {
    if has_gemini {
        log::info!("Auto-detected AI provider: Gemini (API_KEY/GEMINI_API_KEY found)");
        return Some("gemini");
    }

    if has_openai {
        log::info!("Auto-detected AI provider: OpenAI (OPENAI_API_KEY found)");
        return Some("openai");
    }

    log::warn!(
        "No AI credentials detected. Set API_KEY/GEMINI_API_KEY or OPENAI_API_KEY, \
         or AI_PROVIDER explicitly."
    );
    None
}
