#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Generative-AI features of the UIDAI data portal.
//!
//! Two calls are offered: free-text operational insights for a data
//! context, and a structured "smart forecast" of system traffic. Both run
//! a single completion against whichever LLM provider the environment
//! configures (Google Gemini by default, or any `OpenAI`-compatible
//! server). Without a credential both degrade to fixed fallbacks instead
//! of failing.

pub mod providers;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use providers::{CompletionProvider, CompletionRequest};

/// Returned by [`InsightClient::generate_ai_insights`] when no provider is
/// configured.
pub const INSIGHTS_UNAVAILABLE: &str = "AI Insights unavailable. Please provide an API key.";

/// Returned by [`InsightClient::generate_ai_insights`] when the call fails.
pub const INSIGHTS_FAILED: &str = "Failed to fetch AI insights. Check system logs.";

const INSIGHT_TEMPERATURE: f64 = 0.7;
const INSIGHT_MAX_TOKENS: u32 = 500;

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },

    /// The provider answered without any usable content.
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// One day of a smart forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDataPoint {
    /// Day label.
    pub day: String,
    /// Observed traffic (0-100).
    pub actual: f64,
    /// Predicted traffic (0-100).
    pub predicted: f64,
    /// Lower confidence bound.
    pub confidence_low: f64,
    /// Upper confidence bound.
    pub confidence_high: f64,
}

/// Structured result of [`InsightClient::run_smart_forecast`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartForecast {
    /// Seven daily points.
    #[serde(default)]
    pub data_points: Vec<ForecastDataPoint>,
    /// Optional narrative summary.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Response schema sent with smart-forecast requests.
#[must_use]
pub fn smart_forecast_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "dataPoints": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": {"type": "STRING"},
                        "actual": {"type": "NUMBER"},
                        "predicted": {"type": "NUMBER"},
                        "confidenceLow": {"type": "NUMBER"},
                        "confidenceHigh": {"type": "NUMBER"},
                    },
                },
            },
            "summary": {"type": "STRING"},
        },
    })
}

fn insights_prompt(context: &str) -> String {
    format!(
        "Based on the following data context for the UIDAI Data Management Portal, \
         provide 3 short, actionable AI insights for infrastructure administrators.\n\
         Context: {context}\n\
         Return the output as a clean list."
    )
}

fn smart_forecast_prompt(model: &str, region: &str, horizon: &str) -> String {
    format!(
        "Predict system traffic for a {horizon} horizon in the {region} region using the \
         {model} model. Return a JSON object with a 'dataPoints' array of 7 items, each \
         having 'day', 'actual', 'predicted', and 'confidenceLow', 'confidenceHigh' \
         properties (values 0-100)."
    )
}

/// Removes a surrounding Markdown code fence (with or without a language
/// tag) from a model response.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.strip_prefix("json").unwrap_or(rest),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Runs insight and smart-forecast requests against an optional provider.
pub struct InsightClient {
    provider: Option<Box<dyn CompletionProvider>>,
}

impl InsightClient {
    /// Wraps a provider.
    #[must_use]
    pub fn new(provider: Box<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A client with no provider; every call yields its fallback.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { provider: None }
    }

    /// Builds a client from environment variables.
    ///
    /// A misconfigured provider is logged and treated as absent.
    #[must_use]
    pub fn from_env() -> Self {
        match providers::create_provider_from_env() {
            Ok(Some(provider)) => {
                log::info!(
                    "AI provider: {} (model {})",
                    provider.name(),
                    provider.model()
                );
                Self::new(provider)
            }
            Ok(None) => Self::disabled(),
            Err(e) => {
                log::warn!("AI provider disabled: {e}");
                Self::disabled()
            }
        }
    }

    /// Whether a provider is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&dyn CompletionProvider, AiError> {
        self.provider.as_deref().ok_or_else(|| AiError::Config {
            message: "no AI provider configured".to_string(),
        })
    }

    /// Asks for three short insights about `context`.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if no provider is configured or the call fails.
    pub async fn insights(&self, context: &str) -> Result<String, AiError> {
        let prompt = insights_prompt(context);
        self.provider()?
            .complete(&CompletionRequest {
                prompt: &prompt,
                temperature: Some(INSIGHT_TEMPERATURE),
                max_output_tokens: Some(INSIGHT_MAX_TOKENS),
                response_schema: None,
            })
            .await
    }

    /// Asks for a 7-day traffic forecast.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if no provider is configured, the call fails or
    /// the response does not decode as a [`SmartForecast`].
    pub async fn smart_forecast(
        &self,
        model: &str,
        region: &str,
        horizon: &str,
    ) -> Result<SmartForecast, AiError> {
        let prompt = smart_forecast_prompt(model, region, horizon);
        let schema = smart_forecast_schema();
        let text = self
            .provider()?
            .complete(&CompletionRequest {
                prompt: &prompt,
                response_schema: Some(&schema),
                ..CompletionRequest::default()
            })
            .await?;
        Ok(serde_json::from_str(strip_code_fences(&text))?)
    }

    /// Insight text for `context`, or a fixed fallback message.
    ///
    /// Returns `None` when the provider answers with no text, in which case
    /// the previous insight should stay in place.
    pub async fn generate_ai_insights(&self, context: &str) -> Option<String> {
        if !self.is_enabled() {
            return Some(INSIGHTS_UNAVAILABLE.to_string());
        }
        match self.insights(context).await {
            Ok(text) => Some(text),
            Err(AiError::EmptyResponse) => {
                log::warn!("AI insights came back empty");
                None
            }
            Err(e) => {
                log::error!("AI insights failed: {e}");
                Some(INSIGHTS_FAILED.to_string())
            }
        }
    }

    /// A smart forecast, or `None` without a provider or on any failure.
    pub async fn run_smart_forecast(
        &self,
        model: &str,
        region: &str,
        horizon: &str,
    ) -> Option<SmartForecast> {
        if !self.is_enabled() {
            return None;
        }
        self.smart_forecast(model, region, horizon)
            .await
            .inspect_err(|e| log::error!("Smart forecast failed: {e}"))
            .ok()
    }
}
