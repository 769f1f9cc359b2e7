// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The LLM-backed decision engine.
//!
//! One classification call per request, constrained to the `select_model`
//! tool. The raw tool input is parsed into a [`Candidate`]; overrides,
//! allow-list checks and title sanitation happen afterwards in
//! [`crate::overrides`].

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use concierge_config::RoutingConfig;
use concierge_config::validation::MAX_RETRIES;
use concierge_core::{
    ConciergeError, ProviderAdapter, ProviderMessage, ProviderRequest, ReasoningEffort,
    ToolChoice,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::modifiers::Modifiers;
use crate::prompt::{self, TOOL_NAME};
use crate::request::RoutingRequest;
use crate::rubric::Rubric;
use crate::signals::QuerySignals;

/// Settings for the classification call.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Provider model id performing the classification.
    pub classifier_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Retries on provider or transport failure, capped at one.
    pub max_retries: u32,
    pub rubric: Rubric,
}

impl EngineSettings {
    pub fn from_config(config: &RoutingConfig, rubric: Rubric) -> Self {
        Self {
            classifier_model: config.classifier_model.clone(),
            max_tokens: config.classifier_max_tokens,
            temperature: config.classifier_temperature,
            max_retries: config.max_retries.min(MAX_RETRIES),
            rubric,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default(), Rubric::builtin())
    }
}

/// Classifier output after per-field validation, before overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Model string as returned; resolved against the allow-list later.
    pub model: String,
    /// `None` when absent or rejected; the configured default applies.
    pub temperature: Option<f64>,
    pub reasoning_enabled: bool,
    /// Effort when reasoning is enabled.
    pub effort: Option<ReasoningEffort>,
    pub explanation: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSelection {
    model_id: String,
    #[serde(default)]
    temperature: Option<Value>,
    #[serde(default)]
    reasoning: Option<Value>,
    #[serde(default)]
    explanation: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawReasoning {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    effort: Option<String>,
}

/// A string field, or `None` with a warning when the classifier sent another type.
fn text_field(name: &'static str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => {
            warn!(field = name, value = %other, "ignoring non-string classifier field");
            None
        }
    }
}

fn reasoning_field(value: Option<Value>) -> (bool, Option<ReasoningEffort>) {
    let raw = match value {
        None | Some(Value::Null) => return (false, None),
        Some(value) => match serde_json::from_value::<RawReasoning>(value.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(reasoning = %value, error = %e, "ignoring malformed reasoning field");
                return (false, None);
            }
        },
    };
    if !raw.enabled {
        return (false, None);
    }

    let effort = match raw.effort.as_deref().map(ReasoningEffort::from_str) {
        None => ReasoningEffort::Medium,
        Some(Ok(effort)) => effort,
        Some(Err(_)) => {
            warn!(effort = ?raw.effort, "unknown reasoning effort, using medium");
            ReasoningEffort::Medium
        }
    };
    if effort == ReasoningEffort::None {
        (false, None)
    } else {
        (true, Some(effort))
    }
}

/// Parse the `select_model` tool input.
///
/// A missing or non-string `model_id` is an invalid-output error. Every other
/// field degrades on its own: bad temperature, reasoning, title or
/// explanation values fall back to defaults without failing the parse.
pub fn parse_candidate(input: &Value) -> Result<Candidate, ConciergeError> {
    let raw: RawSelection = serde_json::from_value(input.clone())
        .map_err(|e| ConciergeError::InvalidOutput(format!("malformed {TOOL_NAME} input: {e}")))?;

    let temperature = match raw.temperature.as_ref() {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_f64() {
            Some(t) if t.is_finite() && (0.0..=1.0).contains(&t) => Some(t),
            _ => {
                warn!(temperature = %value, "rejecting out-of-range classifier temperature");
                None
            }
        },
    };

    let (reasoning_enabled, effort) = reasoning_field(raw.reasoning);

    Ok(Candidate {
        model: raw.model_id,
        temperature,
        reasoning_enabled,
        effort,
        explanation: text_field("explanation", raw.explanation),
        title: text_field("title", raw.title),
    })
}

/// Runs the classification call against a provider.
pub struct DecisionEngine {
    provider: Arc<dyn ProviderAdapter>,
    settings: EngineSettings,
}

impl DecisionEngine {
    pub fn new(provider: Arc<dyn ProviderAdapter>, settings: EngineSettings) -> Self {
        Self { provider, settings }
    }

    /// Build the provider request for one routing call.
    pub fn build_request(
        &self,
        request: &RoutingRequest,
        signals: &QuerySignals,
        modifiers: &Modifiers,
    ) -> ProviderRequest {
        ProviderRequest {
            model: self.settings.classifier_model.clone(),
            system_prompt: Some(prompt::system_prompt(&self.settings.rubric)),
            messages: vec![ProviderMessage::user_text(prompt::user_prompt(
                request, signals, modifiers,
            ))],
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
            tools: Some(vec![prompt::tool_definition()]),
            tool_choice: Some(ToolChoice::Tool {
                name: TOOL_NAME.to_string(),
            }),
        }
    }

    /// Classify a request, retrying at most once on retryable failures.
    pub async fn classify(
        &self,
        request: &RoutingRequest,
        signals: &QuerySignals,
        modifiers: &Modifiers,
    ) -> Result<Candidate, ConciergeError> {
        let provider_request = self.build_request(request, signals, modifiers);
        let max_retries = self.settings.max_retries.min(MAX_RETRIES);

        let mut attempt = 0;
        loop {
            match self.attempt(provider_request.clone(), attempt).await {
                Ok(candidate) => return Ok(candidate),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    warn!(attempt, error = %e, "classifier call failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(
        &self,
        request: ProviderRequest,
        attempt: u32,
    ) -> Result<Candidate, ConciergeError> {
        let started = Instant::now();
        let response = self.provider.complete(request).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let response = response?;

        debug!(
            provider = self.provider.name(),
            attempt,
            elapsed_ms,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "classifier call completed"
        );

        let tool_use = response.tool_use(TOOL_NAME).ok_or_else(|| {
            ConciergeError::InvalidOutput(format!(
                "classifier returned no {TOOL_NAME} call (stop_reason: {})",
                response.stop_reason.as_deref().unwrap_or("unknown")
            ))
        })?;
        parse_candidate(&tool_use.input)
    }
}
