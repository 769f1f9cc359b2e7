// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Concierge routing core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use concierge_core::{ModelId, ReasoningEffort};
use serde::{Deserialize, Serialize};

/// Top-level Concierge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConciergeConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Anthropic API settings for the classifier call.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Routing and decision engine settings.
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Messages endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// HTTP-level retries on transient status codes (429, 5xx). At most 1.
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

/// Routing and decision engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Model that performs the classification call itself.
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Token limit for the classification call.
    #[serde(default = "default_classifier_max_tokens")]
    pub classifier_max_tokens: u32,

    /// Sampling temperature for the classification call.
    #[serde(default = "default_classifier_temperature")]
    pub classifier_temperature: f32,

    /// Retries of the whole classification call on provider failure. At most 1.
    #[serde(default = "default_routing_max_retries")]
    pub max_retries: u32,

    /// Model used by the fallback decision. Must be in the allow-list.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Temperature used by the fallback decision and for rejected temperatures.
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    /// Inline rubric text. Overridden by `rubric_file` if both set.
    #[serde(default)]
    pub rubric: Option<String>,

    /// Path to a markdown rubric describing model capabilities.
    /// Takes precedence over `rubric` if both are set.
    #[serde(default)]
    pub rubric_file: Option<String>,

    /// Reasoning effort to token budget table for token-budget-constrained models.
    #[serde(default)]
    pub reasoning_budgets: ReasoningBudgets,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            classifier_model: default_classifier_model(),
            classifier_max_tokens: default_classifier_max_tokens(),
            classifier_temperature: default_classifier_temperature(),
            max_retries: default_routing_max_retries(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            rubric: None,
            rubric_file: None,
            reasoning_budgets: ReasoningBudgets::default(),
        }
    }
}

impl RoutingConfig {
    /// The configured fallback model, or Sonnet if the value does not resolve.
    ///
    /// Validation rejects unresolvable values at startup, so the fallback
    /// only matters for configs built in code.
    pub fn default_model_id(&self) -> ModelId {
        ModelId::resolve(&self.default_model).unwrap_or(ModelId::ClaudeSonnet)
    }
}

fn default_classifier_model() -> String {
    "claude-haiku-4-5".to_string()
}

fn default_classifier_max_tokens() -> u32 {
    512
}

fn default_classifier_temperature() -> f32 {
    0.0
}

fn default_routing_max_retries() -> u32 {
    1
}

fn default_model() -> String {
    ModelId::ClaudeSonnet.to_string()
}

fn default_temperature() -> f64 {
    0.5
}

/// Token budgets per reasoning effort level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReasoningBudgets {
    #[serde(default = "default_budget_high")]
    pub high: u32,

    #[serde(default = "default_budget_medium")]
    pub medium: u32,

    #[serde(default = "default_budget_low")]
    pub low: u32,
}

impl Default for ReasoningBudgets {
    fn default() -> Self {
        Self {
            high: default_budget_high(),
            medium: default_budget_medium(),
            low: default_budget_low(),
        }
    }
}

impl ReasoningBudgets {
    /// Token budget for an effort level. `None` has no budget.
    pub fn for_effort(&self, effort: ReasoningEffort) -> Option<u32> {
        match effort {
            ReasoningEffort::High => Some(self.high),
            ReasoningEffort::Medium => Some(self.medium),
            ReasoningEffort::Low => Some(self.low),
            ReasoningEffort::None => None,
        }
    }
}

fn default_budget_high() -> u32 {
    16_000
}

fn default_budget_medium() -> u32 {
    8_000
}

fn default_budget_low() -> u32 {
    4_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budgets_lookup() {
        let budgets = ReasoningBudgets::default();
        assert_eq!(budgets.for_effort(ReasoningEffort::High), Some(16_000));
        assert_eq!(budgets.for_effort(ReasoningEffort::Medium), Some(8_000));
        assert_eq!(budgets.for_effort(ReasoningEffort::Low), Some(4_000));
        assert_eq!(budgets.for_effort(ReasoningEffort::None), None);
    }

    #[test]
    fn default_model_resolves() {
        let routing = RoutingConfig::default();
        assert_eq!(routing.default_model_id(), ModelId::ClaudeSonnet);
    }

    #[test]
    fn default_model_accepts_alias() {
        let routing = RoutingConfig {
            default_model: "haiku".into(),
            ..RoutingConfig::default()
        };
        assert_eq!(routing.default_model_id(), ModelId::ClaudeHaiku);
    }

    #[test]
    fn nested_budgets_deserialize() {
        let toml_str = r#"
[routing.reasoning_budgets]
high = 32000
"#;
        let config: ConciergeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.routing.reasoning_budgets.high, 32_000);
        assert_eq!(config.routing.reasoning_budgets.medium, 8_000);
    }
}
