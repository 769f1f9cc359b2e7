// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as allow-list membership, temperature ranges, and budget ordering.

use concierge_core::ModelId;

use crate::diagnostic::ConfigError;
use crate::model::ConciergeConfig;

/// Largest retry count accepted across both retry layers combined.
pub const MAX_RETRIES: u32 = 1;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConciergeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let routing = &config.routing;

    if ModelId::resolve(&routing.default_model).is_none() {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.default_model `{}` is not an allowed model; expected one of: {}",
                routing.default_model,
                ModelId::allowed_ids().join(", ")
            ),
        });
    }

    if !(0.0..=1.0).contains(&routing.default_temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.default_temperature must be between 0.0 and 1.0, got {}",
                routing.default_temperature
            ),
        });
    }

    if !(0.0..=1.0).contains(&routing.classifier_temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.classifier_temperature must be between 0.0 and 1.0, got {}",
                routing.classifier_temperature
            ),
        });
    }

    if routing.classifier_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "routing.classifier_model must not be empty".to_string(),
        });
    }

    if routing.classifier_max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "routing.classifier_max_tokens must be greater than 0".to_string(),
        });
    }

    if routing.max_retries > MAX_RETRIES {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.max_retries must be at most {MAX_RETRIES}, got {}",
                routing.max_retries
            ),
        });
    }

    if config.anthropic.max_retries > MAX_RETRIES {
        errors.push(ConfigError::Validation {
            message: format!(
                "anthropic.max_retries must be at most {MAX_RETRIES}, got {}",
                config.anthropic.max_retries
            ),
        });
    }

    let combined = routing.max_retries.saturating_add(config.anthropic.max_retries);
    if combined > MAX_RETRIES {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.max_retries + anthropic.max_retries must be at most {MAX_RETRIES}, got {combined}"
            ),
        });
    }

    if config.anthropic.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "anthropic.timeout_secs must be greater than 0".to_string(),
        });
    }

    let budgets = &routing.reasoning_budgets;
    if budgets.low == 0 || budgets.medium == 0 || budgets.high == 0 {
        errors.push(ConfigError::Validation {
            message: "routing.reasoning_budgets values must be greater than 0".to_string(),
        });
    } else if !(budgets.low <= budgets.medium && budgets.medium <= budgets.high) {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.reasoning_budgets must satisfy low <= medium <= high, got {}/{}/{}",
                budgets.low, budgets.medium, budgets.high
            ),
        });
    }

    if let Some(path) = &routing.rubric_file
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "routing.rubric_file must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = ConciergeConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_default_model_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.routing.default_model = "gpt-4o".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "routing.default_model"));
    }

    #[test]
    fn alias_default_model_passes() {
        let mut config = ConciergeConfig::default();
        config.routing.default_model = "opus".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.routing.default_temperature = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "default_temperature"));
    }

    #[test]
    fn more_than_one_retry_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.routing.max_retries = 3;
        config.anthropic.max_retries = 2;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "routing.max_retries"));
        assert!(has_error(&errors, "anthropic.max_retries"));
    }

    #[test]
    fn stacked_retry_layers_fail_validation() {
        let mut config = ConciergeConfig::default();
        config.routing.max_retries = 1;
        config.anthropic.max_retries = 1;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_error(&errors, "routing.max_retries + anthropic.max_retries"));
    }

    #[test]
    fn single_retry_layer_passes() {
        let mut config = ConciergeConfig::default();
        config.routing.max_retries = 0;
        config.anthropic.max_retries = 1;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unordered_budgets_fail_validation() {
        let mut config = ConciergeConfig::default();
        config.routing.reasoning_budgets.low = 20_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "low <= medium <= high"));
    }

    #[test]
    fn zero_budget_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.routing.reasoning_budgets.medium = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "greater than 0"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = ConciergeConfig::default();
        config.routing.default_model = "nope".to_string();
        config.routing.classifier_model = " ".to_string();
        config.routing.classifier_max_tokens = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
