// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic overrides applied around the classifier.
//!
//! Precedence, highest first:
//! 1. audio/video attachments force the media model (no classifier call),
//! 2. hashtag modifiers replace the classifier's choices,
//! 3. a model outside the allow-list reverts the whole decision to defaults,
//! 4. title sanitation, always last.

use concierge_core::{ModelId, ReasoningEffort};
use tracing::{debug, warn};

use crate::decision::{
    DecisionDefaults, ReasoningConfig, RoutingDecision, resolve_title, sanitize_explanation,
};
use crate::engine::Candidate;
use crate::modifiers::{Modifiers, ReasoningMode};
use crate::request::RoutingRequest;

/// The forced decision for requests carrying audio or video, if any.
pub fn forced_by_attachment(request: &RoutingRequest) -> Option<RoutingDecision> {
    request
        .media_attachment()
        .map(|kind| RoutingDecision::media_forced(kind, &request.query))
}

/// Apply modifier overrides to a classifier candidate.
///
/// A named model always wins. `#ultrathink` and `#quick` only pick the
/// model when no model modifier is present. Temperature modes clamp the
/// candidate temperature, or the default one when the classifier's was
/// rejected.
pub fn apply_modifiers(candidate: &mut Candidate, modifiers: &Modifiers, defaults: &DecisionDefaults) {
    if modifiers.is_empty() {
        return;
    }

    let named_model = modifiers.model();

    match modifiers.reasoning_mode() {
        Some(ReasoningMode::Ultrathink) => {
            candidate.reasoning_enabled = true;
            candidate.effort = Some(ReasoningEffort::High);
            if named_model.is_none() {
                candidate.model = ModelId::FLAGSHIP.to_string();
            }
        }
        Some(ReasoningMode::Quick) => {
            candidate.reasoning_enabled = false;
            candidate.effort = None;
            if named_model.is_none() {
                candidate.model = ModelId::FASTEST.to_string();
            }
        }
        None => {}
    }

    if let Some(model) = named_model {
        candidate.model = model.to_string();
    }

    if let Some(mode) = modifiers.temperature_mode() {
        let base = candidate.temperature.unwrap_or(defaults.temperature);
        candidate.temperature = Some(mode.apply(base));
    }

    debug!(modifiers = ?modifiers.tags(), model = %candidate.model, "applied modifier overrides");
}

/// Turn a candidate into the final decision.
///
/// Returns the decision and, when the candidate's model is not in the
/// allow-list, the error explaining why defaults were used.
pub fn finalize(
    candidate: Candidate,
    query: &str,
    defaults: &DecisionDefaults,
) -> (RoutingDecision, Option<String>) {
    let title = resolve_title(candidate.title.as_deref(), query);

    let Some(model_id) = ModelId::resolve(&candidate.model) else {
        warn!(model = %candidate.model, "classifier chose a model outside the allow-list");
        let error = format!(
            "model `{}` is not in the allow-list; using default {}",
            candidate.model, defaults.model
        );
        return (RoutingDecision::fallback(defaults, title), Some(error));
    };

    let reasoning = match (candidate.reasoning_enabled, candidate.effort) {
        (true, Some(effort)) => ReasoningConfig::enabled(effort, model_id, &defaults.budgets),
        (true, None) => {
            ReasoningConfig::enabled(ReasoningEffort::Medium, model_id, &defaults.budgets)
        }
        (false, _) => ReasoningConfig::disabled(),
    };

    let explanation = candidate
        .explanation
        .as_deref()
        .map(sanitize_explanation)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| format!("Routed to {}.", model_id.family()));

    let decision = RoutingDecision {
        model_id,
        temperature: candidate
            .temperature
            .unwrap_or(defaults.temperature)
            .clamp(0.0, 1.0),
        reasoning,
        explanation,
        title,
        auto_switched: false,
        auto_switch_reason: None,
    };
    (decision, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::PLACEHOLDER_TITLE;
    use crate::request::{Attachment, AttachmentKind};

    fn candidate(model: &str) -> Candidate {
        Candidate {
            model: model.to_string(),
            temperature: Some(0.5),
            reasoning_enabled: false,
            effort: None,
            explanation: Some("Because.".into()),
            title: Some("Some title".into()),
        }
    }

    fn overridden(model: &str, query: &str) -> Candidate {
        let mut c = candidate(model);
        apply_modifiers(&mut c, &Modifiers::parse(query), &DecisionDefaults::default());
        c
    }

    #[test]
    fn attachment_forces_media_model() {
        let request = RoutingRequest::new("#opus #ultrathink summarize")
            .with_attachment(Attachment::new(AttachmentKind::Audio, "audio/mp3"));
        let d = forced_by_attachment(&request).unwrap();
        assert_eq!(d.model_id, ModelId::MEDIA);
        assert!(!d.reasoning.enabled);
        assert!(d.auto_switched);
        assert_eq!(d.title, "summarize");
    }

    #[test]
    fn no_force_without_media() {
        let request = RoutingRequest::new("look at this")
            .with_attachment(Attachment::new(AttachmentKind::Image, "image/png"));
        assert!(forced_by_attachment(&request).is_none());
    }

    #[test]
    fn model_modifier_replaces_model() {
        let c = overridden("anthropic/claude-haiku-4.5", "#opus quickly tell me");
        assert_eq!(c.model, "anthropic/claude-opus-4.5");
    }

    #[test]
    fn ultrathink_forces_flagship_and_high_effort() {
        let c = overridden("anthropic/claude-haiku-4.5", "#ultrathink analyze");
        assert_eq!(c.model, ModelId::FLAGSHIP.to_string());
        assert!(c.reasoning_enabled);
        assert_eq!(c.effort, Some(ReasoningEffort::High));
    }

    #[test]
    fn ultrathink_respects_named_model() {
        let c = overridden("anthropic/claude-haiku-4.5", "#ultrathink #sonnet analyze");
        assert_eq!(c.model, "anthropic/claude-sonnet-4.5");
        assert!(c.reasoning_enabled);
    }

    #[test]
    fn quick_forces_fastest_and_disables_reasoning() {
        let mut c = candidate("anthropic/claude-opus-4.5");
        c.reasoning_enabled = true;
        c.effort = Some(ReasoningEffort::High);
        apply_modifiers(
            &mut c,
            &Modifiers::parse("#quick explain everything"),
            &DecisionDefaults::default(),
        );
        assert_eq!(c.model, ModelId::FASTEST.to_string());
        assert!(!c.reasoning_enabled);
        assert_eq!(c.effort, None);
    }

    #[test]
    fn creative_and_precise_clamp_temperature() {
        assert_eq!(overridden("haiku", "#creative poem").temperature, Some(0.8));
        assert_eq!(overridden("haiku", "#precise sum").temperature, Some(0.2));
        assert_eq!(overridden("haiku", "#precise #creative").temperature, Some(0.8));
    }

    #[test]
    fn temperature_mode_uses_default_when_rejected() {
        let mut c = candidate("haiku");
        c.temperature = None;
        apply_modifiers(&mut c, &Modifiers::parse("#precise"), &DecisionDefaults::default());
        assert_eq!(c.temperature, Some(0.2));
    }

    #[test]
    fn finalize_valid_candidate() {
        let mut c = candidate("opus");
        c.reasoning_enabled = true;
        c.effort = Some(ReasoningEffort::Low);
        let (d, error) = finalize(c, "q", &DecisionDefaults::default());
        assert!(error.is_none());
        assert_eq!(d.model_id, ModelId::ClaudeOpus);
        assert_eq!(d.reasoning.max_tokens, Some(4_000));
        assert_eq!(d.title, "Some title");
        assert_eq!(d.explanation, "Because.");
    }

    #[test]
    fn finalize_effort_only_model_has_no_budget() {
        let mut c = candidate("x-ai/grok-4.1-fast");
        c.reasoning_enabled = true;
        c.effort = Some(ReasoningEffort::High);
        let (d, _) = finalize(c, "q", &DecisionDefaults::default());
        assert!(d.reasoning.enabled);
        assert_eq!(d.reasoning.max_tokens, None);
    }

    #[test]
    fn finalize_unknown_model_reverts_to_defaults_keeping_title() {
        let mut c = candidate("meta/llama-3-70b");
        c.temperature = Some(0.9);
        c.reasoning_enabled = true;
        c.effort = Some(ReasoningEffort::High);
        let defaults = DecisionDefaults::default();
        let (d, error) = finalize(c, "q", &defaults);
        assert_eq!(d.model_id, defaults.model);
        assert_eq!(d.temperature, defaults.temperature);
        assert!(!d.reasoning.enabled);
        assert_eq!(d.title, "Some title");
        assert!(error.unwrap().contains("meta/llama-3-70b"));
    }

    #[test]
    fn finalize_rejected_temperature_uses_default() {
        let mut c = candidate("haiku");
        c.temperature = None;
        let (d, _) = finalize(c, "q", &DecisionDefaults::default());
        assert_eq!(d.temperature, 0.5);
    }

    #[test]
    fn finalize_falls_back_to_query_title() {
        let mut c = candidate("haiku");
        c.title = Some("\"\"".into());
        let (d, _) = finalize(c, "", &DecisionDefaults::default());
        assert_eq!(d.title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn finalize_fills_missing_explanation() {
        let mut c = candidate("sonnet");
        c.explanation = None;
        let (d, _) = finalize(c, "q", &DecisionDefaults::default());
        assert_eq!(d.explanation, "Routed to Sonnet.");
    }
}
