// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing decision types and the title/explanation sanitation rules.

use concierge_config::{ReasoningBudgets, RoutingConfig};
use concierge_core::{ModelId, ReasoningEffort};
use serde::Serialize;

use crate::modifiers::strip_modifiers;
use crate::request::AttachmentKind;

/// Longest title kept, in characters, ellipsis included.
pub const MAX_TITLE_LENGTH: usize = 50;

/// Titles shorter than this after cleanup count as absent.
pub const MIN_TITLE_LENGTH: usize = 2;

/// Longest explanation kept, in characters, ellipsis included.
pub const MAX_EXPLANATION_LENGTH: usize = 240;

/// Query-derived fallback titles are cut at a word boundary within this many characters.
pub const FALLBACK_TITLE_LENGTH: usize = 40;

/// Title used when neither the classifier nor the query yields one.
pub const PLACEHOLDER_TITLE: &str = "New conversation";

/// Temperature of attachment-forced decisions.
pub const MEDIA_TEMPERATURE: f64 = 0.5;

const ELLIPSIS: &str = "...";

const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
    ('“', '”'),
    ('‘', '’'),
    ('«', '»'),
];

/// Extended reasoning settings for the downstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<ReasoningEffort>,
    /// Only set for token-budget-constrained models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ReasoningConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            effort: None,
            max_tokens: None,
        }
    }

    /// Reasoning at `effort` on `model`. Effort `none` disables reasoning.
    pub fn enabled(effort: ReasoningEffort, model: ModelId, budgets: &ReasoningBudgets) -> Self {
        if effort == ReasoningEffort::None {
            return Self::disabled();
        }
        let max_tokens = if model.is_token_budget_constrained() {
            budgets.for_effort(effort)
        } else {
            None
        };
        Self {
            enabled: true,
            effort: Some(effort),
            max_tokens,
        }
    }
}

/// The routing decision handed to the chat pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    pub model_id: ModelId,
    /// Always within `0.0..=1.0`.
    pub temperature: f64,
    pub reasoning: ReasoningConfig,
    pub explanation: String,
    /// Always `MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH` characters.
    pub title: String,
    /// True only when an attachment forced the model without a classifier call.
    pub auto_switched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_switch_reason: Option<String>,
}

impl RoutingDecision {
    /// The safe decision used whenever routing cannot trust the classifier.
    pub fn fallback(defaults: &DecisionDefaults, title: String) -> Self {
        Self {
            model_id: defaults.model,
            temperature: defaults.temperature,
            reasoning: ReasoningConfig::disabled(),
            explanation: "Default routing applied.".to_string(),
            title,
            auto_switched: false,
            auto_switch_reason: None,
        }
    }

    /// Decision for a query carrying audio or video.
    pub fn media_forced(kind: AttachmentKind, query: &str) -> Self {
        Self {
            model_id: ModelId::MEDIA,
            temperature: MEDIA_TEMPERATURE,
            reasoning: ReasoningConfig::disabled(),
            explanation: format!(
                "{} attachment requires a model with native {kind} support.",
                capitalize(&kind.to_string())
            ),
            title: fallback_title(query),
            auto_switched: true,
            auto_switch_reason: Some(format!("{kind} attachment")),
        }
    }
}

/// A decision plus the instrumentation recorded while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingOutcome {
    #[serde(flatten)]
    pub decision: RoutingDecision,
    /// Wall-clock time spent routing, including any classifier call.
    pub latency_ms: u64,
    /// False when the decision is a fallback caused by a failure.
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Process-wide fallback values, taken from `[routing]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionDefaults {
    pub model: ModelId,
    pub temperature: f64,
    pub budgets: ReasoningBudgets,
}

impl DecisionDefaults {
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            model: config.default_model_id(),
            temperature: config.default_temperature.clamp(0.0, 1.0),
            budgets: config.reasoning_budgets.clone(),
        }
    }
}

impl Default for DecisionDefaults {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

/// Clean a classifier-generated title.
///
/// Trims, collapses internal whitespace, strips surrounding matched quotes
/// and truncates with an ellipsis. Returns `None` when fewer than
/// [`MIN_TITLE_LENGTH`] characters remain.
pub fn sanitize_title(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let unquoted = strip_quotes(&collapsed);
    if unquoted.chars().count() < MIN_TITLE_LENGTH {
        return None;
    }
    Some(truncate_with_ellipsis(unquoted, MAX_TITLE_LENGTH))
}

/// Title derived from the query itself.
///
/// Modifiers are removed, the remainder is cut at the last word boundary
/// within [`FALLBACK_TITLE_LENGTH`] characters (ellipsis appended when cut),
/// and [`PLACEHOLDER_TITLE`] is used when nothing usable is left.
pub fn fallback_title(query: &str) -> String {
    let stripped = strip_modifiers(query);
    let candidate = if stripped.chars().count() <= FALLBACK_TITLE_LENGTH {
        stripped
    } else {
        let (head, rest) = split_at_char(&stripped, FALLBACK_TITLE_LENGTH);
        let cut = if rest.starts_with(char::is_whitespace) {
            head
        } else {
            match head.rfind(char::is_whitespace) {
                Some(idx) if idx > 0 => &head[..idx],
                _ => head,
            }
        };
        format!("{}{ELLIPSIS}", cut.trim_end())
    };
    sanitize_title(&candidate).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}

/// Pick the generated title when usable, else the query-derived one.
pub fn resolve_title(generated: Option<&str>, query: &str) -> String {
    generated
        .and_then(sanitize_title)
        .unwrap_or_else(|| fallback_title(query))
}

/// Collapse whitespace and bound the explanation length.
pub fn sanitize_explanation(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_with_ellipsis(&collapsed, MAX_EXPLANATION_LENGTH)
}

fn strip_quotes(s: &str) -> &str {
    let mut current = s.trim();
    loop {
        let mut chars = current.chars();
        let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
            return current;
        };
        if !QUOTE_PAIRS.contains(&(first, last)) {
            return current;
        }
        let inner = &current[first.len_utf8()..current.len() - last.len_utf8()];
        if !encloses(inner, first, last) {
            return current;
        }
        current = inner.trim();
    }
}

/// Whether `open ... close` around `inner` is one surrounding pair, rather
/// than the edges of two separate quoted spans.
fn encloses(inner: &str, open: char, close: char) -> bool {
    if open == close {
        return !inner.contains(close);
    }
    let mut depth = 0usize;
    for c in inner.chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            let Some(next) = depth.checked_sub(1) else {
                return false;
            };
            depth = next;
        }
    }
    depth == 0
}

fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let (head, _) = split_at_char(s, keep);
    format!("{}{ELLIPSIS}", head.trim_end())
}

/// Split after `n` characters, respecting UTF-8 boundaries.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn title_strips_matched_quotes() {
        assert_eq!(sanitize_title("  \"Paris trivia\" ").as_deref(), Some("Paris trivia"));
        assert_eq!(sanitize_title("“Quantum crypto”").as_deref(), Some("Quantum crypto"));
        assert_eq!(sanitize_title("'\"nested\"'").as_deref(), Some("nested"));
        assert_eq!(sanitize_title("«Bonjour»").as_deref(), Some("Bonjour"));
    }

    #[test]
    fn title_keeps_unmatched_quotes() {
        assert_eq!(sanitize_title("\"half open").as_deref(), Some("\"half open"));
        assert_eq!(sanitize_title("it's fine'").as_deref(), Some("it's fine'"));
    }

    #[test]
    fn title_keeps_separately_quoted_spans() {
        assert_eq!(
            sanitize_title("\"Foo\" vs \"Bar\"").as_deref(),
            Some("\"Foo\" vs \"Bar\"")
        );
        assert_eq!(
            sanitize_title("“Foo” and “Bar”").as_deref(),
            Some("“Foo” and “Bar”")
        );
        assert_eq!(
            sanitize_title("“The “inner” story”").as_deref(),
            Some("The “inner” story")
        );
    }

    #[test]
    fn short_titles_are_absent() {
        assert_eq!(sanitize_title(""), None);
        assert_eq!(sanitize_title("  x "), None);
        assert_eq!(sanitize_title("\"\""), None);
        assert_eq!(sanitize_title("'a'"), None);
        assert_eq!(sanitize_title("ok").as_deref(), Some("ok"));
    }

    #[test]
    fn long_title_truncated_with_ellipsis() {
        let raw = "A very long conversation title that keeps going well past the limit";
        let title = sanitize_title(raw).unwrap();
        assert!(title.chars().count() <= MAX_TITLE_LENGTH);
        assert!(title.ends_with("..."));
        assert!(title.starts_with("A very long conversation title"));
    }

    #[test]
    fn title_at_limit_untouched() {
        let raw = "x".repeat(MAX_TITLE_LENGTH);
        assert_eq!(sanitize_title(&raw).unwrap(), raw);
    }

    #[test]
    fn title_collapses_newlines() {
        assert_eq!(sanitize_title("Line one\n\nline two").as_deref(), Some("Line one line two"));
    }

    #[test]
    fn fallback_title_short_query() {
        assert_eq!(
            fallback_title("Transcribe and summarize this audio"),
            "Transcribe and summarize this audio"
        );
    }

    #[test]
    fn fallback_title_cuts_at_word_boundary() {
        let title = fallback_title(
            "Analyze the implications of quantum computing on current encryption standards",
        );
        assert_eq!(title, "Analyze the implications of quantum...");
    }

    #[test]
    fn fallback_title_strips_modifiers() {
        assert_eq!(fallback_title("#quick what is 2+2"), "what is 2+2");
    }

    #[test]
    fn fallback_title_without_spaces_hard_cuts() {
        let title = fallback_title(&"z".repeat(100));
        assert_eq!(title, format!("{}...", "z".repeat(40)));
    }

    #[test]
    fn fallback_title_placeholder() {
        assert_eq!(fallback_title(""), PLACEHOLDER_TITLE);
        assert_eq!(fallback_title("#ultrathink"), PLACEHOLDER_TITLE);
        assert_eq!(fallback_title("?"), PLACEHOLDER_TITLE);
    }

    #[test]
    fn resolve_title_prefers_generated() {
        assert_eq!(resolve_title(Some("'Capital of France'"), "q"), "Capital of France");
        assert_eq!(resolve_title(Some(" "), "what is rust"), "what is rust");
        assert_eq!(resolve_title(None, ""), PLACEHOLDER_TITLE);
    }

    #[test]
    fn explanation_bounded() {
        let long = "word ".repeat(200);
        let explanation = sanitize_explanation(&long);
        assert!(explanation.chars().count() <= MAX_EXPLANATION_LENGTH);
        assert!(explanation.ends_with("..."));
        assert_eq!(sanitize_explanation(" Simple  fact. "), "Simple fact.");
    }

    #[test]
    fn reasoning_budget_for_constrained_models() {
        let budgets = ReasoningBudgets::default();
        let r = ReasoningConfig::enabled(ReasoningEffort::High, ModelId::ClaudeOpus, &budgets);
        assert_eq!(r.max_tokens, Some(16_000));
        let r = ReasoningConfig::enabled(ReasoningEffort::Low, ModelId::GeminiPro, &budgets);
        assert_eq!(r.max_tokens, Some(4_000));
    }

    #[test]
    fn reasoning_effort_only_models_have_no_budget() {
        let budgets = ReasoningBudgets::default();
        let r = ReasoningConfig::enabled(ReasoningEffort::Medium, ModelId::Grok, &budgets);
        assert!(r.enabled);
        assert_eq!(r.effort, Some(ReasoningEffort::Medium));
        assert_eq!(r.max_tokens, None);
    }

    #[test]
    fn reasoning_effort_none_disables() {
        let budgets = ReasoningBudgets::default();
        let r = ReasoningConfig::enabled(ReasoningEffort::None, ModelId::ClaudeOpus, &budgets);
        assert_eq!(r, ReasoningConfig::disabled());
    }

    #[test]
    fn media_forced_decision_shape() {
        let d = RoutingDecision::media_forced(AttachmentKind::Audio, "Transcribe this");
        assert_eq!(d.model_id, ModelId::MEDIA);
        assert!(!d.reasoning.enabled);
        assert!(d.auto_switched);
        assert_eq!(d.auto_switch_reason.as_deref(), Some("audio attachment"));
        assert_eq!(d.title, "Transcribe this");
        assert!(d.explanation.starts_with("Audio attachment"));
    }

    #[test]
    fn outcome_serializes_flat() {
        let outcome = RoutingOutcome {
            decision: RoutingDecision::fallback(&DecisionDefaults::default(), "Hi there".into()),
            latency_ms: 12,
            is_valid: false,
            error: Some("boom".into()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["model_id"], "anthropic/claude-sonnet-4.5");
        assert_eq!(json["reasoning"]["enabled"], false);
        assert!(json["reasoning"].get("effort").is_none());
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("auto_switch_reason").is_none());
    }

    proptest! {
        #[test]
        fn sanitized_titles_respect_bounds(raw in "\\PC{0,120}") {
            if let Some(title) = sanitize_title(&raw) {
                let len = title.chars().count();
                prop_assert!((MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&len));
            }
        }

        #[test]
        fn fallback_titles_respect_bounds(query in "\\PC{0,200}") {
            let len = fallback_title(&query).chars().count();
            prop_assert!((MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&len));
        }
    }
}
