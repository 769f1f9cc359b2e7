// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed catalog of routable models.
//!
//! [`ModelId`] is the allow-list: a routing decision can only ever name one
//! of these variants. Human-friendly names ("opus", "haiku") resolve through
//! a static alias table instead of substring matching on free text.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A model the Concierge is allowed to route to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum ModelId {
    #[strum(serialize = "anthropic/claude-opus-4.5")]
    #[serde(rename = "anthropic/claude-opus-4.5")]
    ClaudeOpus,
    #[strum(serialize = "anthropic/claude-sonnet-4.5")]
    #[serde(rename = "anthropic/claude-sonnet-4.5")]
    ClaudeSonnet,
    #[strum(serialize = "anthropic/claude-haiku-4.5")]
    #[serde(rename = "anthropic/claude-haiku-4.5")]
    ClaudeHaiku,
    #[strum(serialize = "google/gemini-3-pro-preview")]
    #[serde(rename = "google/gemini-3-pro-preview")]
    GeminiPro,
    #[strum(serialize = "x-ai/grok-4.1-fast")]
    #[serde(rename = "x-ai/grok-4.1-fast")]
    Grok,
    #[strum(serialize = "openai/gpt-5.1")]
    #[serde(rename = "openai/gpt-5.1")]
    Gpt,
}

/// Friendly names accepted in place of canonical ids (lowercase).
const ALIASES: &[(&str, ModelId)] = &[
    ("opus", ModelId::ClaudeOpus),
    ("claude-opus", ModelId::ClaudeOpus),
    ("sonnet", ModelId::ClaudeSonnet),
    ("claude-sonnet", ModelId::ClaudeSonnet),
    ("haiku", ModelId::ClaudeHaiku),
    ("claude-haiku", ModelId::ClaudeHaiku),
    ("gemini", ModelId::GeminiPro),
    ("gemini-pro", ModelId::GeminiPro),
    ("grok", ModelId::Grok),
    ("gpt", ModelId::Gpt),
    ("gpt-5", ModelId::Gpt),
];

impl ModelId {
    /// Cheapest, lowest-latency model. Target of `#quick`.
    pub const FASTEST: ModelId = ModelId::ClaudeHaiku;

    /// Most capable model. Target of `#ultrathink`.
    pub const FLAGSHIP: ModelId = ModelId::ClaudeOpus;

    /// The only model that can consume audio and video attachments.
    pub const MEDIA: ModelId = ModelId::GeminiPro;

    /// Resolves a canonical id or an alias, ignoring case and surrounding whitespace.
    pub fn resolve(raw: &str) -> Option<ModelId> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Some(model) = ModelId::iter().find(|m| m.to_string() == needle) {
            return Some(model);
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == needle)
            .map(|(_, model)| *model)
    }

    /// Canonical ids of every allowed model, in declaration order.
    pub fn allowed_ids() -> Vec<String> {
        ModelId::iter().map(|m| m.to_string()).collect()
    }

    /// Whether reasoning effort must be expressed as an explicit token budget.
    ///
    /// Effort-only models accept a qualitative effort label instead.
    pub fn is_token_budget_constrained(self) -> bool {
        match self {
            ModelId::ClaudeOpus
            | ModelId::ClaudeSonnet
            | ModelId::ClaudeHaiku
            | ModelId::GeminiPro => true,
            ModelId::Grok | ModelId::Gpt => false,
        }
    }

    /// Short family name used in logs and explanations.
    pub fn family(self) -> &'static str {
        match self {
            ModelId::ClaudeOpus => "Opus",
            ModelId::ClaudeSonnet => "Sonnet",
            ModelId::ClaudeHaiku => "Haiku",
            ModelId::GeminiPro => "Gemini",
            ModelId::Grok => "Grok",
            ModelId::Gpt => "GPT",
        }
    }
}

/// Coarse control over extended thinking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    High,
    Medium,
    Low,
    None,
}
