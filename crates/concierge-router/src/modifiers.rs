// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hashtag modifier parsing.
//!
//! Modifiers are explicit user hints (`#opus`, `#quick`, `#creative`, ...)
//! that override whatever the classifier inferred. They are recognized
//! anywhere in the query, case-insensitively, when preceded by the start of
//! the text, a non-word character or another modifier (`#opus#quick`).
//!
//! Conflicts resolve per category: the last model selector, the last
//! reasoning mode and the last temperature mode in the query win. The three
//! categories are independent, so `#haiku #ultrathink` selects Haiku with
//! high-effort reasoning.

use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

use concierge_core::ModelId;
use regex::Regex;
use serde::Serialize;
use strum::{Display, EnumString};

static MODIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#(ultrathink|quick|opus|sonnet|haiku|grok|gemini|creative|precise)\b")
        .expect("valid regex")
});

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte ranges and values of the modifiers in `query`, in order.
///
/// A tag glued to the end of a word (`C#opus`) is not a modifier; one glued
/// to the end of a previous modifier is.
fn find_modifiers(query: &str) -> Vec<(Range<usize>, Modifier)> {
    let mut found: Vec<(Range<usize>, Modifier)> = Vec::new();
    for m in MODIFIER_RE.find_iter(query) {
        let follows_modifier = found.last().is_some_and(|(range, _)| range.end == m.start());
        let after_word = query[..m.start()].chars().next_back().is_some_and(is_word_char);
        if after_word && !follows_modifier {
            continue;
        }
        if let Ok(modifier) = Modifier::from_str(&m.as_str()[1..]) {
            found.push((m.range(), modifier));
        }
    }
    found
}

/// A recognized hashtag modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Ultrathink,
    Quick,
    Opus,
    Sonnet,
    Haiku,
    Grok,
    Gemini,
    Creative,
    Precise,
}

/// Reasoning override requested by a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningMode {
    /// Reasoning on at maximum effort, flagship model unless a model is named.
    Ultrathink,
    /// Reasoning off, fastest model unless a model is named.
    Quick,
}

/// Temperature override requested by a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureMode {
    Creative,
    Precise,
}

impl TemperatureMode {
    /// Inclusive range the final temperature is clamped into.
    pub fn range(self) -> (f64, f64) {
        match self {
            TemperatureMode::Creative => (0.8, 1.0),
            TemperatureMode::Precise => (0.0, 0.2),
        }
    }

    /// Clamp a temperature into this mode's range.
    pub fn apply(self, temperature: f64) -> f64 {
        let (lo, hi) = self.range();
        temperature.clamp(lo, hi)
    }
}

impl Modifier {
    /// The model this modifier selects, if it is a model selector.
    pub fn model(self) -> Option<ModelId> {
        match self {
            Modifier::Opus => Some(ModelId::ClaudeOpus),
            Modifier::Sonnet => Some(ModelId::ClaudeSonnet),
            Modifier::Haiku => Some(ModelId::ClaudeHaiku),
            Modifier::Grok => Some(ModelId::Grok),
            Modifier::Gemini => Some(ModelId::GeminiPro),
            _ => None,
        }
    }

    pub fn reasoning_mode(self) -> Option<ReasoningMode> {
        match self {
            Modifier::Ultrathink => Some(ReasoningMode::Ultrathink),
            Modifier::Quick => Some(ReasoningMode::Quick),
            _ => None,
        }
    }

    pub fn temperature_mode(self) -> Option<TemperatureMode> {
        match self {
            Modifier::Creative => Some(TemperatureMode::Creative),
            Modifier::Precise => Some(TemperatureMode::Precise),
            _ => None,
        }
    }

    /// The hashtag as typed, lowercased (`#opus`).
    pub fn tag(self) -> String {
        format!("#{self}")
    }
}

/// Modifiers found in a query, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Modifiers(Vec<Modifier>);

impl Modifiers {
    /// Parse every modifier in the query.
    pub fn parse(query: &str) -> Self {
        Self(find_modifiers(query).into_iter().map(|(_, m)| m).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }

    /// Last model selector in the query.
    pub fn model(&self) -> Option<ModelId> {
        self.0.iter().rev().find_map(|m| m.model())
    }

    /// Last reasoning mode in the query.
    pub fn reasoning_mode(&self) -> Option<ReasoningMode> {
        self.0.iter().rev().find_map(|m| m.reasoning_mode())
    }

    /// Last temperature mode in the query.
    pub fn temperature_mode(&self) -> Option<TemperatureMode> {
        self.0.iter().rev().find_map(|m| m.temperature_mode())
    }

    /// Tags in order of appearance, e.g. `["#opus", "#creative"]`.
    pub fn tags(&self) -> Vec<String> {
        self.iter().map(Modifier::tag).collect()
    }
}

/// Remove modifier hashtags from a query and collapse the leftover whitespace.
pub fn strip_modifiers(query: &str) -> String {
    let mut stripped = String::with_capacity(query.len());
    let mut cursor = 0;
    for (range, _) in find_modifiers(query) {
        stripped.push_str(&query[cursor..range.start]);
        cursor = range.end;
    }
    stripped.push_str(&query[cursor..]);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
