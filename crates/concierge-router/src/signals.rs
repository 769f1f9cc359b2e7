// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic query signal extraction.
//!
//! Inspects the raw query with a fixed set of case-insensitive patterns and
//! reports every signal found. No network, no clock, no randomness: the same
//! query always yields the same [`QuerySignals`]. Reconciling conflicting
//! signals (a speed phrase next to a depth phrase) is left to the decision
//! engine.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Bulleted or numbered list item at the start of a line.
static STRUCTURED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:[-*•]|\d{1,3}[.)])\s+\S").expect("valid regex")
});

/// Requests for analysis or explanation.
static DEPTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:analy[sz]e|analysis|why|explain|compare|contrast|evaluate|implications?|trade-?offs?|pros and cons|in detail|how does)\b",
    )
    .expect("valid regex")
});

/// "if ... then" style branching, or otherwise/unless clauses.
static CONDITIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bif\b.+?\bthen\b|\b(?:otherwise|unless)\b").expect("valid regex")
});

/// Back-references to earlier turns.
static PREVIOUS_CONTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:earlier|previous(?:ly)?|above|as (?:you|we) (?:said|mentioned|discussed)|you (?:said|mentioned)|last time|go back to|that answer)\b",
    )
    .expect("valid regex")
});

/// Requests for a fast or short answer.
static SPEED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:quick(?:ly)?|brief(?:ly)?|fast|short answer|tl;?dr|in a nutshell|one word|asap)\b",
    )
    .expect("valid regex")
});

/// Explicit requests for extended thinking.
static EXPLICIT_DEPTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:think (?:hard|harder|deeply|carefully)|step[- ]by[- ]step|thorough(?:ly)?|deep dive|in[- ]depth|comprehensive(?:ly)?|rigorous(?:ly)?)\b",
    )
    .expect("valid regex")
});

/// Structured signals derived from a single query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySignals {
    /// Number of Unicode scalar values in the query.
    pub char_count: usize,
    /// Number of `?` characters.
    pub question_count: usize,
    pub has_structured_formatting: bool,
    pub has_depth_indicators: bool,
    pub has_conditional_logic: bool,
    pub references_previous_context: bool,
    pub has_speed_signals: bool,
    pub has_explicit_depth_signals: bool,
}

/// Extract signals from a raw query.
///
/// Empty or whitespace-only input yields an all-false bundle (the character
/// count still reflects the whitespace).
pub fn extract_signals(query: &str) -> QuerySignals {
    let char_count = query.chars().count();
    if query.trim().is_empty() {
        return QuerySignals {
            char_count,
            ..QuerySignals::default()
        };
    }

    QuerySignals {
        char_count,
        question_count: query.matches('?').count(),
        has_structured_formatting: STRUCTURED_RE.is_match(query),
        has_depth_indicators: DEPTH_RE.is_match(query),
        has_conditional_logic: CONDITIONAL_RE.is_match(query),
        references_previous_context: PREVIOUS_CONTEXT_RE.is_match(query),
        has_speed_signals: SPEED_RE.is_match(query),
        has_explicit_depth_signals: EXPLICIT_DEPTH_RE.is_match(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_query_is_all_false() {
        assert_eq!(extract_signals(""), QuerySignals::default());
        let ws = extract_signals("   \n\t");
        assert_eq!(ws.char_count, 5);
        assert!(!ws.has_speed_signals && !ws.has_structured_formatting);
    }

    #[test]
    fn counts_chars_and_questions() {
        let s = extract_signals("¿Qué? Why? ok");
        assert_eq!(s.char_count, 13);
        assert_eq!(s.question_count, 2);
    }

    #[test]
    fn detects_speed_signals() {
        assert!(extract_signals("Quick question: what's the capital of France?").has_speed_signals);
        assert!(extract_signals("briefly, what is rust").has_speed_signals);
        assert!(extract_signals("tl;dr please").has_speed_signals);
        assert!(!extract_signals("what is the capital of France?").has_speed_signals);
    }

    #[test]
    fn detects_depth_indicators() {
        assert!(extract_signals("Analyze the implications of quantum computing").has_depth_indicators);
        assert!(extract_signals("WHY does this fail").has_depth_indicators);
        assert!(extract_signals("compare tokio and async-std").has_depth_indicators);
        assert!(!extract_signals("hello there").has_depth_indicators);
    }

    #[test]
    fn detects_explicit_depth_signals() {
        assert!(extract_signals("think hard about this").has_explicit_depth_signals);
        assert!(extract_signals("walk me through it step by step").has_explicit_depth_signals);
        assert!(extract_signals("give me an in-depth review").has_explicit_depth_signals);
        assert!(!extract_signals("think about lunch").has_explicit_depth_signals);
    }

    #[test]
    fn detects_structured_formatting() {
        assert!(extract_signals("todo:\n- one\n- two").has_structured_formatting);
        assert!(extract_signals("1. first\n2) second").has_structured_formatting);
        assert!(extract_signals("• bullet").has_structured_formatting);
        assert!(!extract_signals("a - b is negative").has_structured_formatting);
    }

    #[test]
    fn detects_conditional_logic() {
        assert!(extract_signals("if it rains then we stay inside").has_conditional_logic);
        assert!(extract_signals("do it, otherwise skip").has_conditional_logic);
        assert!(extract_signals("unless you disagree").has_conditional_logic);
        assert!(!extract_signals("what if").has_conditional_logic);
    }

    #[test]
    fn detects_previous_context() {
        assert!(extract_signals("as you said earlier").references_previous_context);
        assert!(extract_signals("use the code above").references_previous_context);
        assert!(!extract_signals("write a poem").references_previous_context);
    }

    #[test]
    fn conflicting_signals_are_all_reported() {
        let s = extract_signals("quickly explain, step by step, why the sky is blue");
        assert!(s.has_speed_signals);
        assert!(s.has_depth_indicators);
        assert!(s.has_explicit_depth_signals);
    }

    #[test]
    fn modifier_only_query() {
        let s = extract_signals("#ultrathink");
        assert_eq!(s.char_count, 11);
        assert!(!s.has_depth_indicators);
    }

    #[test]
    fn long_unicode_input() {
        let query = "日本語のテキスト🚀 why? ".repeat(5_000);
        let s = extract_signals(&query);
        assert_eq!(s.question_count, 5_000);
        assert!(s.has_depth_indicators);
    }

    proptest! {
        #[test]
        fn extraction_is_deterministic(query in "\\PC{0,200}") {
            prop_assert_eq!(extract_signals(&query), extract_signals(&query));
        }

        #[test]
        fn char_count_matches_input(query in "\\PC{0,200}") {
            prop_assert_eq!(extract_signals(&query).char_count, query.chars().count());
        }
    }
}
