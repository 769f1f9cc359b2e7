// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier prompt assembly and the forced output tool.

use concierge_core::ModelId;
use serde_json::{Value, json};

use crate::modifiers::Modifiers;
use crate::request::RoutingRequest;
use crate::rubric::Rubric;
use crate::signals::QuerySignals;

/// Name of the tool the classifier is forced to call.
pub const TOOL_NAME: &str = "select_model";

const INSTRUCTIONS: &str = "\
Route the query in <query> using the rubric above. Consider the <signals>, \
<session>, <recent_context> and <attachments> blocks. Hashtag modifiers in \
<modifiers> are applied after you answer, so choose as if they were absent. \
Always answer by calling the select_model tool exactly once.";

/// JSON definition of the `select_model` tool (`name`, `description`, `input_schema`).
pub fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Select the downstream model, sampling temperature, reasoning settings, \
                        conversation title and a one-sentence explanation for the query.",
        "input_schema": {
            "type": "object",
            "properties": {
                "model_id": {
                    "type": "string",
                    "enum": ModelId::allowed_ids(),
                    "description": "Canonical id of the model that should answer."
                },
                "temperature": {
                    "type": "number",
                    "minimum": 0.0,
                    "maximum": 1.0
                },
                "reasoning": {
                    "type": "object",
                    "properties": {
                        "enabled": {"type": "boolean"},
                        "effort": {
                            "type": "string",
                            "enum": ["high", "medium", "low", "none"]
                        }
                    },
                    "required": ["enabled"]
                },
                "explanation": {
                    "type": "string",
                    "description": "One sentence naming the deciding factor."
                },
                "title": {
                    "type": "string",
                    "description": "Conversation title, 2 to 50 characters."
                }
            },
            "required": ["model_id", "temperature", "reasoning", "explanation", "title"]
        }
    })
}

/// System prompt: the rubric followed by the answering instructions.
pub fn system_prompt(rubric: &Rubric) -> String {
    format!("{}\n\n{INSTRUCTIONS}", rubric.as_str())
}

/// User message carrying every context block and the literal query.
pub fn user_prompt(request: &RoutingRequest, signals: &QuerySignals, modifiers: &Modifiers) -> String {
    let mut blocks = vec![
        format!(
            "<signals>\n\
             char_count: {}\n\
             question_count: {}\n\
             has_structured_formatting: {}\n\
             has_depth_indicators: {}\n\
             has_conditional_logic: {}\n\
             references_previous_context: {}\n\
             has_speed_signals: {}\n\
             has_explicit_depth_signals: {}\n\
             </signals>",
            signals.char_count,
            signals.question_count,
            signals.has_structured_formatting,
            signals.has_depth_indicators,
            signals.has_conditional_logic,
            signals.references_previous_context,
            signals.has_speed_signals,
            signals.has_explicit_depth_signals,
        ),
    ];

    let session = request.session_or_default();
    blocks.push(format!(
        "<session>\nturn_count: {}\nis_first_message: {}\ndevice_type: {}\n</session>",
        session.turn_count(),
        session.is_first_message(),
        session.device_type(),
    ));

    if let Some(recent) = request.recent.as_ref().filter(|r| !r.is_empty()) {
        let mut lines = vec!["<recent_context>".to_string()];
        if let Some(depth) = recent.conversation_depth {
            lines.push(format!("conversation_depth: {depth}"));
        }
        if let Some(message) = recent.last_assistant_message.as_deref()
            && !message.trim().is_empty()
        {
            lines.push(format!("last_assistant_message: {}", message.trim()));
        }
        lines.push("</recent_context>".to_string());
        blocks.push(lines.join("\n"));
    }

    if !request.attachments.is_empty() {
        let listed: Vec<String> = request
            .attachments
            .iter()
            .map(|a| format!("- {} ({})", a.kind, a.mime_type))
            .collect();
        blocks.push(format!("<attachments>\n{}\n</attachments>", listed.join("\n")));
    }

    if !modifiers.is_empty() {
        blocks.push(format!("<modifiers>{}</modifiers>", modifiers.tags().join(" ")));
    }

    blocks.push(format!("<query>{}</query>", request.query));
    blocks.join("\n")
}
