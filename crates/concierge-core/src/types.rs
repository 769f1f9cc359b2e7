// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider-neutral request and response types exchanged with LLM adapters.

use serde::{Deserialize, Serialize};

/// A single content block inside a provider message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text { text: String },
}

/// A message in the conversation sent to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Content blocks of the message.
    pub content: Vec<ContentBlock>,
}

impl ProviderMessage {
    /// Creates a user message holding a single text block.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }
}

/// How the provider must choose among the supplied tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    /// The model decides whether to call a tool.
    Auto,
    /// The model must call some tool.
    Any,
    /// The model must call the named tool.
    Tool { name: String },
}

/// A request to an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// System prompt, if any.
    pub system_prompt: Option<String>,
    /// Conversation messages.
    pub messages: Vec<ProviderMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature for the call.
    pub temperature: Option<f32>,
    /// Tool definitions as JSON (`name`, `description`, `input_schema`).
    pub tools: Option<Vec<serde_json::Value>>,
    /// Tool selection constraint.
    pub tool_choice: Option<ToolChoice>,
}

/// A tool invocation returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseData {
    /// Provider-assigned invocation id.
    pub id: String,
    /// Name of the invoked tool.
    pub name: String,
    /// Structured tool input.
    pub input: serde_json::Value,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A complete (non-streaming) response from an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Response id.
    pub id: String,
    /// Concatenated text content (may be empty when only tools were called).
    pub content: String,
    /// Tool calls in the order the provider emitted them.
    pub tool_uses: Vec<ToolUseData>,
    /// Model that produced the response.
    pub model: String,
    /// Reason generation stopped.
    pub stop_reason: Option<String>,
    /// Token usage.
    pub usage: TokenUsage,
}

impl ProviderResponse {
    /// Returns the first tool call with the given name.
    pub fn tool_use(&self, name: &str) -> Option<&ToolUseData> {
        self.tool_uses.iter().find(|t| t.name == name)
    }
}
