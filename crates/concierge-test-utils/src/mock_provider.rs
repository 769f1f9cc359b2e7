// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies,
//! enabling fast, CI-runnable tests without external API calls. Every
//! request is captured for later assertions.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use concierge_core::traits::ProviderAdapter;
use concierge_core::types::{ProviderRequest, ProviderResponse, TokenUsage, ToolUseData};
use concierge_core::{ConciergeError, ModelId};

/// Tool name the classifier is forced to call.
const SELECT_MODEL: &str = "select_model";

/// One scripted provider reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A `select_model` tool call with the given input.
    ToolUse(Value),
    /// Plain text with no tool call.
    Text(String),
    /// A provider error with the given message.
    ProviderError(String),
    /// A timeout error.
    Timeout,
    /// Wait, then produce the inner reply.
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    pub fn tool_use(input: Value) -> Self {
        MockReply::ToolUse(input)
    }

    /// A well-formed selection: reasoning off, fixed explanation and title.
    pub fn selection(model: ModelId, temperature: f64) -> Self {
        MockReply::ToolUse(json!({
            "model_id": model.to_string(),
            "temperature": temperature,
            "reasoning": {"enabled": false},
            "explanation": format!("{} fits this query.", model.family()),
            "title": "Mock conversation"
        }))
    }

    /// A well-formed selection with reasoning enabled at `effort`.
    pub fn reasoning_selection(model: ModelId, temperature: f64, effort: &str) -> Self {
        MockReply::ToolUse(json!({
            "model_id": model.to_string(),
            "temperature": temperature,
            "reasoning": {"enabled": true, "effort": effort},
            "explanation": format!("{} with {effort} reasoning.", model.family()),
            "title": "Mock conversation"
        }))
    }

    pub fn text(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }

    pub fn provider_error(message: &str) -> Self {
        MockReply::ProviderError(message.to_string())
    }

    pub fn delayed(delay: Duration, reply: MockReply) -> Self {
        MockReply::Delayed(delay, Box::new(reply))
    }
}

/// A mock LLM provider that returns scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a Sonnet
/// selection at temperature 0.5 is returned.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of `complete` calls received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::selection(ModelId::ClaudeSonnet, 0.5))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn response(model: String, content: String, tool_uses: Vec<ToolUseData>) -> ProviderResponse {
    let stop_reason = if tool_uses.is_empty() { "end_turn" } else { "tool_use" };
    ProviderResponse {
        id: "mock-resp".to_string(),
        content,
        tool_uses,
        model,
        stop_reason: Some(stop_reason.to_string()),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        },
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ConciergeError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        let mut reply = self.next_reply().await;
        loop {
            match reply {
                MockReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
                MockReply::ToolUse(input) => {
                    let tool = ToolUseData {
                        id: "toolu_mock".to_string(),
                        name: SELECT_MODEL.to_string(),
                        input,
                    };
                    return Ok(response(model, String::new(), vec![tool]));
                }
                MockReply::Text(text) => return Ok(response(model, text, Vec::new())),
                MockReply::ProviderError(message) => {
                    return Err(ConciergeError::Provider {
                        message,
                        source: None,
                    });
                }
                MockReply::Timeout => {
                    return Err(ConciergeError::Timeout {
                        duration: Duration::from_secs(20),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "classifier".to_string(),
            system_prompt: None,
            messages: vec![],
            max_tokens: 100,
            temperature: None,
            tools: None,
            tool_choice: None,
        }
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        let tool = resp.tool_use(SELECT_MODEL).unwrap();
        assert_eq!(tool.input["model_id"], "anthropic/claude-sonnet-4.5");
        assert_eq!(resp.stop_reason.as_deref(), Some("tool_use"));
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let provider = MockProvider::with_replies(vec![
            MockReply::text("first"),
            MockReply::provider_error("second"),
            MockReply::Timeout,
        ]);

        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert!(matches!(
            provider.complete(request()).await,
            Err(ConciergeError::Provider { .. })
        ));
        assert!(matches!(
            provider.complete(request()).await,
            Err(ConciergeError::Timeout { .. })
        ));
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn requests_are_captured() {
        let provider = MockProvider::new();
        provider.complete(request()).await.unwrap();
        let captured = provider.requests().await;
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].model, "classifier");
    }

    #[tokio::test]
    async fn add_reply_after_construction() {
        let provider = MockProvider::new();
        provider.add_reply(MockReply::text("dynamic")).await;
        assert_eq!(provider.complete(request()).await.unwrap().content, "dynamic");
    }

    #[tokio::test]
    async fn delayed_reply_resolves_inner() {
        let provider = MockProvider::with_replies(vec![MockReply::delayed(
            Duration::from_millis(5),
            MockReply::selection(ModelId::ClaudeHaiku, 0.2),
        )]);
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(
            resp.tool_use(SELECT_MODEL).unwrap().input["model_id"],
            "anthropic/claude-haiku-4.5"
        );
    }
}
