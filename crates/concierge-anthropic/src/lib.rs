// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude provider adapter for the Concierge classifier call.
//!
//! This crate implements [`ProviderAdapter`] for the Anthropic Messages API.
//! Only single-shot completion is supported: the router forces one tool call
//! and reads its structured input.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use concierge_config::AnthropicConfig;
use concierge_core::error::ConciergeError;
use concierge_core::traits::ProviderAdapter;
use concierge_core::types::{
    ContentBlock, ProviderRequest, ProviderResponse, TokenUsage, ToolChoice, ToolUseData,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{
    ApiContent, ApiContentBlock, ApiMessage, ApiToolChoice, MessageRequest, ResponseContentBlock,
    ToolDefinition,
};

/// Classifier backend over the Anthropic Messages API.
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Build from the `[anthropic]` section. The key comes from
    /// `anthropic.api_key`, else `ANTHROPIC_API_KEY`; neither is a config error.
    pub fn new(config: &AnthropicConfig) -> Result<Self, ConciergeError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = AnthropicClient::new(
            &api_key,
            &config.api_version,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_max_retries(config.max_retries);

        info!(
            endpoint = client.endpoint(),
            timeout_secs = config.timeout_secs,
            "anthropic classifier backend ready"
        );

        Ok(Self { client })
    }

    pub fn with_client(client: AnthropicClient) -> Self {
        Self { client }
    }

    /// Tools that do not parse as a [`ToolDefinition`] are dropped.
    fn to_message_request(request: &ProviderRequest) -> MessageRequest {
        let messages: Vec<ApiMessage> = request
            .messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.clone(),
                content: api_content(&m.content),
            })
            .collect();

        let tools = request
            .tools
            .as_ref()
            .map(|tool_values| {
                tool_values
                    .iter()
                    .filter_map(|v| serde_json::from_value::<ToolDefinition>(v.clone()).ok())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty());

        let tool_choice = request.tool_choice.as_ref().map(|choice| match choice {
            ToolChoice::Auto => ApiToolChoice::Auto,
            ToolChoice::Any => ApiToolChoice::Any,
            ToolChoice::Tool { name } => ApiToolChoice::Tool { name: name.clone() },
        });

        MessageRequest {
            model: request.model.clone(),
            messages,
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools,
            tool_choice,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ConciergeError> {
        let api_request = Self::to_message_request(&request);
        let response = self.client.complete_message(&api_request).await?;

        let mut content = String::new();
        let mut tool_uses = Vec::new();
        for block in response.content {
            match block {
                ResponseContentBlock::Text { text } => content.push_str(&text),
                ResponseContentBlock::ToolUse { id, name, input } => {
                    tool_uses.push(ToolUseData { id, name, input })
                }
                ResponseContentBlock::Other => {}
            }
        }

        debug!(
            model = %response.model,
            tool_calls = tool_uses.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "classifier completion received"
        );

        Ok(ProviderResponse {
            id: response.id,
            content,
            tool_uses,
            model: response.model,
            stop_reason: response.stop_reason,
            usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<SecretString, ConciergeError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(SecretString::from(key.clone()));
    }

    std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            ConciergeError::Config(
                "no Anthropic API key: set anthropic.api_key or ANTHROPIC_API_KEY".into(),
            )
        })
}

/// A lone text block is sent as a plain string.
fn api_content(blocks: &[ContentBlock]) -> ApiContent {
    if let [ContentBlock::Text { text }] = blocks {
        return ApiContent::Text(text.clone());
    }

    ApiContent::Blocks(
        blocks
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => ApiContentBlock::Text { text: text.clone() },
            })
            .collect(),
    )
}
