// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM provider integrations (Anthropic, test doubles).

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for LLM provider integrations.
///
/// The routing core only needs single-shot completion with tool support;
/// implementations must honor `ProviderRequest::tool_choice` so the
/// classifier call cannot fall back to free-form text.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this provider.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ConciergeError>;
}
