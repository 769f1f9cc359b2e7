// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations. Each returns the text to print on stdout.

use std::sync::Arc;

use concierge_anthropic::AnthropicProvider;
use concierge_config::model::ConciergeConfig;
use concierge_core::ConciergeError;
use concierge_router::{
    Concierge, Modifiers, QuerySignals, RoutingRequest, extract_signals, strip_modifiers,
};
use serde::Serialize;
use tracing::info;

const REDACTED: &str = "********";

/// `concierge route`: one routing call against the configured provider.
pub async fn run_route(
    config: &ConciergeConfig,
    request: RoutingRequest,
) -> Result<String, ConciergeError> {
    let provider = AnthropicProvider::new(&config.anthropic)?;
    let concierge = Concierge::from_config(Arc::new(provider), &config.routing);
    route_json(&concierge, &request).await
}

/// Route and render the outcome as pretty JSON.
pub async fn route_json(
    concierge: &Concierge,
    request: &RoutingRequest,
) -> Result<String, ConciergeError> {
    let outcome = concierge.route(request).await;
    info!(
        attachments = request.attachments.len(),
        is_valid = outcome.is_valid,
        "route command finished"
    );
    to_json(&outcome)
}

/// Signal report for `concierge signals`.
#[derive(Debug, Serialize)]
pub struct SignalReport {
    pub signals: QuerySignals,
    pub modifiers: Modifiers,
    pub stripped_query: String,
}

/// `concierge signals`: local analysis only, no LLM call.
pub fn run_signals(query: &str) -> Result<String, ConciergeError> {
    let report = SignalReport {
        signals: extract_signals(query),
        modifiers: Modifiers::parse(query),
        stripped_query: strip_modifiers(query),
    };
    to_json(&report)
}

/// `concierge config`: effective configuration with the API key masked.
pub fn run_config(config: &ConciergeConfig) -> Result<String, ConciergeError> {
    let mut redacted = config.clone();
    if redacted.anthropic.api_key.is_some() {
        redacted.anthropic.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&redacted)
        .map_err(|e| ConciergeError::Internal(format!("failed to render config: {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ConciergeError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ConciergeError::Internal(format!("failed to serialize output: {e}")))
}
