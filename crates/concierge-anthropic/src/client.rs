// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! [`AnthropicClient`] posts one [`MessageRequest`] per classifier call.
//! The per-request timeout comes from config and surfaces as
//! [`ConciergeError::Timeout`]; transient statuses can optionally be resent.

use std::time::Duration;

use concierge_core::ConciergeError;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

/// Pause before resending after a transient status.
const RESEND_DELAY: Duration = Duration::from_millis(500);

/// Why a single send did not yield a parsed response.
enum SendFailure {
    /// The API answered with a non-success status.
    Status(StatusCode, String),
    /// Transport, timeout or decoding problem.
    Fatal(ConciergeError),
}

/// Messages API client with the key and version baked into default headers.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    transient_retries: u32,
}

impl AnthropicClient {
    /// Build a client posting to `endpoint` (the full `/v1/messages` URL).
    pub fn new(
        api_key: &SecretString,
        api_version: &str,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConciergeError> {
        let http = reqwest::Client::builder()
            .default_headers(auth_headers(api_key, api_version)?)
            .timeout(timeout)
            .build()
            .map_err(|e| ConciergeError::Provider {
                message: format!("could not build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            timeout,
            transient_retries: 0,
        })
    }

    /// Resend up to `retries` times on 429/500/503/529. Zero by default.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.transient_retries = retries;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post `request` and decode the reply.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ConciergeError> {
        let mut resent = 0;
        loop {
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(SendFailure::Status(status, _))
                    if is_transient(status) && resent < self.transient_retries =>
                {
                    resent += 1;
                    warn!(status = %status, resent, "transient Messages API status, resending");
                    tokio::time::sleep(RESEND_DELAY).await;
                }
                Err(SendFailure::Status(status, body)) => return Err(api_error(status, &body)),
                Err(SendFailure::Fatal(e)) => return Err(e),
            }
        }
    }

    async fn send_once(&self, request: &MessageRequest) -> Result<MessageResponse, SendFailure> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| SendFailure::Fatal(self.transport_error(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SendFailure::Fatal(self.transport_error(e)))?;
        debug!(status = %status, bytes = body.len(), "Messages API replied");

        if !status.is_success() {
            return Err(SendFailure::Status(status, body));
        }
        serde_json::from_str(&body).map_err(|e| {
            SendFailure::Fatal(ConciergeError::Provider {
                message: format!("unreadable Messages API reply: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ConciergeError {
        if e.is_timeout() {
            return ConciergeError::Timeout {
                duration: self.timeout,
            };
        }
        ConciergeError::Provider {
            message: format!("request to Messages API failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

fn auth_headers(api_key: &SecretString, api_version: &str) -> Result<HeaderMap, ConciergeError> {
    let mut key = HeaderValue::from_str(api_key.expose_secret())
        .map_err(|_| ConciergeError::Config("API key contains invalid header characters".into()))?;
    key.set_sensitive(true);
    let version = HeaderValue::from_str(api_version)
        .map_err(|_| ConciergeError::Config(format!("invalid anthropic.api_version `{api_version}`")))?;

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", key);
    headers.insert("anthropic-version", version);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// 429 rate limit, 500/503 server trouble, 529 overloaded.
fn is_transient(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}

/// Prefer the API's own error envelope; fall back to the raw body.
fn api_error(status: StatusCode, body: &str) -> ConciergeError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(envelope) => format!(
            "Anthropic API error ({}): {}",
            envelope.error.type_, envelope.error.message
        ),
        Err(_) => format!("Anthropic API returned {status}: {body}"),
    };
    ConciergeError::Provider {
        message,
        source: None,
    }
}
