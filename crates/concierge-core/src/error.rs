// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Concierge routing core.

use thiserror::Error;

/// The primary error type used across the provider trait and routing operations.
#[derive(Debug, Error)]
pub enum ConciergeError {
    /// Configuration errors (missing API key, unreadable rubric file, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM provider errors (API failure, transport failure, unparseable body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered but produced no usable structured result.
    #[error("invalid classifier output: {0}")]
    InvalidOutput(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConciergeError {
    /// Whether a second attempt at the same call could plausibly succeed.
    ///
    /// Transport and provider failures are retryable; a model that ignored
    /// the output schema once is expected to do so again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Timeout { .. })
    }
}
