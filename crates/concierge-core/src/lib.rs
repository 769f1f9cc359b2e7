// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Concierge routing core.
//!
//! This crate provides the error type, the provider adapter trait, the
//! provider-neutral request/response types, and the closed model catalog
//! used throughout the workspace.

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::{ModelId, ReasoningEffort};
pub use error::ConciergeError;
pub use traits::ProviderAdapter;
pub use types::{
    ContentBlock, ProviderMessage, ProviderRequest, ProviderResponse, TokenUsage, ToolChoice,
    ToolUseData,
};
