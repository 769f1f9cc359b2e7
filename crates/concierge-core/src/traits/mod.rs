// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Adapters use `#[async_trait]` for dynamic dispatch compatibility.

pub mod provider;

pub use provider::ProviderAdapter;
