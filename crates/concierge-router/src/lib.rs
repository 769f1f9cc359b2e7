// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query routing for the Concierge.
//!
//! This crate provides:
//! - [`extract_signals`]: pattern-based query signals (pure, deterministic)
//! - [`Modifiers`]: hashtag overrides such as `#opus`, `#quick`, `#creative`
//! - [`DecisionEngine`]: the single tool-forced classifier call
//! - [`overrides`]: attachment forcing, modifier precedence, allow-list fallback
//! - [`Concierge`]: the orchestrator returning a [`RoutingOutcome`] that never fails
//!
//! The router runs before the downstream chat call and picks its model,
//! temperature, reasoning budget and conversation title.

pub mod concierge;
pub mod decision;
pub mod engine;
pub mod modifiers;
pub mod overrides;
pub mod prompt;
pub mod request;
pub mod rubric;
pub mod signals;

pub use concierge::Concierge;
pub use decision::{
    DecisionDefaults, MAX_EXPLANATION_LENGTH, MAX_TITLE_LENGTH, MIN_TITLE_LENGTH,
    PLACEHOLDER_TITLE, ReasoningConfig, RoutingDecision, RoutingOutcome,
};
pub use engine::{Candidate, DecisionEngine, EngineSettings};
pub use modifiers::{Modifier, Modifiers, ReasoningMode, TemperatureMode, strip_modifiers};
pub use request::{
    Attachment, AttachmentKind, DeviceType, RecentContext, RoutingRequest, SessionContext,
};
pub use rubric::{Rubric, RubricSource};
pub use signals::{QuerySignals, extract_signals};
