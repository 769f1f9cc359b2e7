// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The routing entry point.
//!
//! [`Concierge::route`] strings the layers together:
//! signals -> attachment check -> classifier -> modifiers -> allow-list -> title.
//! It never fails: every error becomes an `is_valid = false` outcome carrying
//! the default decision.

use std::sync::Arc;
use std::time::Instant;

use concierge_config::RoutingConfig;
use concierge_core::ProviderAdapter;
use tracing::{error, info};

use crate::decision::{DecisionDefaults, RoutingDecision, RoutingOutcome, fallback_title};
use crate::engine::{DecisionEngine, EngineSettings};
use crate::modifiers::Modifiers;
use crate::overrides;
use crate::request::RoutingRequest;
use crate::rubric::Rubric;
use crate::signals::extract_signals;

/// Routes chat queries to a downstream model.
///
/// Holds no per-request state; share it behind an `Arc` across tasks.
pub struct Concierge {
    engine: DecisionEngine,
    defaults: DecisionDefaults,
}

impl Concierge {
    /// Build from the `[routing]` section, loading the rubric once.
    pub fn from_config(provider: Arc<dyn ProviderAdapter>, config: &RoutingConfig) -> Self {
        let settings = EngineSettings::from_config(config, Rubric::load(config));
        Self {
            engine: DecisionEngine::new(provider, settings),
            defaults: DecisionDefaults::from_config(config),
        }
    }

    /// Route one request.
    pub async fn route(&self, request: &RoutingRequest) -> RoutingOutcome {
        let started = Instant::now();
        let modifiers = Modifiers::parse(&request.query);

        if let Some(decision) = overrides::forced_by_attachment(request) {
            let outcome = RoutingOutcome {
                decision,
                latency_ms: elapsed_ms(started),
                is_valid: true,
                error: None,
            };
            log_outcome(&outcome);
            return outcome;
        }

        let signals = extract_signals(&request.query);
        let outcome = match self.engine.classify(request, &signals, &modifiers).await {
            Ok(mut candidate) => {
                overrides::apply_modifiers(&mut candidate, &modifiers, &self.defaults);
                let (decision, error) =
                    overrides::finalize(candidate, &request.query, &self.defaults);
                RoutingOutcome {
                    decision,
                    latency_ms: elapsed_ms(started),
                    is_valid: error.is_none(),
                    error,
                }
            }
            Err(e) => {
                let latency_ms = elapsed_ms(started);
                error!(error = %e, latency_ms, "routing call failed, using default decision");
                RoutingOutcome {
                    decision: RoutingDecision::fallback(
                        &self.defaults,
                        fallback_title(&request.query),
                    ),
                    latency_ms,
                    is_valid: false,
                    error: Some(e.to_string()),
                }
            }
        };

        log_outcome(&outcome);
        outcome
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn log_outcome(outcome: &RoutingOutcome) {
    let decision = &outcome.decision;
    info!(
        model = %decision.model_id,
        temperature = decision.temperature,
        reasoning = decision.reasoning.enabled,
        effort = ?decision.reasoning.effort,
        auto_switched = decision.auto_switched,
        is_valid = outcome.is_valid,
        latency_ms = outcome.latency_ms,
        "routing decision"
    );
}
