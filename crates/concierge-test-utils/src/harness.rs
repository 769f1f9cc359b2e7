// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing tests.
//!
//! `TestHarness` assembles a [`Concierge`] over a [`MockProvider`] with the
//! default routing configuration, optionally adjusted through the builder.

use std::sync::Arc;

use concierge_config::RoutingConfig;
use concierge_router::{Concierge, RoutingOutcome, RoutingRequest};

use crate::mock_provider::{MockProvider, MockReply};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<MockReply>,
    routing: RoutingConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            routing: RoutingConfig::default(),
        }
    }

    /// Set the scripted provider replies.
    pub fn with_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.replies = replies;
        self
    }

    /// Replace the whole routing configuration.
    pub fn with_routing_config(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    /// Set an inline rubric.
    pub fn with_rubric(mut self, rubric: &str) -> Self {
        self.routing.rubric = Some(rubric.to_string());
        self
    }

    /// Set the retry count of the classifier call.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.routing.max_retries = max_retries;
        self
    }

    /// Build the harness.
    pub fn build(self) -> TestHarness {
        let mock_provider = Arc::new(MockProvider::with_replies(self.replies));
        let concierge = Concierge::from_config(mock_provider.clone(), &self.routing);
        TestHarness {
            mock_provider,
            concierge,
            routing: self.routing,
        }
    }
}

/// A Concierge wired to a mock provider.
pub struct TestHarness {
    /// The mock LLM provider.
    pub mock_provider: Arc<MockProvider>,
    /// The Concierge under test.
    pub concierge: Concierge,
    /// Routing configuration the Concierge was built from.
    pub routing: RoutingConfig,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Route a bare query with no attachments or context.
    pub async fn route(&self, query: &str) -> RoutingOutcome {
        self.concierge.route(&RoutingRequest::new(query)).await
    }

    /// Route a full request.
    pub async fn route_request(&self, request: &RoutingRequest) -> RoutingOutcome {
        self.concierge.route(request).await
    }

    /// Number of classifier calls made so far.
    pub async fn provider_calls(&self) -> usize {
        self.mock_provider.call_count().await
    }

    /// Add a reply to the mock provider's queue.
    pub async fn add_reply(&self, reply: MockReply) {
        self.mock_provider.add_reply(reply).await;
    }
}
