//! Handler table for `pull_request` events.
//!
//! The host owns a [`HandlerTable`] and registers handlers explicitly; there
//! is no global registry.

use tracing::debug;

use crate::event::PullRequestEvent;
use crate::github::GitHubClient;
use crate::reconciler::{ClaReconciler, Outcome};

/// Something that reacts to `pull_request` events.
pub trait PullRequestHandler {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// One-paragraph help text.
    fn description(&self) -> String;

    /// Handle one event.
    fn handle(&self, client: &dyn GitHubClient, event: &PullRequestEvent) -> Outcome;
}

impl PullRequestHandler for ClaReconciler {
    fn name(&self) -> &'static str {
        "cla"
    }

    fn description(&self) -> String {
        let config = self.config();
        format!(
            "Manages the '{}' and '{}' labels on pull requests as a reaction to pull request \
             events, and warns organization members whose commits are not covered by the CLA \
             ('{}' author email) that they need to sign it before their PR can be merged.",
            config.yes_label(),
            config.no_label(),
            config.trusted_domain
        )
    }

    fn handle(&self, client: &dyn GitHubClient, event: &PullRequestEvent) -> Outcome {
        self.reconcile(client, event)
    }
}

/// Registered `pull_request` handlers, run in registration order.
#[derive(Default)]
pub struct HandlerTable {
    handlers: Vec<Box<dyn PullRequestHandler>>,
}

impl HandlerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler.
    pub fn register<H: PullRequestHandler + 'static>(&mut self, handler: H) -> &mut Self {
        debug!(handler = handler.name(), "Registered pull_request handler");
        self.handlers.push(Box::new(handler));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered handlers, in registration order.
    pub fn handlers(&self) -> impl Iterator<Item = &dyn PullRequestHandler> {
        self.handlers.iter().map(|handler| handler.as_ref())
    }

    /// Run every handler against `event`.
    pub fn dispatch(
        &self,
        client: &dyn GitHubClient,
        event: &PullRequestEvent,
    ) -> Vec<(&'static str, Outcome)> {
        self.handlers
            .iter()
            .map(|handler| {
                debug!(handler = handler.name(), action = %event.action, "Dispatching pull_request event");
                (handler.name(), handler.handle(client, event))
            })
            .collect()
    }
}
