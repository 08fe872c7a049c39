//! # CLA Reconciler
//!
//! Invoked once per `pull_request` event. It reads the PR, its head commit,
//! the author's org membership and the PR's labels, decides whether the CLA
//! gate passes, and issues the label and comment mutations from
//! [`plan`](crate::plan::plan).
//!
//! Nothing here fails from the caller's point of view. A missing PR or commit
//! aborts the invocation; every other failure is logged and the invocation
//! carries on with defaults. The next webhook delivery retries naturally.

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn};

use crate::comment;
use crate::config::ClaConfig;
use crate::error::ConfigError;
use crate::event::{PullRequestAction, PullRequestEvent, PullRequestRef};
use crate::github::GitHubClient;
use crate::plan::{plan, LabelAction, LabelState, Plan};
use crate::policy::{ClaPolicy, Eligibility, Membership};

/// Why an invocation stopped before deciding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    /// The pull request could not be fetched
    PullRequestUnavailable { error: String },
    /// The head commit could not be fetched
    CommitUnavailable { sha: String, error: String },
}

/// What a reconciled invocation saw and did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub target: PullRequestRef,
    pub eligibility: Eligibility,
    /// Labels observed before any mutation.
    pub labels: LabelState,
    /// Mutations attempted, in order.
    pub plan: Plan,
    /// How many of the attempted mutations failed.
    pub failed_mutations: usize,
}

impl Report {
    /// Number of mutations attempted.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.plan.actions.len()
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The action cannot change CLA eligibility
    Ignored { action: PullRequestAction },
    /// A required fetch failed
    Aborted {
        target: PullRequestRef,
        #[serde(flatten)]
        reason: AbortReason,
    },
    /// The labels were reconciled (possibly with no changes)
    Reconciled(Report),
}

impl Outcome {
    /// Reconciled with every mutation succeeding, or nothing to do.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        match self {
            Self::Ignored { .. } => true,
            Self::Aborted { .. } => false,
            Self::Reconciled(report) => report.failed_mutations == 0,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Reconciled(report) => Some(report),
            _ => None,
        }
    }
}

/// Keeps the CLA labels of pull requests in line with their head commit.
#[derive(Debug, Clone)]
pub struct ClaReconciler {
    config: ClaConfig,
    policy: ClaPolicy,
}

impl ClaReconciler {
    pub fn new(config: ClaConfig) -> Result<Self, ConfigError> {
        let policy = ClaPolicy::new(&config)?;
        Ok(Self { config, policy })
    }

    #[must_use]
    pub const fn config(&self) -> &ClaConfig {
        &self.config
    }

    /// Handle one `pull_request` event.
    ///
    /// 1. Ignore actions that cannot change the head commit or content.
    /// 2. Fetch the PR and its head commit; abort if either is unavailable.
    /// 3. Evaluate the gate, exempting non-members.
    /// 4. Read the current labels and execute the transition plan.
    pub fn reconcile(&self, client: &dyn GitHubClient, event: &PullRequestEvent) -> Outcome {
        if !event.action.may_change_code() {
            return Outcome::Ignored {
                action: event.action,
            };
        }

        let target = event.target();
        let span = info_span!(
            "cla",
            org = %target.org,
            repo = %target.repo,
            number = target.number
        );
        let _guard = span.enter();

        info!(action = %event.action, "PR labels may be out of date. Getting pull request info.");
        let pr = match client.get_pull_request(&target.org, &target.repo, target.number) {
            Ok(pr) => pr,
            Err(e) => {
                warn!(error = %e, "Unable to fetch PR-{} from {}/{}", target.number, target.org, target.repo);
                return Outcome::Aborted {
                    target,
                    reason: AbortReason::PullRequestUnavailable {
                        error: e.to_string(),
                    },
                };
            }
        };

        let commit = match client.get_commit(&target.org, &target.repo, &pr.head.sha) {
            Ok(commit) => commit,
            Err(e) => {
                warn!(error = %e, "Unable to get commit-{} from {}/{}", pr.head.sha, target.org, target.repo);
                return Outcome::Aborted {
                    target,
                    reason: AbortReason::CommitUnavailable {
                        sha: pr.head.sha,
                        error: e.to_string(),
                    },
                };
            }
        };

        let membership = match client.is_member(&target.org, &pr.user.login) {
            Ok(true) => Membership::Member,
            Ok(false) => Membership::NonMember,
            Err(e) => {
                error!(
                    error = %e,
                    login = %pr.user.login,
                    "Membership lookup failed; treating author as a non-member"
                );
                Membership::Unknown
            }
        };

        let eligibility = self.policy.evaluate(&commit, membership);
        if eligibility.exempted_by_unknown_membership() {
            warn!(
                login = %pr.user.login,
                "CLA gate passed only because membership is unknown"
            );
        }

        let labels = match client.get_issue_labels(&target.org, &target.repo, target.number) {
            Ok(labels) => LabelState::from_labels(&labels, &self.config),
            Err(e) => {
                warn!(error = %e, "Failed to retrieve labels; assuming none");
                LabelState::default()
            }
        };

        let plan = plan(labels, eligibility.ready);
        if plan.is_noop() {
            let current = if eligibility.ready {
                self.config.yes_label()
            } else {
                self.config.no_label()
            };
            info!("PR has up-to-date {} label.", current);
        }

        // Mutations address the fetched PR, which is authoritative for its number.
        let failed_mutations = self.execute(client, &target.org, &target.repo, pr.number, &plan);

        Outcome::Reconciled(Report {
            target,
            eligibility,
            labels,
            plan,
            failed_mutations,
        })
    }

    /// Attempt every action in order; a failure never stops the next one.
    fn execute(
        &self,
        client: &dyn GitHubClient,
        org: &str,
        repo: &str,
        number: u64,
        plan: &Plan,
    ) -> usize {
        let mut failed = 0;

        for action in &plan.actions {
            let result = match action {
                LabelAction::Add(label) => {
                    let name = label.name(&self.config);
                    client
                        .add_label(org, repo, number, &name)
                        .map_err(|e| warn!(error = %e, "Could not add {} label.", name))
                }
                LabelAction::Remove(label) => {
                    let name = label.name(&self.config);
                    client
                        .remove_label(org, repo, number, &name)
                        .map_err(|e| warn!(error = %e, "Could not remove {} label.", name))
                }
                LabelAction::PostNotSignedComment => {
                    let body = comment::not_signed(
                        &self.config.instructions_url,
                        &self.config.about_this_bot,
                    );
                    client
                        .create_comment(org, repo, number, &body)
                        .map_err(|e| warn!(error = %e, "Could not create CLA not found comment."))
                }
            };

            if result.is_err() {
                failed += 1;
            }
        }

        failed
    }
}
