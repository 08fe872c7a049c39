//! GitHub `pull_request` webhook payload (simplified).
//!
//! Only the fields the reconciler needs are modelled; everything else in the
//! payload is ignored by serde.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Action carried by a `pull_request` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    /// PR was opened
    Opened,
    /// PR was reopened
    Reopened,
    /// New commits were pushed to the head branch
    Synchronize,
    /// Title, body or base branch changed
    Edited,
    /// Any other action (closed, labeled, assigned, ...)
    #[serde(other)]
    Other,
}

impl PullRequestAction {
    /// Whether this action can change the head commit or the PR's content.
    ///
    /// Only these actions can change CLA eligibility.
    #[must_use]
    pub const fn may_change_code(self) -> bool {
        matches!(
            self,
            Self::Opened | Self::Reopened | Self::Synchronize | Self::Edited
        )
    }

    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Reopened => "reopened",
            Self::Synchronize => "synchronize",
            Self::Edited => "edited",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PullRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GitHub `pull_request` webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// Action type
    pub action: PullRequestAction,
    /// Pull request as embedded in the event
    pub pull_request: EventPullRequest,
}

/// Pull request as embedded in a webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPullRequest {
    /// PR number
    pub number: u64,
    /// Target branch
    pub base: BaseRef,
}

/// Base reference of a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseRef {
    /// Repository the PR is opened against
    pub repo: EventRepository,
}

/// Repository in a webhook payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRepository {
    /// Repository name
    pub name: String,
    /// Owning organization or user
    pub owner: EventOwner,
}

/// Repository owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOwner {
    /// Owner login
    pub login: String,
}

/// Organization, repository and number of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub org: String,
    pub repo: String,
    pub number: u64,
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.org, self.repo, self.number)
    }
}

impl PullRequestEvent {
    /// Build an event for `org/repo#number`.
    #[must_use]
    pub fn new(action: PullRequestAction, org: &str, repo: &str, number: u64) -> Self {
        Self {
            action,
            pull_request: EventPullRequest {
                number,
                base: BaseRef {
                    repo: EventRepository {
                        name: repo.to_string(),
                        owner: EventOwner {
                            login: org.to_string(),
                        },
                    },
                },
            },
        }
    }

    /// Parse a raw webhook body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// The pull request this event targets, taken from its base repository.
    #[must_use]
    pub fn target(&self) -> PullRequestRef {
        let repo = &self.pull_request.base.repo;
        PullRequestRef {
            org: repo.owner.login.clone(),
            repo: repo.name.clone(),
            number: self.pull_request.number,
        }
    }
}
