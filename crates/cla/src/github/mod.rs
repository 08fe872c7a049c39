//! # GitHub client capability
//!
//! The reconciler talks to GitHub only through [`GitHubClient`], a narrow
//! trait of the seven calls it needs. Hosts inject an implementation at call
//! time:
//!
//! - [`RestClient`]: blocking REST client for the GitHub v3 API
//! - [`DryRunClient`]: wraps another client and only logs mutations
//!
//! Every call blocks until GitHub answers and may fail.

pub mod dry_run;
pub mod rest;

pub use dry_run::DryRunClient;
pub use rest::RestClient;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// GitHub Pull Request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Source branch
    pub head: GitRef,
    /// PR author
    pub user: User,
}

/// Git reference (branch head)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRef {
    /// SHA
    pub sha: String,
}

/// GitHub User
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User login
    pub login: String,
}

/// Git identity attached to a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Signature {
    #[must_use]
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

/// Author and committer of a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub author: Signature,
    pub committer: Signature,
}

/// GitHub Label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
}

impl Label {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Operations the reconciler needs from GitHub.
#[cfg_attr(test, mockall::automock)]
pub trait GitHubClient {
    /// Fetch a pull request.
    fn get_pull_request(&self, org: &str, repo: &str, number: u64)
        -> Result<PullRequest, ClientError>;

    /// Fetch the author and committer of a commit.
    fn get_commit(&self, org: &str, repo: &str, sha: &str) -> Result<Commit, ClientError>;

    /// Whether `login` is a member of `org`.
    fn is_member(&self, org: &str, login: &str) -> Result<bool, ClientError>;

    /// Labels currently on an issue or pull request.
    fn get_issue_labels(&self, org: &str, repo: &str, number: u64)
        -> Result<Vec<Label>, ClientError>;

    /// Add a label to an issue or pull request.
    fn add_label(&self, org: &str, repo: &str, number: u64, label: &str)
        -> Result<(), ClientError>;

    /// Remove a label from an issue or pull request.
    fn remove_label(&self, org: &str, repo: &str, number: u64, label: &str)
        -> Result<(), ClientError>;

    /// Post a comment on an issue or pull request.
    fn create_comment(&self, org: &str, repo: &str, number: u64, body: &str)
        -> Result<(), ClientError>;
}
