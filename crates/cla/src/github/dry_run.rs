//! Client decorator that reads for real and only logs writes.

use tracing::info;

use super::{Commit, GitHubClient, Label, PullRequest};
use crate::error::ClientError;

/// Delegates reads to `inner`; label and comment mutations are logged and
/// reported as successful without reaching GitHub.
#[derive(Debug, Clone)]
pub struct DryRunClient<C> {
    inner: C,
}

impl<C: GitHubClient> DryRunClient<C> {
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Unwrap the decorated client.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: GitHubClient> GitHubClient for DryRunClient<C> {
    fn get_pull_request(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest, ClientError> {
        self.inner.get_pull_request(org, repo, number)
    }

    fn get_commit(&self, org: &str, repo: &str, sha: &str) -> Result<Commit, ClientError> {
        self.inner.get_commit(org, repo, sha)
    }

    fn is_member(&self, org: &str, login: &str) -> Result<bool, ClientError> {
        self.inner.is_member(org, login)
    }

    fn get_issue_labels(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Label>, ClientError> {
        self.inner.get_issue_labels(org, repo, number)
    }

    fn add_label(&self, org: &str, repo: &str, number: u64, label: &str) -> Result<(), ClientError> {
        info!(dry_run = true, "Would add label '{}' to {}/{}#{}", label, org, repo, number);
        Ok(())
    }

    fn remove_label(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> Result<(), ClientError> {
        info!(dry_run = true, "Would remove label '{}' from {}/{}#{}", label, org, repo, number);
        Ok(())
    }

    fn create_comment(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ClientError> {
        info!(
            dry_run = true,
            body_len = body.len(),
            "Would comment on {}/{}#{}",
            org,
            repo,
            number
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{GitRef, MockGitHubClient, User};

    #[test]
    fn test_reads_pass_through_and_writes_are_swallowed() {
        let mut inner = MockGitHubClient::new();
        inner
            .expect_get_pull_request()
            .withf(|org, repo, number| org == "example" && repo == "widgets" && *number == 7)
            .times(1)
            .returning(|_, _, number| {
                Ok(PullRequest {
                    number,
                    head: GitRef {
                        sha: "abc".to_string(),
                    },
                    user: User {
                        login: "octocat".to_string(),
                    },
                })
            });
        inner
            .expect_get_issue_labels()
            .times(1)
            .returning(|_, _, _| Ok(vec![Label::new("cla: no")]));
        inner.expect_add_label().never();
        inner.expect_remove_label().never();
        inner.expect_create_comment().never();

        let client = DryRunClient::new(inner);

        let pr = client.get_pull_request("example", "widgets", 7).unwrap();
        assert_eq!(pr.user.login, "octocat");
        assert_eq!(
            client.get_issue_labels("example", "widgets", 7).unwrap(),
            vec![Label::new("cla: no")]
        );

        assert!(client.remove_label("example", "widgets", 7, "cla: no").is_ok());
        assert!(client.add_label("example", "widgets", 7, "cla: yes").is_ok());
        assert!(client.create_comment("example", "widgets", 7, "hello").is_ok());
    }
}
