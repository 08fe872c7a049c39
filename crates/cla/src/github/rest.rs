//! # GitHub REST client
//!
//! Blocking implementation of [`GitHubClient`] against the GitHub v3 API.
//! There is no retry or rate limiting here; a failed call is reported to the
//! caller and the next webhook delivery tries again.

use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::{header, redirect, Method, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{Commit, GitHubClient, Label, PullRequest};
use crate::error::ClientError;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "cla-reconciler/1.0";

/// GitHub API client for the reconciler's seven operations
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct GitHubError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    commit: Commit,
}

impl RestClient {
    /// Create a client for the public GitHub API.
    ///
    /// An empty token sends unauthenticated requests.
    pub fn new(token: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Create a client for another API root (GitHub Enterprise, test servers).
    pub fn with_base_url(base_url: &str, token: impl Into<String>) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        // Membership answers with 302 for callers outside the org; that must
        // surface as an error rather than be followed.
        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            token: token.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .http_client
            .request(method, url)
            .header(header::ACCEPT, "application/vnd.github+json");

        if self.token.is_empty() {
            request
        } else {
            request.header(header::AUTHORIZATION, format!("Bearer {}", self.token))
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send()?;

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|h| h.to_str().ok())
        {
            debug!(remaining = %remaining, "GitHub rate limit");
        }

        Ok(response)
    }

    /// Turn a non-success response into [`ClientError::Api`].
    fn api_error(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response
            .json::<GitHubError>()
            .map(|e| e.message)
            .unwrap_or_else(|_| "no error message".to_string());
        ClientError::Api { status, message }
    }

    fn expect_success(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::api_error(response))
        }
    }
}

impl GitHubClient for RestClient {
    #[instrument(skip(self))]
    fn get_pull_request(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest, ClientError> {
        let url = self.url(&["repos", org, repo, "pulls", &number.to_string()]);
        let response = Self::expect_success(self.send(self.request(Method::GET, url))?)?;
        Ok(response.json()?)
    }

    #[instrument(skip(self))]
    fn get_commit(&self, org: &str, repo: &str, sha: &str) -> Result<Commit, ClientError> {
        let url = self.url(&["repos", org, repo, "commits", sha]);
        let response = Self::expect_success(self.send(self.request(Method::GET, url))?)?;
        let body: CommitResponse = response.json()?;
        Ok(body.commit)
    }

    #[instrument(skip(self))]
    fn is_member(&self, org: &str, login: &str) -> Result<bool, ClientError> {
        let url = self.url(&["orgs", org, "members", login]);
        let response = self.send(self.request(Method::GET, url))?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                context: format!("membership check of '{login}' in '{org}'"),
            }),
        }
    }

    #[instrument(skip(self))]
    fn get_issue_labels(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Label>, ClientError> {
        let mut url = self.url(&["repos", org, repo, "issues", &number.to_string(), "labels"]);
        url.query_pairs_mut().append_pair("per_page", "100");

        let response = Self::expect_success(self.send(self.request(Method::GET, url))?)?;
        let labels: Vec<Label> = response.json()?;

        debug!("Retrieved {} labels for PR #{}", labels.len(), number);
        Ok(labels)
    }

    #[instrument(skip(self))]
    fn add_label(&self, org: &str, repo: &str, number: u64, label: &str) -> Result<(), ClientError> {
        let url = self.url(&["repos", org, repo, "issues", &number.to_string(), "labels"]);
        let body = serde_json::json!({ "labels": [label] });

        Self::expect_success(self.send(self.request(Method::POST, url).json(&body))?)?;
        info!("Added label '{}' to PR #{}", label, number);
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove_label(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        label: &str,
    ) -> Result<(), ClientError> {
        let url = self.url(&[
            "repos",
            org,
            repo,
            "issues",
            &number.to_string(),
            "labels",
            label,
        ]);
        let response = self.send(self.request(Method::DELETE, url))?;

        match response.status() {
            status if status.is_success() => {
                debug!("Removed label '{}' from PR #{}", label, number);
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                // Label doesn't exist, which is fine for removal
                debug!(
                    "Label '{}' not found on PR #{} (already removed)",
                    label, number
                );
                Ok(())
            }
            _ => Err(Self::api_error(response)),
        }
    }

    #[instrument(skip(self, body))]
    fn create_comment(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ClientError> {
        let url = self.url(&["repos", org, repo, "issues", &number.to_string(), "comments"]);
        let payload = serde_json::json!({ "body": body });

        Self::expect_success(self.send(self.request(Method::POST, url).json(&payload))?)?;
        info!("Posted comment on PR #{}", number);
        Ok(())
    }
}
