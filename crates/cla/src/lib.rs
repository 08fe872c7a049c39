//! CLA label reconciler for GitHub pull requests.
//!
//! This crate provides:
//! - Webhook payload parsing for `pull_request` events
//! - The CLA eligibility policy (trusted email domain, committer identity,
//!   organization membership exemption)
//! - An idempotent transition table keeping exactly one of `<prefix>: yes` /
//!   `<prefix>: no` on each pull request
//! - A narrow [`GitHubClient`] capability with a blocking REST implementation
//!   and a dry-run decorator
//! - An explicit [`HandlerTable`] for hosts that dispatch webhook events
//!
//! # Usage
//!
//! ```no_run
//! use cla::{ClaConfig, ClaReconciler, PullRequestEvent, RestClient};
//!
//! # fn example(body: &[u8]) -> anyhow::Result<()> {
//! let config = ClaConfig::from_env()?;
//! let reconciler = ClaReconciler::new(config)?;
//! let client = RestClient::new(std::env::var("GITHUB_TOKEN")?)?;
//!
//! let event = PullRequestEvent::from_slice(body)?;
//! let outcome = reconciler.reconcile(&client, &event);
//! println!("clean: {}", outcome.is_clean());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod comment;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod github;
pub mod plan;
pub mod policy;
pub mod reconciler;

pub use config::ClaConfig;
pub use dispatch::{HandlerTable, PullRequestHandler};
pub use error::{ClientError, ConfigError};
pub use event::{PullRequestAction, PullRequestEvent, PullRequestRef};
pub use github::{Commit, DryRunClient, GitHubClient, Label, PullRequest, RestClient, Signature};
pub use plan::{plan, ClaLabel, LabelAction, LabelState, Plan};
pub use policy::{ClaPolicy, Eligibility, Membership, TrustedDomain};
pub use reconciler::{AbortReason, ClaReconciler, Outcome, Report};
