//! CLA eligibility rules.
//!
//! A commit passes the gate when its author email is on the trusted domain
//! and the committer is either the author or one of the synthetic identities
//! (web commits, the cherry-picking bot). Authors who are not members of the
//! organization are exempt.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ClaConfig;
use crate::error::ConfigError;
use crate::github::Commit;

/// Matches emails ending in `@<domain>`, case-sensitively.
#[derive(Debug, Clone)]
pub struct TrustedDomain {
    pattern: Regex,
}

impl TrustedDomain {
    /// Compile the matcher for a bare domain such as `example.org`.
    pub fn new(domain: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^.*@{}$", regex::escape(domain)))?;
        Ok(Self { pattern })
    }

    #[must_use]
    pub fn matches(&self, email: &str) -> bool {
        self.pattern.is_match(email)
    }
}

/// Membership of the PR author in the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    Member,
    NonMember,
    /// The lookup failed. Treated like `NonMember`.
    Unknown,
}

impl Membership {
    /// Whether the author is exempt from the gate.
    #[must_use]
    pub const fn is_exempt(self) -> bool {
        !matches!(self, Self::Member)
    }
}

/// The gate decision and the facts it was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub author_domain_ok: bool,
    pub committer_ok: bool,
    pub membership: Membership,
    pub ready: bool,
}

impl Eligibility {
    /// True when the only reason the PR passes is a failed membership lookup.
    #[must_use]
    pub const fn exempted_by_unknown_membership(&self) -> bool {
        matches!(self.membership, Membership::Unknown)
            && !(self.author_domain_ok && self.committer_ok)
    }
}

/// Evaluates commits against one [`ClaConfig`].
#[derive(Debug, Clone)]
pub struct ClaPolicy {
    domain: TrustedDomain,
    web_commit_name: String,
    bot_name: String,
}

impl ClaPolicy {
    pub fn new(config: &ClaConfig) -> Result<Self, ConfigError> {
        let domain =
            TrustedDomain::new(&config.trusted_domain).map_err(|e| ConfigError::Invalid {
                field: "trusted_domain",
                reason: e.to_string(),
            })?;

        Ok(Self {
            domain,
            web_commit_name: config.web_commit_name.clone(),
            bot_name: config.bot_name.clone(),
        })
    }

    /// The author email is on the trusted domain.
    #[must_use]
    pub fn author_domain_ok(&self, commit: &Commit) -> bool {
        self.domain.matches(&commit.author.email)
    }

    /// The committer is the author, the web-commit identity or the bot.
    #[must_use]
    pub fn committer_ok(&self, commit: &Commit) -> bool {
        commit.committer.email == commit.author.email
            || commit.committer.name == self.web_commit_name
            || commit.committer.name == self.bot_name
    }

    /// Decide whether the PR's head commit satisfies the CLA gate.
    #[must_use]
    pub fn evaluate(&self, commit: &Commit, membership: Membership) -> Eligibility {
        let author_domain_ok = self.author_domain_ok(commit);
        let committer_ok = self.committer_ok(commit);

        Eligibility {
            author_domain_ok,
            committer_ok,
            membership,
            ready: (author_domain_ok && committer_ok) || membership.is_exempt(),
        }
    }
}
