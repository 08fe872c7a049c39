//! Configuration for the CLA reconciler.
//!
//! The reconciler itself reads no environment and no files; hosts build a
//! [`ClaConfig`] with [`ClaConfig::from_env`], [`ClaConfig::from_yaml_file`]
//! or a struct literal and hand it over.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default label prefix, giving `cla: yes` / `cla: no`.
pub const DEFAULT_LABEL_PREFIX: &str = "cla";

/// Committer name GitHub uses for commits made in the web editor.
pub const DEFAULT_WEB_COMMIT_NAME: &str = "GitHub";

/// Committer name of the automation account that cherry-picks commits.
pub const DEFAULT_BOT_NAME: &str = "cla-bot";

/// Default "about this bot" footer embedded in the CLA comment.
pub const DEFAULT_ABOUT_THIS_BOT: &str = "I am a bot that keeps CLA labels on pull requests up to date. \
If you have questions or suggestions related to my behavior, please contact the repository maintainers.";

const ENV_LABEL_PREFIX: &str = "CLA_LABEL_PREFIX";
const ENV_TRUSTED_DOMAIN: &str = "CLA_TRUSTED_DOMAIN";
const ENV_WEB_COMMIT_NAME: &str = "CLA_WEB_COMMIT_NAME";
const ENV_BOT_NAME: &str = "CLA_BOT_NAME";
const ENV_INSTRUCTIONS_URL: &str = "CLA_INSTRUCTIONS_URL";
const ENV_ABOUT_THIS_BOT: &str = "CLA_ABOUT_THIS_BOT";

/// Settings for one CLA gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaConfig {
    /// Prefix of the two managed labels (`<prefix>: yes`, `<prefix>: no`).
    pub label_prefix: String,
    /// Email domain of organization-affiliated authors, e.g. `example.org`.
    ///
    /// `@example.org` and `*@example.org` are accepted and normalized.
    pub trusted_domain: String,
    /// Committer name of the hosting service's web-commit identity.
    pub web_commit_name: String,
    /// Committer name of the automation account.
    pub bot_name: String,
    /// Where authors are sent to complete the CLA.
    pub instructions_url: String,
    /// Footer embedded in the CLA comment.
    pub about_this_bot: String,
}

impl Default for ClaConfig {
    fn default() -> Self {
        Self {
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            trusted_domain: String::new(),
            web_commit_name: DEFAULT_WEB_COMMIT_NAME.to_string(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            instructions_url: String::new(),
            about_this_bot: DEFAULT_ABOUT_THIS_BOT.to_string(),
        }
    }
}

impl ClaConfig {
    /// Build a validated config for `trusted_domain` with every other setting
    /// at its default.
    pub fn new(
        trusted_domain: impl Into<String>,
        instructions_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self {
            trusted_domain: trusted_domain.into(),
            instructions_url: instructions_url.into(),
            ..Self::default()
        }
        .validated()
    }

    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `CLA_TRUSTED_DOMAIN`: trusted email domain
    /// - `CLA_INSTRUCTIONS_URL`: link to the CLA instructions
    ///
    /// # Optional Environment Variables
    /// - `CLA_LABEL_PREFIX` (default: `cla`)
    /// - `CLA_WEB_COMMIT_NAME` (default: `GitHub`)
    /// - `CLA_BOT_NAME` (default: `cla-bot`)
    /// - `CLA_ABOUT_THIS_BOT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let trusted_domain =
            std::env::var(ENV_TRUSTED_DOMAIN).map_err(|_| ConfigError::Missing(ENV_TRUSTED_DOMAIN))?;
        let instructions_url = std::env::var(ENV_INSTRUCTIONS_URL)
            .map_err(|_| ConfigError::Missing(ENV_INSTRUCTIONS_URL))?;

        Self {
            label_prefix: env_or(ENV_LABEL_PREFIX, DEFAULT_LABEL_PREFIX),
            trusted_domain,
            web_commit_name: env_or(ENV_WEB_COMMIT_NAME, DEFAULT_WEB_COMMIT_NAME),
            bot_name: env_or(ENV_BOT_NAME, DEFAULT_BOT_NAME),
            instructions_url,
            about_this_bot: env_or(ENV_ABOUT_THIS_BOT, DEFAULT_ABOUT_THIS_BOT),
        }
        .validated()
    }

    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validated()
    }

    /// Read and parse a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Normalize `trusted_domain` and reject unusable settings.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.trusted_domain = normalize_domain(&self.trusted_domain);

        if self.trusted_domain.is_empty() {
            return Err(ConfigError::Missing("trusted_domain"));
        }
        if self.trusted_domain.contains(char::is_whitespace) || self.trusted_domain.contains('@')
        {
            return Err(ConfigError::Invalid {
                field: "trusted_domain",
                reason: format!("'{}' is not a domain", self.trusted_domain),
            });
        }
        if self.label_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "label_prefix",
                reason: "must not be empty".to_string(),
            });
        }
        if self.instructions_url.trim().is_empty() {
            return Err(ConfigError::Missing("instructions_url"));
        }

        Ok(self)
    }

    /// Label applied when the CLA gate passes.
    #[must_use]
    pub fn yes_label(&self) -> String {
        format!("{}: yes", self.label_prefix)
    }

    /// Label applied when the CLA gate fails.
    #[must_use]
    pub fn no_label(&self) -> String {
        format!("{}: no", self.label_prefix)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// `*@example.org`, `@example.org` and `example.org` all mean `example.org`.
fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('*').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            ENV_LABEL_PREFIX,
            ENV_TRUSTED_DOMAIN,
            ENV_WEB_COMMIT_NAME,
            ENV_BOT_NAME,
            ENV_INSTRUCTIONS_URL,
            ENV_ABOUT_THIS_BOT,
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_label_names() {
        let config = ClaConfig::new("example.org", "https://example.org/cla").unwrap();
        assert_eq!(config.yes_label(), "cla: yes");
        assert_eq!(config.no_label(), "cla: no");

        let config = ClaConfig {
            label_prefix: "caicloud-cla".to_string(),
            ..config
        };
        assert_eq!(config.yes_label(), "caicloud-cla: yes");
        assert_eq!(config.no_label(), "caicloud-cla: no");
    }

    #[test]
    fn test_domain_forms_are_normalized() {
        for raw in ["example.org", "@example.org", "*@example.org", "  *@example.org "] {
            let config = ClaConfig::new(raw, "https://example.org/cla").unwrap();
            assert_eq!(config.trusted_domain, "example.org", "input {raw:?}");
        }
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        assert!(matches!(
            ClaConfig::new("", "https://example.org/cla"),
            Err(ConfigError::Missing("trusted_domain"))
        ));
        assert!(matches!(
            ClaConfig::new("*@", "https://example.org/cla"),
            Err(ConfigError::Missing("trusted_domain"))
        ));
        assert!(matches!(
            ClaConfig::new("exa mple.org", "https://example.org/cla"),
            Err(ConfigError::Invalid { field: "trusted_domain", .. })
        ));
        assert!(matches!(
            ClaConfig::new("example.org", " "),
            Err(ConfigError::Missing("instructions_url"))
        ));

        let no_prefix = ClaConfig {
            label_prefix: String::new(),
            trusted_domain: "example.org".to_string(),
            instructions_url: "https://example.org/cla".to_string(),
            ..ClaConfig::default()
        };
        assert!(matches!(
            no_prefix.validated(),
            Err(ConfigError::Invalid { field: "label_prefix", .. })
        ));
    }

    #[test]
    fn test_from_yaml_applies_defaults() {
        let config = ClaConfig::from_yaml_str(
            "trusted_domain: \"*@caicloud.io\"\n\
             instructions_url: https://github.com/caicloud/engineering/blob/master/docs/CLA.md\n\
             bot_name: caicloud-bot\n",
        )
        .unwrap();

        assert_eq!(config.trusted_domain, "caicloud.io");
        assert_eq!(config.bot_name, "caicloud-bot");
        assert_eq!(config.label_prefix, DEFAULT_LABEL_PREFIX);
        assert_eq!(config.web_commit_name, DEFAULT_WEB_COMMIT_NAME);
        assert_eq!(config.about_this_bot, DEFAULT_ABOUT_THIS_BOT);
    }

    #[test]
    fn test_from_yaml_requires_domain() {
        let err = ClaConfig::from_yaml_str("instructions_url: https://example.org/cla\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("trusted_domain")));

        let err = ClaConfig::from_yaml_str("label_prefix: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        assert!(matches!(
            ClaConfig::from_env(),
            Err(ConfigError::Missing(ENV_TRUSTED_DOMAIN))
        ));

        std::env::set_var(ENV_TRUSTED_DOMAIN, "@example.org");
        std::env::set_var(ENV_INSTRUCTIONS_URL, "https://example.org/cla");
        std::env::set_var(ENV_LABEL_PREFIX, "example-cla");

        let config = ClaConfig::from_env().unwrap();
        assert_eq!(config.trusted_domain, "example.org");
        assert_eq!(config.yes_label(), "example-cla: yes");
        assert_eq!(config.bot_name, DEFAULT_BOT_NAME);

        clear_env();
    }
}
