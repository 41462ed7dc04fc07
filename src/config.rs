//! Runtime settings
//!
//! Settings come from `HELPER_SCRIPTS_*` environment variables, read once
//! per run. Script arguments always win over these defaults.

use crate::error::{HelperError, Result};
use crate::project_identity;
use std::time::Duration;

pub const DEFAULT_RELEASE_BRANCH: &str = "master";
pub const DEFAULT_NPM_ACCESS: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The only branch that publishes releases and bumps versions.
    pub release_branch: String,
    /// `--access` value for `npm publish`, `None` to omit the flag.
    pub npm_access: Option<String>,
    /// Subprocess timeout, `None` waits forever.
    pub command_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            release_branch: DEFAULT_RELEASE_BRANCH.to_string(),
            npm_access: Some(DEFAULT_NPM_ACCESS.to_string()),
            command_timeout: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(project_identity::env_get)
    }

    /// Build settings from an arbitrary variable lookup keyed by suffix.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(branch) = lookup("RELEASE_BRANCH")
            && !branch.trim().is_empty()
        {
            settings.release_branch = branch.trim().to_string();
        }

        if let Some(access) = lookup("NPM_ACCESS") {
            let access = access.trim();
            settings.npm_access = if access.is_empty() {
                None
            } else {
                Some(access.to_string())
            };
        }

        if let Some(raw) = lookup("COMMAND_TIMEOUT") {
            let seconds: u64 = raw.trim().parse().map_err(|_| {
                HelperError::Usage(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    project_identity::env_key("COMMAND_TIMEOUT"),
                    raw
                ))
            })?;
            settings.command_timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        }

        Ok(settings)
    }
}
