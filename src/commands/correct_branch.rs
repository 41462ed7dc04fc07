//! Branch name correction for CI servers
//!
//! Some CI servers report the source branch of a merge instead of the branch
//! that received it. The last commit subject tells the real target.

use crate::config::Settings;
use crate::error::{HelperError, Result};
use crate::executors::{GitExecutor, ShellExecutor, SystemShell};
use crate::project_identity::GIT_REMOTE;
use crate::ui;
use regex::Regex;
use std::sync::LazyLock;

/// Merges that can only land on the release branch.
static INTO_RELEASE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Merge branch '.+'$",
        r"Merge remote-tracking branch '.+'$",
        r"Merge pull request .+ from .+$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex pattern"))
    .collect()
});

/// Merges naming their target branch in the first capture group.
static INTO_BRANCH: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Merge remote-tracking branch 'origin/.+' into (.+)$",
        r"Merge branch '.+' into (.+)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex pattern"))
    .collect()
});

/// Print the corrected branch alone on stdout.
pub fn run(branch: Option<&str>, settings: &Settings) -> Result<()> {
    let branch = branch.filter(|b| !b.trim().is_empty()).ok_or_else(|| {
        HelperError::Usage(
            "Must pass auto calculated branch name as run param with key \"branch\"".to_string(),
        )
    })?;

    let shell = SystemShell::new(settings.command_timeout);
    let corrected = BranchCorrector::new(&shell, settings.release_branch.clone()).correct(branch)?;
    ui::result(&corrected);
    Ok(())
}

pub struct BranchCorrector<'a> {
    git: GitExecutor<'a>,
    release_branch: String,
}

impl<'a> BranchCorrector<'a> {
    pub fn new(shell: &'a dyn ShellExecutor, release_branch: impl Into<String>) -> Self {
        Self {
            git: GitExecutor::new(shell),
            release_branch: release_branch.into(),
        }
    }

    /// The branch the last commit actually landed on, or `branch` unchanged
    /// when the last commit is not a merge.
    pub fn correct(&self, branch: &str) -> Result<String> {
        if branch.trim().is_empty() {
            return Err(HelperError::Usage("--branch is required".to_string()));
        }

        let commit = self.git.last_commit()?;
        ui::keyval("last commit", &commit);

        let corrected = correct_from_commit(&commit, branch, &self.release_branch)?;
        if corrected != branch {
            ui::info(&format!("branch corrected: {} -> {}", branch, corrected));
        }
        Ok(corrected)
    }
}

/// Pure part of [`BranchCorrector::correct`].
pub fn correct_from_commit(commit: &str, branch: &str, release_branch: &str) -> Result<String> {
    let commit = commit.trim();

    if INTO_RELEASE.iter().any(|re| re.is_match(commit)) {
        return Ok(format!("{}/{}", GIT_REMOTE, release_branch));
    }

    let targets: Vec<&str> = INTO_BRANCH
        .iter()
        .filter_map(|re| re.captures(commit))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    match targets.as_slice() {
        [] => Ok(branch.to_string()),
        [target] => Ok(with_remote(target)),
        _ => Err(HelperError::AmbiguousBranch {
            commit: commit.to_string(),
            count: targets.len(),
        }),
    }
}

fn with_remote(branch: &str) -> String {
    let prefix = format!("{}/", GIT_REMOTE);
    if branch.starts_with(&prefix) {
        branch.to_string()
    } else {
        format!("{}{}", prefix, branch)
    }
}
