//! git operations
//!
//! Thin, intention-revealing wrappers over the `git` CLI.

use super::ShellExecutor;
use crate::error::Result;
use crate::project_identity::GIT_REMOTE;

pub struct GitExecutor<'a> {
    shell: &'a dyn ShellExecutor,
}

impl<'a> GitExecutor<'a> {
    pub fn new(shell: &'a dyn ShellExecutor) -> Self {
        Self { shell }
    }

    /// Raw `git branch` listing.
    pub fn branch(&self) -> Result<String> {
        self.shell.run("git branch")
    }

    /// Name of the checked-out branch, taken from the `*` line of `git branch`.
    ///
    /// Empty when no line is marked.
    pub fn current_branch(&self) -> Result<String> {
        Ok(parse_current_branch(&self.branch()?))
    }

    pub fn fetch(&self) -> Result<String> {
        self.shell
            .run(&format!("git fetch {} --progress --prune", GIT_REMOTE))
    }

    /// Create a local branch tracking `origin/<name>` and switch to it.
    pub fn checkout(&self, name: &str) -> Result<String> {
        self.shell
            .run(&format!("git checkout --track {}/{}", GIT_REMOTE, name))
    }

    pub fn merge(&self, branch: &str) -> Result<String> {
        self.shell.run(&format!("git merge --no-ff {}", branch))
    }

    /// Commit every tracked change, skipping hooks.
    pub fn commit(&self, message: &str) -> Result<String> {
        self.shell.run(&format!(
            "git commit --all --no-verify --message {}",
            quote(message)
        ))
    }

    pub fn push(&self, branch: &str) -> Result<String> {
        self.shell
            .run(&format!("git push --no-verify {} {}", GIT_REMOTE, branch))
    }

    /// Last commit as `<short-sha> <subject>`, trimmed.
    pub fn last_commit(&self) -> Result<String> {
        Ok(self.shell.run("git log -1 --oneline")?.trim().to_string())
    }
}

pub fn parse_current_branch(listing: &str) -> String {
    listing
        .lines()
        .find(|line| line.starts_with('*'))
        .map(|line| line.trim_start_matches('*').trim().to_string())
        .unwrap_or_default()
}

/// Double-quote a value for the command string, escaping what the shell
/// splitter would otherwise interpret.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
