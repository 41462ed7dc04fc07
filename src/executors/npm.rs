//! npm registry operations
//!
//! Publishing and registry lookups through the `npm` CLI.

use super::ShellExecutor;
use crate::error::Result;
use crate::utils::sanitize;
use std::path::Path;

/// One entry of `npm search --json` output.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SearchEntry {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

pub struct NpmExecutor<'a> {
    shell: &'a dyn ShellExecutor,
    access: Option<String>,
}

impl<'a> NpmExecutor<'a> {
    pub fn new(shell: &'a dyn ShellExecutor) -> Self {
        Self {
            shell,
            access: None,
        }
    }

    /// Pass `--access <level>` on publish.
    ///
    /// `public` lets a scoped package be published publicly the first time.
    pub fn with_access(mut self, access: Option<String>) -> Self {
        self.access = access;
        self
    }

    pub fn publish(&self, dir: &Path) -> Result<String> {
        let dir = sanitize::quote_arg(&dir.to_string_lossy())?;
        let command = match &self.access {
            Some(access) => format!("npm publish {} --access {}", dir, access),
            None => format!("npm publish {}", dir),
        };
        self.shell.run(&command)
    }

    /// `npm view <name>@<version> version`, empty when that version is unknown.
    pub fn view(&self, package_at_version: &str) -> Result<String> {
        sanitize::validate_package_name(package_at_version)?;
        Ok(self
            .shell
            .run(&format!("npm view {} version", package_at_version))?
            .trim()
            .to_string())
    }

    pub fn search(&self, name: &str) -> Result<Vec<SearchEntry>> {
        sanitize::validate_package_name(name)?;
        let stdout = self.shell.run(&format!("npm search {} --json", name))?;
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Whether a package with exactly `name` is in the registry.
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.search(name)?.iter().any(|entry| entry.name == name))
    }

    pub fn unpublish(&self, package_at_version: &str) -> Result<String> {
        sanitize::validate_package_name(package_at_version)?;
        self.shell
            .run(&format!("npm unpublish {}", package_at_version))
    }
}
