//! Snapshot dependency reinstall
//!
//! Snapshot, URL and `latest` dependencies never change their declared
//! version, so yarn never refreshes them. They are removed and added back.

use crate::config::Settings;
use crate::error::Result;
use crate::executors::{ShellExecutor, SystemShell, YarnExecutor};
use crate::manifest::Manifest;
use crate::ui;
use std::path::PathBuf;

const LATEST_TAG: &str = "latest";

/// Dependency categories with their `yarn add` flag.
pub const DEPENDENCY_CATEGORIES: [(&str, &str); 4] = [
    ("dependencies", ""),
    ("devDependencies", "-D"),
    ("optionalDependencies", "-O"),
    ("peerDependencies", "-P"),
];

pub fn run(packages: &[String], settings: &Settings) -> Result<()> {
    ui::header("Update dependencies");

    let shell = SystemShell::new(settings.command_timeout);
    let project_dir = std::env::current_dir()?;
    let updates = DependencyWorker::new(&shell, project_dir).update(packages)?;

    let total: usize = updates.iter().map(|u| u.packages.len()).sum();
    if total > 0 {
        ui::success(&format!("Reinstalled {} package(s)", total));
    }
    Ok(())
}

/// What was reinstalled in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub category: String,
    pub packages: Vec<String>,
}

pub struct DependencyWorker<'a> {
    yarn: YarnExecutor<'a>,
    project_dir: PathBuf,
}

impl<'a> DependencyWorker<'a> {
    /// `project_dir` holds the manifest and must be the directory yarn runs in.
    pub fn new(shell: &'a dyn ShellExecutor, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            yarn: YarnExecutor::new(shell),
            project_dir: project_dir.into(),
        }
    }

    /// Reinstall `packages`, or every snapshot dependency when empty.
    pub fn update(&self, packages: &[String]) -> Result<Vec<CategoryUpdate>> {
        let full_update = packages.is_empty();
        let manifest = Manifest::read_in(&self.project_dir)?;
        let mut updates = Vec::new();

        for (category, flag) in DEPENDENCY_CATEGORIES {
            let Some(declared) = manifest.dependencies(category) else {
                continue;
            };

            let selected: Vec<(String, String)> = if full_update {
                declared
                    .iter()
                    .filter(|(_, version)| is_snapshot_like(version))
                    .cloned()
                    .collect()
            } else {
                packages
                    .iter()
                    .filter_map(|name| {
                        declared
                            .iter()
                            .find(|(declared_name, version)| declared_name == name && !version.is_empty())
                            .cloned()
                    })
                    .collect()
            };

            if selected.is_empty() {
                continue;
            }

            let latest: Vec<String> = declared
                .iter()
                .filter(|(_, version)| version == LATEST_TAG)
                .map(|(name, _)| name.clone())
                .collect();

            let names: Vec<String> = selected.iter().map(|(name, _)| name.clone()).collect();
            ui::keyval(&format!("{} to update", category), &names.join(", "));

            self.yarn.remove(&names)?;
            self.yarn.add(&selected, flag)?;
            self.restore_latest(category, &latest)?;

            updates.push(CategoryUpdate {
                category: category.to_string(),
                packages: names,
            });
        }

        if updates.is_empty() {
            ui::info("No dependencies to update");
        }
        Ok(updates)
    }

    /// Put the `latest` tag back over whatever version yarn pinned.
    fn restore_latest(&self, category: &str, latest: &[String]) -> Result<()> {
        if latest.is_empty() {
            return Ok(());
        }

        let mut manifest = Manifest::read_in(&self.project_dir)?;
        for name in latest {
            manifest.set_dependency(category, name, LATEST_TAG);
        }
        manifest.write()
    }
}

/// Snapshot (contains `-`), URL, or the `latest` tag.
pub fn is_snapshot_like(version: &str) -> bool {
    version.contains('-') || version.starts_with("http") || version == LATEST_TAG
}
