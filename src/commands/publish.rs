//! Release publishing
//!
//! Publishes packages from the release branch and moves their manifests to
//! the next patch version:
//!
//! ```text
//! determine branch -> guard branch -> (per project: publish -> bump + commit) -> push
//! ```
//!
//! CI must provide an `.npmrc` with a registry token, and must ignore the
//! `auto/ci:` commits this produces or every publish triggers another build.


use crate::config::Settings;
use crate::error::{HelperError, Result};
use crate::executors::{GitExecutor, NpmExecutor, ShellExecutor, SystemShell};
use crate::manifest::{self, Manifest, PackageDescriptor};
use crate::ui;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT_PATH: &str = "/";
const DIST_DIR: &str = "dist";
const COMMIT_PREFIX: &str = "auto/ci";

/// Options for the publish command
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub branch: Option<String>,
    pub project_paths: Vec<String>,
    pub snapshot: bool,
    pub merge_into: Option<String>,
}

pub fn run(options: &PublishOptions, settings: &Settings) -> Result<()> {
    ui::header("Publish");

    let shell = SystemShell::new(settings.command_timeout);
    let root = std::env::current_dir()?;
    let mut publisher = Publisher::new(&shell, root, settings)
        .with_snapshots(options.snapshot)
        .merge_into(options.merge_into.clone());

    let outcome = publisher.start(options.branch.as_deref(), &options.project_paths)?;
    for (label, package) in outcome.summary() {
        ui::keyval(label, &package);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The branch is not the release branch and snapshots are off.
    Skipped { branch: String },
    /// Released packages, each with its bumped version.
    Released {
        branch: String,
        packages: Vec<PackageDescriptor>,
    },
    /// Snapshot versions published from a non-release branch.
    Snapshots {
        branch: String,
        packages: Vec<PackageDescriptor>,
    },
}

impl PublishOutcome {
    /// Log lines: released packages by their next version, snapshots as published.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        match self {
            PublishOutcome::Skipped { .. } => Vec::new(),
            PublishOutcome::Released { packages, .. } => packages
                .iter()
                .map(|p| ("next version", p.full_version()))
                .collect(),
            PublishOutcome::Snapshots { packages, .. } => packages
                .iter()
                .map(|p| ("published", p.full_version()))
                .collect(),
        }
    }
}

pub struct Publisher<'a> {
    git: GitExecutor<'a>,
    npm: NpmExecutor<'a>,
    root: PathBuf,
    release_branch: String,
    snapshots: bool,
    merge_into: Option<String>,
    current_branch: Option<String>,
}

impl<'a> Publisher<'a> {
    /// `root` is the directory project paths are resolved against.
    pub fn new(shell: &'a dyn ShellExecutor, root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            git: GitExecutor::new(shell),
            npm: NpmExecutor::new(shell).with_access(settings.npm_access.clone()),
            root: root.into(),
            release_branch: settings.release_branch.clone(),
            snapshots: false,
            merge_into: None,
            current_branch: None,
        }
    }

    /// Publish `version-<branch>` snapshots from non-release branches instead of skipping.
    pub fn with_snapshots(mut self, enabled: bool) -> Self {
        self.snapshots = enabled;
        self
    }

    /// After a release, merge the release branch into `branch` and push it.
    pub fn merge_into(mut self, branch: Option<String>) -> Self {
        self.merge_into = branch;
        self
    }

    /// Branch the publisher currently works on, once known.
    pub fn current_branch(&self) -> Option<&str> {
        self.current_branch.as_deref()
    }

    /// Run the publishing workflow.
    ///
    /// `branch` defaults to the checked-out branch, `project_paths` to `["/"]`.
    /// Project paths are relative to the root, leading slash or not.
    ///
    /// # Errors
    ///
    /// [`HelperError::AlreadyInRegistry`] when the exact version of a project
    /// is already published; nothing further is published after it. Failed
    /// git or npm commands propagate unchanged.
    pub fn start(&mut self, branch: Option<&str>, project_paths: &[String]) -> Result<PublishOutcome> {
        let branch = self.determine_branch(branch)?;
        ui::keyval("branch", &branch);

        let default_paths = [DEFAULT_PROJECT_PATH.to_string()];
        let project_paths = if project_paths.is_empty() {
            &default_paths[..]
        } else {
            project_paths
        };

        // Releases only ever come from the release branch.
        if branch != self.release_branch {
            if self.snapshots {
                let packages = self.publish_snapshots(&branch, project_paths)?;
                return Ok(PublishOutcome::Snapshots { branch, packages });
            }

            ui::warning(&format!(
                "Current branch '{}' is not '{}', nothing to publish",
                branch, self.release_branch
            ));
            return Ok(PublishOutcome::Skipped { branch });
        }

        let mut released = Vec::with_capacity(project_paths.len());
        for project_path in project_paths {
            let project_dir = self.project_dir(project_path);
            let mut manifest = Manifest::read_in(&project_dir)?;
            let package = manifest.descriptor()?;

            self.publish_package(&project_dir, &package)?;
            released.push(self.increment_version_and_commit(&mut manifest, &package)?);
        }

        self.git.push(&branch)?;

        if let Some(target) = self.merge_into.clone() {
            self.merge_release_into(&target)?;
        }

        ui::success(&format!("Published {} package(s) from '{}'", released.len(), branch));
        Ok(PublishOutcome::Released {
            branch,
            packages: released,
        })
    }

    fn determine_branch(&mut self, requested: Option<&str>) -> Result<String> {
        let checked_out = self.git.current_branch()?;

        let branch = match requested.filter(|b| !b.is_empty()) {
            Some(requested) if requested != checked_out => {
                self.checkout(requested)?;
                requested.to_string()
            }
            Some(requested) => requested.to_string(),
            None => checked_out,
        };

        self.current_branch = Some(branch.clone());
        Ok(branch)
    }

    fn checkout(&mut self, branch: &str) -> Result<()> {
        self.git.fetch()?;
        self.git.checkout(branch)?;
        self.current_branch = Some(branch.to_string());
        Ok(())
    }

    fn project_dir(&self, project_path: &str) -> PathBuf {
        let relative = project_path.trim_start_matches(['/', '\\']);
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    fn publish_package(&self, project_dir: &Path, package: &PackageDescriptor) -> Result<()> {
        let dist = dist_directory(project_dir);
        ui::keyval("package to publish", &dist.display().to_string());
        ui::info("start publishing package...");

        // Guards against pushing an already published version.
        let full_version = package.full_version();
        if self.npm.exists(&package.name)? && !self.npm.view(&full_version)?.is_empty() {
            return Err(HelperError::AlreadyInRegistry {
                package: full_version,
            });
        }

        self.npm.publish(&dist)?;
        Ok(())
    }

    fn increment_version_and_commit(
        &self,
        manifest: &mut Manifest,
        package: &PackageDescriptor,
    ) -> Result<PackageDescriptor> {
        let incremented = manifest::bump_patch(&package.version)?;
        ui::keyval("incremented version", &incremented);

        manifest.set_version(&incremented);
        manifest.write()?;

        self.git.commit(&format!(
            "{}: set version of {} to {}",
            COMMIT_PREFIX, package.name, incremented
        ))?;

        Ok(PackageDescriptor {
            name: package.name.clone(),
            version: incremented,
        })
    }

    fn merge_release_into(&mut self, target: &str) -> Result<()> {
        ui::info(&format!("merging '{}' into '{}'", self.release_branch, target));
        self.checkout(target)?;
        self.git.merge(&self.release_branch)?;
        let branch = self.current_branch.clone().unwrap_or_else(|| target.to_string());
        self.git.push(&branch)?;
        Ok(())
    }

    fn publish_snapshots(
        &self,
        branch: &str,
        project_paths: &[String],
    ) -> Result<Vec<PackageDescriptor>> {
        let suffix = snapshot_suffix(branch);
        let mut published = Vec::with_capacity(project_paths.len());

        for project_path in project_paths {
            let project_dir = self.project_dir(project_path);
            let package = Manifest::read_in(&project_dir)?.descriptor()?;
            let snapshot = PackageDescriptor {
                name: package.name.clone(),
                version: format!("{}-{}", package.version, suffix),
            };

            ui::info(&format!("start publishing snapshot {}...", snapshot.full_version()));

            // Snapshots are republished under the same version.
            if let Err(err) = self.npm.unpublish(&snapshot.full_version()) {
                match err {
                    HelperError::CommandExited { .. } => {
                        ui::verbose(&format!("nothing to unpublish: {}", err));
                    }
                    other => return Err(other),
                }
            }

            let dist = dist_directory(&project_dir);
            self.publish_with_version(&dist, &snapshot.version)?;
            published.push(snapshot);
        }

        Ok(published)
    }

    /// Publish `dist` with its manifest temporarily set to `version`.
    fn publish_with_version(&self, dist: &Path, version: &str) -> Result<()> {
        let mut manifest = Manifest::read_in(dist)?;
        let original = fs::read(manifest.path()).map_err(|e| HelperError::io(manifest.path(), e))?;

        manifest.set_version(version);
        manifest.write()?;

        let published = self.npm.publish(dist);

        fs::write(manifest.path(), original).map_err(|e| HelperError::io(manifest.path(), e))?;
        published.map(|_| ())
    }
}

/// `<dir>/dist` when it exists, else `dir` itself.
pub fn dist_directory(project_dir: &Path) -> PathBuf {
    let dist = project_dir.join(DIST_DIR);
    if dist.exists() {
        dist
    } else {
        project_dir.to_path_buf()
    }
}

/// Branch name as a pre-release suffix: `feature/JIRA-1` -> `feature-JIRA-1`.
pub fn snapshot_suffix(branch: &str) -> String {
    branch.replace('/', "-")
}
