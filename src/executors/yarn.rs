//! Yarn dependency operations
//!
//! Removes and re-adds dependencies of the project in the working directory.

use super::ShellExecutor;
use crate::error::Result;
use crate::utils::sanitize;

pub struct YarnExecutor<'a> {
    shell: &'a dyn ShellExecutor,
}

impl<'a> YarnExecutor<'a> {
    pub fn new(shell: &'a dyn ShellExecutor) -> Self {
        Self { shell }
    }

    pub fn remove(&self, names: &[String]) -> Result<String> {
        sanitize::validate_package_names(names)?;
        self.shell.run(&format!("yarn remove {}", names.join(" ")))
    }

    /// `yarn add <name@version>... <flag>`.
    ///
    /// `specs` are `(name, version)` pairs; versions may be ranges, tags or
    /// URLs and are quoted when needed. An empty `flag` adds to `dependencies`.
    pub fn add(&self, specs: &[(String, String)], flag: &str) -> Result<String> {
        let mut parts = Vec::with_capacity(specs.len());
        for (name, version) in specs {
            sanitize::validate_package_name(name)?;
            parts.push(sanitize::quote_arg(&format!("{}@{}", name, version))?);
        }

        let mut command = format!("yarn add {}", parts.join(" "));
        if !flag.is_empty() {
            command.push(' ');
            command.push_str(flag);
        }
        self.shell.run(&command)
    }
}
