//! Declaration bundling
//!
//! Generates an `index.d.ts` that re-exports every declaration file of a
//! build output tree.

use crate::error::{HelperError, Result};
use crate::project_identity::DECLARATION_BUNDLE_NAME;
use crate::ui;
use crate::utils::fs::{create_directory, walk_through};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_DIR: &str = "dist";
const DECLARATION_SUFFIX: &str = ".d.ts";

/// `src` defaults to `dist`, `dist` defaults to `src`.
pub fn run(src: Option<&str>, dist: Option<&str>) -> Result<()> {
    let src = src.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SOURCE_DIR);
    let dist = dist.filter(|d| !d.is_empty()).unwrap_or(src);
    Bundler::bundle(Path::new(src), Path::new(dist))?;
    Ok(())
}

pub struct Bundler;

impl Bundler {
    /// Write `<to_dir>/index.d.ts` re-exporting each `*.d.ts` below `from_dir`.
    ///
    /// Statements are in discovery order and newline-joined, with no trailing
    /// newline. A bundle already inside `from_dir` is not re-exported.
    pub fn bundle(from_dir: &Path, to_dir: &Path) -> Result<Vec<String>> {
        let output = to_dir.join(DECLARATION_BUNDLE_NAME);
        // Compared resolved, so `dist` and `./dist` name the same bundle.
        let previous_bundle = fs::canonicalize(&output).ok();
        let mut declarations: Vec<PathBuf> = Vec::new();

        walk_through(from_dir, &mut |dir: &Path, name: &OsStr| {
            let path = dir.join(name);
            let is_declaration = name.to_string_lossy().ends_with(DECLARATION_SUFFIX);
            let is_previous_bundle = previous_bundle
                .as_ref()
                .is_some_and(|bundle| fs::canonicalize(&path).ok().as_ref() == Some(bundle));
            if is_declaration && path.is_file() && !is_previous_bundle {
                declarations.push(path);
            }
            Ok(())
        })?;

        let statements: Vec<String> = declarations
            .iter()
            .filter_map(|path| module_specifier(from_dir, path))
            .map(|module| format!("export * from './{}';", module))
            .collect();

        create_directory(to_dir)?;
        fs::write(&output, statements.join("\n")).map_err(|e| HelperError::io(&output, e))?;

        ui::keyval("declarations bundled", &statements.len().to_string());
        ui::verbose(&format!("wrote {}", output.display()));
        Ok(statements)
    }
}

/// `from/a/b.d.ts` -> `a/b`, with `/` separators on every platform.
fn module_specifier(from_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(from_dir).ok()?;
    let relative = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    relative
        .strip_suffix(DECLARATION_SUFFIX)
        .map(str::to_string)
}
