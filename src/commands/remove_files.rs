//! Pattern-based file removal

use crate::error::{HelperError, Result};
use crate::ui;
use crate::utils::fs::walk_through;
use regex::Regex;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub fn run(search_dir: Option<&str>, pattern: Option<&str>) -> Result<()> {
    let removed = FileWorker::remove_files_by_pattern(
        Path::new(search_dir.unwrap_or_default()),
        pattern.unwrap_or_default(),
    )?;
    ui::verbose(&format!("{} file(s) removed", removed.len()));
    Ok(())
}

pub struct FileWorker;

impl FileWorker {
    /// Delete every file below `search_dir` whose base name matches `pattern`.
    ///
    /// `pattern` is an unanchored regular expression, e.g. `\.spec\.ts$`.
    /// Directories are never removed. Returns the removed paths.
    pub fn remove_files_by_pattern(search_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        if search_dir.as_os_str().is_empty() || pattern.is_empty() {
            return Err(HelperError::Usage(
                "pattern and searchDir properties is required".to_string(),
            ));
        }

        let regex = Regex::new(pattern).map_err(|e| HelperError::InvalidRegex(e.to_string()))?;
        let mut removed = Vec::new();

        walk_through(search_dir, &mut |dir: &Path, name: &OsStr| {
            let path = dir.join(name);
            let is_file = fs::symlink_metadata(&path)
                .map(|m| !m.is_dir())
                .map_err(|e| HelperError::io(&path, e))?;

            if is_file && regex.is_match(&name.to_string_lossy()) {
                fs::remove_file(&path).map_err(|e| HelperError::io(&path, e))?;
                ui::info(&format!("removed file: {}", name.to_string_lossy()));
                removed.push(path);
            }
            Ok(())
        })?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn removes_only_matching_files() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("foo.spec.ts"));
        touch(&tmp.path().join("foo.ts"));
        touch(&tmp.path().join("nested/bar.spec.ts"));
        touch(&tmp.path().join("nested/bar.ts"));

        let removed = FileWorker::remove_files_by_pattern(tmp.path(), r"\.spec\.ts$").unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!tmp.path().join("foo.spec.ts").exists());
        assert!(!tmp.path().join("nested/bar.spec.ts").exists());
        assert!(tmp.path().join("foo.ts").exists());
        assert!(tmp.path().join("nested/bar.ts").exists());
    }

    #[test]
    fn matches_base_name_not_path() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("styles/a.ts"));

        let removed = FileWorker::remove_files_by_pattern(tmp.path(), "^styles").unwrap();
        assert!(removed.is_empty());
        assert!(tmp.path().join("styles/a.ts").exists());
    }

    #[test]
    fn directories_are_kept() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("x.d.ts/inner.txt"));

        FileWorker::remove_files_by_pattern(tmp.path(), r"\.d\.ts$").unwrap();
        assert!(tmp.path().join("x.d.ts/inner.txt").exists());
    }

    #[test]
    fn missing_arguments_are_usage_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileWorker::remove_files_by_pattern(tmp.path(), ""),
            Err(HelperError::Usage(_))
        ));
        assert!(matches!(
            FileWorker::remove_files_by_pattern(Path::new(""), "x"),
            Err(HelperError::Usage(_))
        ));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileWorker::remove_files_by_pattern(tmp.path(), "(unclosed"),
            Err(HelperError::InvalidRegex(_))
        ));
    }
}
