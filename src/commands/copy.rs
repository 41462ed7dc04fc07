//! Build artifact copying

use crate::error::{HelperError, Result};
use crate::ui;
use crate::utils::fs::create_directory;
use std::fs;
use std::path::{Path, PathBuf};

/// Copy each source into `target`, creating `target` when missing.
///
/// Files keep their name when `target` is a directory. Directories are
/// mirrored under `target/<basename(source)>`.
pub fn copy(sources: &[PathBuf], target: &Path) -> Result<()> {
    if sources.is_empty() {
        return Err(HelperError::Usage("at least one source is required".to_string()));
    }
    if target.as_os_str().is_empty() {
        return Err(HelperError::Usage("--target is required".to_string()));
    }

    create_directory(target)?;

    for source in sources {
        let metadata = fs::symlink_metadata(source).map_err(|e| HelperError::io(source, e))?;
        if metadata.is_dir() {
            copy_directory(source, target)?;
        } else {
            copy_file(source, target)?;
        }
        ui::verbose(&format!("copied {} -> {}", source.display(), target.display()));
    }

    ui::success(&format!("Copied {} source(s) to {}", sources.len(), target.display()));
    Ok(())
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    let destination = match source.file_name() {
        Some(name) if target.is_dir() => target.join(name),
        _ => target.to_path_buf(),
    };
    fs::copy(source, &destination).map_err(|e| HelperError::io(&destination, e))?;
    Ok(())
}

fn copy_directory(source: &Path, target: &Path) -> Result<()> {
    let folder = match source.file_name() {
        Some(name) => target.join(name),
        None => target.to_path_buf(),
    };
    create_directory(&folder)?;

    let mut entries: Vec<PathBuf> = fs::read_dir(source)
        .map_err(|e| HelperError::io(source, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .map_err(|e| HelperError::io(source, e))?;
    entries.sort();

    for entry in entries {
        let is_dir = fs::symlink_metadata(&entry)
            .map(|m| m.is_dir())
            .map_err(|e| HelperError::io(&entry, e))?;
        if is_dir {
            copy_directory(&entry, &folder)?;
        } else {
            copy_file(&entry, &folder)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_are_copied_into_target_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("README.md");
        fs::write(&file, "readme").unwrap();
        let target = tmp.path().join("dist");

        copy(&[file], &target).unwrap();
        assert_eq!(fs::read_to_string(target.join("README.md")).unwrap(), "readme");
    }

    #[test]
    fn directories_are_mirrored_under_their_basename() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("img")).unwrap();
        fs::write(assets.join("a.css"), "a").unwrap();
        fs::write(assets.join("img/logo.svg"), [0u8, 1, 2]).unwrap();
        let target = tmp.path().join("out/dist");

        copy(&[assets], &target).unwrap();

        assert_eq!(fs::read_to_string(target.join("assets/a.css")).unwrap(), "a");
        assert_eq!(fs::read(target.join("assets/img/logo.svg")).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn existing_target_files_are_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("package.json");
        fs::write(&file, "new").unwrap();
        let target = tmp.path().join("dist");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("package.json"), "old").unwrap();

        copy(&[file], &target).unwrap();
        assert_eq!(fs::read_to_string(target.join("package.json")).unwrap(), "new");
    }

    #[test]
    fn missing_source_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = copy(&[tmp.path().join("nope")], &tmp.path().join("dist")).unwrap_err();
        assert!(matches!(err, HelperError::IoError { .. }));
    }

    #[test]
    fn arguments_are_required() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(copy(&[], tmp.path()), Err(HelperError::Usage(_))));
        assert!(matches!(
            copy(&[tmp.path().to_path_buf()], Path::new("")),
            Err(HelperError::Usage(_))
        ));
    }
}
