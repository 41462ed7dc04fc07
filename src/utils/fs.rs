//! Filesystem helpers shared by the scripts.

use crate::error::{HelperError, Result};
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Line ending of the host platform, used for written JSON.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const JSON_INDENT: &[u8] = b"    ";

/// Visit every entry below `dir`, depth first.
///
/// `on_entry(dir, name)` fires for each entry before the walker descends
/// into it. Siblings are visited in name order. A root that is not a
/// directory is a no-op. Symlinked directories are not followed.
pub fn walk_through<F>(dir: &Path, on_entry: &mut F) -> Result<()>
where
    F: FnMut(&Path, &OsStr) -> Result<()>,
{
    walk(dir, on_entry, &mut None::<&mut fn(&Path) -> Result<()>>)
}

/// Like [`walk_through`], and `on_exit(dir)` fires once per directory after
/// all of its descendants were visited, the root included.
pub fn walk_through_post_order<F, G>(dir: &Path, on_entry: &mut F, on_exit: &mut G) -> Result<()>
where
    F: FnMut(&Path, &OsStr) -> Result<()>,
    G: FnMut(&Path) -> Result<()>,
{
    walk(dir, on_entry, &mut Some(on_exit))
}

fn walk<F, G>(dir: &Path, on_entry: &mut F, on_exit: &mut Option<&mut G>) -> Result<()>
where
    F: FnMut(&Path, &OsStr) -> Result<()>,
    G: FnMut(&Path) -> Result<()>,
{
    let metadata = fs::symlink_metadata(dir).map_err(|e| HelperError::io(dir, e))?;
    if !metadata.is_dir() {
        return Ok(());
    }

    let mut names: Vec<_> = fs::read_dir(dir)
        .map_err(|e| HelperError::io(dir, e))?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()
        .map_err(|e| HelperError::io(dir, e))?;
    names.sort();

    for name in names {
        on_entry(dir, &name)?;

        // The callback may have removed the entry.
        let next = dir.join(&name);
        if fs::symlink_metadata(&next).is_ok_and(|m| m.is_dir()) {
            walk(&next, on_entry, on_exit)?;
        }
    }

    if let Some(on_exit) = on_exit.as_deref_mut() {
        on_exit(dir)?;
    }

    Ok(())
}

/// Create `dir` and any missing parents.
pub fn create_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| HelperError::io(dir, e))
}

/// Unlink every entry directly inside `dir`. Subdirectories must already be empty.
pub fn delete_all_files_in_directory(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| HelperError::io(dir, e))? {
        let path = entry.map_err(|e| HelperError::io(dir, e))?.path();
        let is_dir = fs::symlink_metadata(&path)
            .map(|m| m.is_dir())
            .map_err(|e| HelperError::io(&path, e))?;
        let removed = if is_dir {
            fs::remove_dir(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| HelperError::io(&path, e))?;
    }
    Ok(())
}

/// Remove `dir` and everything below it, bottom-up.
pub fn remove_directory(dir: &Path) -> Result<()> {
    walk_through_post_order(dir, &mut |_: &Path, _: &OsStr| Ok(()), &mut |current: &Path| {
        delete_all_files_in_directory(current)?;
        fs::remove_dir(current).map_err(|e| HelperError::io(current, e))
    })
}

/// Write `value` as 4-space indented JSON with native line endings.
pub fn write_object_as_json(path: &Path, value: &Value) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(value, &mut serializer)?;

    let data = String::from_utf8_lossy(&buf).replace('\n', LINE_ENDING);
    fs::write(path, data).map_err(|e| HelperError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir_all(root.join("c")).unwrap();
        fs::write(root.join("top.txt"), "1").unwrap();
        fs::write(root.join("a/x.txt"), "2").unwrap();
        fs::write(root.join("a/b/y.txt"), "3").unwrap();
        tmp
    }

    #[test]
    fn entry_callback_fires_once_per_entry_excluding_root() {
        let tmp = fixture();
        let mut seen = Vec::new();
        walk_through(tmp.path(), &mut |dir: &Path, name: &OsStr| {
            seen.push(dir.join(name).strip_prefix(tmp.path()).unwrap().to_path_buf());
            Ok(())
        })
        .unwrap();

        let expected: Vec<PathBuf> = ["a", "a/b", "a/b/y.txt", "a/x.txt", "c", "top.txt"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn exit_callback_fires_after_descendants() {
        let tmp = fixture();
        let events: RefCell<Vec<String>> = RefCell::new(Vec::new());
        walk_through_post_order(
            tmp.path(),
            &mut |dir: &Path, name: &OsStr| {
                let rel = dir.join(name);
                let rel = rel.strip_prefix(tmp.path()).unwrap();
                events.borrow_mut().push(format!("entry:{}", rel.display()));
                Ok(())
            },
            &mut |dir: &Path| {
                let rel = dir.strip_prefix(tmp.path()).unwrap();
                events.borrow_mut().push(format!("exit:{}", rel.display()));
                Ok(())
            },
        )
        .unwrap();
        let events = events.into_inner();

        let exits: Vec<&String> = events.iter().filter(|e| e.starts_with("exit:")).collect();
        assert_eq!(exits.len(), 4);

        let position = |event: &str| events.iter().position(|e| e == event).unwrap();
        assert!(position("exit:a/b") > position("entry:a/b/y.txt"));
        assert!(position("exit:a") > position("exit:a/b"));
        assert!(position("exit:a") > position("entry:a/x.txt"));
        assert_eq!(events.last().map(String::as_str), Some("exit:"));
    }

    #[test]
    fn file_root_is_a_no_op() {
        let tmp = fixture();
        let mut calls = 0;
        walk_through(&tmp.path().join("top.txt"), &mut |_: &Path, _: &OsStr| {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = walk_through(&tmp.path().join("nope"), &mut |_: &Path, _: &OsStr| Ok(()));
        assert!(matches!(result, Err(HelperError::IoError { .. })));
    }

    #[test]
    fn callback_errors_stop_the_walk() {
        let tmp = fixture();
        let mut calls = 0;
        let result = walk_through(tmp.path(), &mut |_: &Path, _: &OsStr| {
            calls += 1;
            Err(HelperError::Other("stop".into()))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn remove_directory_removes_whole_tree() {
        let tmp = fixture();
        let target = tmp.path().join("a");
        remove_directory(&target).unwrap();
        assert!(!target.exists());
        assert!(tmp.path().join("c").exists());
    }

    #[test]
    fn create_directory_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("x/y/z");
        create_directory(&nested).unwrap();
        assert!(nested.is_dir());
        create_directory(&nested).unwrap();
    }

    #[test]
    fn json_uses_four_spaces_and_native_line_endings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.json");
        write_object_as_json(&path, &serde_json::json!({"a": {"b": "line\nbreak"}})).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let expected = ["{", "    \"a\": {", "        \"b\": \"line\\nbreak\"", "    }", "}"]
            .join(LINE_ENDING);
        assert_eq!(written, expected);
    }
}
