//! Package manifest (`package.json`) access
//!
//! The manifest is kept as a JSON object so that fields this crate does not
//! know about, and their order, survive a rewrite.

use crate::error::{HelperError, Result};
use crate::utils::fs::write_object_as_json;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// The identity fields of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
}

impl PackageDescriptor {
    /// `name@version`, the registry coordinate.
    pub fn full_version(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    data: Map<String, Value>,
}

impl Manifest {
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| HelperError::io(path, e))?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| HelperError::InvalidManifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(data) => Ok(Self {
                path: path.to_path_buf(),
                data,
            }),
            _ => Err(HelperError::InvalidManifest {
                path: path.to_path_buf(),
                message: "top level must be an object".to_string(),
            }),
        }
    }

    /// Read the manifest inside `dir`.
    pub fn read_in(dir: &Path) -> Result<Self> {
        Self::read(&dir.join(crate::project_identity::MANIFEST_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn descriptor(&self) -> Result<PackageDescriptor> {
        Ok(PackageDescriptor {
            name: self.required_str("name")?.to_string(),
            version: self.required_str("version")?.to_string(),
        })
    }

    pub fn set_version(&mut self, version: &str) {
        self.data
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Dependencies of one category as `(name, version)` pairs in file order.
    ///
    /// `None` when the category is absent. Non-string versions are skipped.
    pub fn dependencies(&self, category: &str) -> Option<Vec<(String, String)>> {
        let section = self.data.get(category)?.as_object()?;
        Some(
            section
                .iter()
                .filter_map(|(name, version)| {
                    version.as_str().map(|v| (name.clone(), v.to_string()))
                })
                .collect(),
        )
    }

    /// Set `name` to `version` in a dependency category, creating the category.
    pub fn set_dependency(&mut self, category: &str, name: &str, version: &str) {
        let section = self
            .data
            .entry(category.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !section.is_object() {
            *section = Value::Object(Map::new());
        }
        if let Value::Object(map) = section {
            map.insert(name.to_string(), Value::String(version.to_string()));
        }
    }

    pub fn write(&self) -> Result<()> {
        write_object_as_json(&self.path, &Value::Object(self.data.clone()))
    }

    fn required_str(&self, key: &str) -> Result<&str> {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| HelperError::InvalidManifest {
                path: self.path.clone(),
                message: format!("missing string field '{}'", key),
            })
    }
}

/// `major.minor.patch -> major.minor.(patch + 1)`.
///
/// Only the leading digits of the patch component count, so a pre-release
/// suffix on it is dropped. Components past the third are ignored.
pub fn bump_patch(version: &str) -> Result<String> {
    let mut parts = version.split('.');
    let (Some(major), Some(minor), Some(patch)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(HelperError::InvalidVersion(version.to_string()));
    };

    let digits: String = patch.chars().take_while(char::is_ascii_digit).collect();
    let patch: u64 = digits
        .parse()
        .map_err(|_| HelperError::InvalidVersion(version.to_string()))?;

    let next = patch
        .checked_add(1)
        .ok_or_else(|| HelperError::InvalidVersion(version.to_string()))?;

    Ok(format!("{}.{}.{}", major, minor, next))
}
