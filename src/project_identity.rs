//! Central project identity contract.
//!
//! This module is the single source of truth for runtime identity values.

pub const BINARY_NAME: &str = "helper-scripts";
pub const ENV_PREFIX: &str = "HELPER_SCRIPTS";
pub const MANIFEST_FILE_NAME: &str = "package.json";
pub const DECLARATION_BUNDLE_NAME: &str = "index.d.ts";
pub const GIT_REMOTE: &str = "origin";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

/// Read a prefixed environment variable, `None` when unset or not unicode.
pub fn env_get(suffix: &str) -> Option<String> {
    std::env::var(env_key(suffix)).ok()
}
