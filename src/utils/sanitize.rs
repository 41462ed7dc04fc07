//! Input sanitization for command strings
//!
//! Package names end up inside command strings that are split and executed,
//! so they are validated before any command is built.

use crate::error::{HelperError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Safe characters for npm package names, optionally suffixed with `@version`.
/// Allows: alphanumeric, dash, underscore, dot, plus, tilde, caret, at sign, slash (scopes)
static SAFE_PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@._+~^/-]+$").expect("Invalid regex pattern"));

/// Characters that could be dangerous in shell contexts
static SHELL_DANGEROUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[;`$(){}|&<>\\'"\n\r\t ]"#).expect("Invalid regex pattern"));

/// Validate a package name (or `name@version`) before it is put in a command.
///
/// Names like `foo; rm -rf /` are rejected.
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(HelperError::InvalidPackageName(
            "Package name cannot be empty".to_string(),
        ));
    }

    if name.len() > 214 {
        return Err(HelperError::InvalidPackageName(format!(
            "Package name too long (max 214 chars): {}...",
            name.chars().take(50).collect::<String>()
        )));
    }

    if SHELL_DANGEROUS.is_match(name) {
        return Err(HelperError::InvalidPackageName(format!(
            "contains unsafe characters: {}",
            name
        )));
    }

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return Err(HelperError::InvalidPackageName(format!(
            "contains invalid characters: {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(HelperError::InvalidPackageName(format!(
            "cannot contain path traversal: {}",
            name
        )));
    }

    Ok(())
}

pub fn validate_package_names(names: &[String]) -> Result<()> {
    for name in names {
        validate_package_name(name)?;
    }
    Ok(())
}

/// Quote a single argument for a command string, only when the splitter
/// would otherwise break it apart.
pub fn quote_arg(arg: &str) -> Result<String> {
    let needs_quoting = arg.is_empty()
        || arg.starts_with('#')
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\'));

    if !needs_quoting {
        return Ok(arg.to_string());
    }

    shlex::try_quote(arg)
        .map(|quoted| quoted.into_owned())
        .map_err(|_| HelperError::InvalidCommand(format!("cannot quote argument: {:?}", arg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        assert!(validate_package_name("lodash").is_ok());
        assert!(validate_package_name("@eigenspace/helper-scripts").is_ok());
        assert!(validate_package_name("@eigenspace/helper-scripts@2.0.10").is_ok());
        assert!(validate_package_name("pkg@1.0.0-feature-x").is_ok());
        assert!(validate_package_name("pkg@^1.2.3").is_ok());
        assert!(validate_package_name("node_modules").is_ok());
    }

    #[test]
    fn test_shell_injection_blocked() {
        assert!(validate_package_name("foo; rm -rf /").is_err());
        assert!(validate_package_name("foo | cat").is_err());
        assert!(validate_package_name("foo$(cat)").is_err());
        assert!(validate_package_name("foo && echo").is_err());
        assert!(validate_package_name("foo bar").is_err());
    }

    #[test]
    fn test_path_traversal_blocked() {
        assert!(validate_package_name("../../../etc/passwd").is_err());
        assert!(validate_package_name("foo/../bar").is_err());
    }

    #[test]
    fn test_empty_and_long_names() {
        assert!(validate_package_name("").is_err());
        assert!(validate_package_name(&"a".repeat(300)).is_err());
    }

    #[test]
    fn plain_arguments_are_left_alone() {
        assert_eq!(quote_arg("a@1.0.0-dev").unwrap(), "a@1.0.0-dev");
        assert_eq!(quote_arg("/repo/dist").unwrap(), "/repo/dist");
        assert_eq!(
            quote_arg("x@https://host/x.git#main").unwrap(),
            "x@https://host/x.git#main"
        );
    }

    #[test]
    fn quoted_arguments_split_back_to_one_word() {
        for arg in ["has space", "it's", "back\\slash", "#hash", ""] {
            let quoted = quote_arg(arg).unwrap();
            assert_eq!(shlex::split(&quoted).unwrap(), vec![arg.to_string()]);
        }
    }
}
