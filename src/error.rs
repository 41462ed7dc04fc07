use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelperError {
    /// Missing or malformed script argument
    #[error("Usage error: {0}")]
    Usage(String),

    /// More than one merge-commit matcher produced a target branch
    #[error("Have problem with matchers: {count} branch matchers matched '{commit}'")]
    AmbiguousBranch { commit: String, count: usize },

    /// The exact package version is already published
    #[error("package '{package}' exists in registry")]
    AlreadyInRegistry { package: String },

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("Command '{command}' exited with {}: {stderr}", display_status(.status))]
    CommandExited {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Command '{command}' timed out after {seconds} seconds")]
    CommandTimeout { command: String, seconds: u64 },

    #[error("Invalid command line: {0}")]
    InvalidCommand(String),

    #[error("System dependency missing: {0}")]
    DependencyMissing(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid manifest '{path}': {message}")]
    InvalidManifest { path: PathBuf, message: String },

    #[error("Invalid version '{0}': expected major.minor.patch")]
    InvalidVersion(String),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    #[error("Invalid package name: {0}")]
    InvalidPackageName(String),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl HelperError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HelperError::IoError {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// A failed subprocess passes its own non-zero code through; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            HelperError::CommandExited {
                status: Some(code), ..
            } if *code != 0 => *code,
            HelperError::Interrupted => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;
