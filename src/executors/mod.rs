//! # Shell executors
//!
//! Every external tool call goes through [`ShellExecutor::run`]: one command
//! string in, captured stdout out. The call blocks until the subprocess
//! exits; a non-zero exit is an error the orchestrators do not catch.
//!
//! Orchestrators never build command strings themselves. They talk to the
//! typed wrappers instead:
//!
//! - [`GitExecutor`] - `branch`, `checkout`, `fetch`, `merge`, `commit`, `push`, `last_commit`
//! - [`NpmExecutor`] - `publish`, `view`, `search`, `unpublish`
//! - [`YarnExecutor`] - `remove`, `add`
//!
//! Tests swap [`SystemShell`] for a recording executor.

pub mod git;
pub mod npm;
pub mod yarn;

#[cfg(test)]
pub(crate) mod mock;

pub use git::GitExecutor;
pub use npm::NpmExecutor;
pub use yarn::YarnExecutor;

use crate::error::{HelperError, Result};
use crate::ui;
use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub trait ShellExecutor {
    /// Run `command` synchronously and return its stdout.
    fn run(&self, command: &str) -> Result<String>;
}

/// Executes commands as real subprocesses.
///
/// The command string is split with shell quoting rules and the program is
/// spawned directly, without an intermediate shell.
#[derive(Debug, Clone, Default)]
pub struct SystemShell {
    timeout: Option<Duration>,
}

impl SystemShell {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ShellExecutor for SystemShell {
    fn run(&self, command: &str) -> Result<String> {
        ui::command(command);

        let argv = shlex::split(command)
            .ok_or_else(|| HelperError::InvalidCommand(command.to_string()))?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HelperError::InvalidCommand(command.to_string()))?;

        let binary = which::which(program)
            .map_err(|_| HelperError::DependencyMissing(format!("'{}' not found in PATH", program)))?;

        let mut cmd = Command::new(binary);
        cmd.args(args);

        let output = run_command(&mut cmd, command, self.timeout)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(HelperError::CommandExited {
                command: command.to_string(),
                status: output.status.code(),
                stderr: error_text(&output),
            });
        }

        ui::output(&stdout);
        Ok(stdout)
    }
}

/// Run a non-interactive command, capturing both streams.
fn run_command(cmd: &mut Command, command: &str, timeout: Option<Duration>) -> Result<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    own_process_group(cmd);

    let mut child = cmd
        .spawn()
        .map_err(|e| HelperError::SystemCommandFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| HelperError::SystemCommandFailed {
            command: command.to_string(),
            reason: "Failed to capture stdout".to_string(),
        })?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| HelperError::SystemCommandFailed {
            command: command.to_string(),
            reason: "Failed to capture stderr".to_string(),
        })?;

    let stdout_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stdout).read_to_end(&mut buf);
        buf
    });
    let stderr_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stderr).read_to_end(&mut buf);
        buf
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if let Some(limit) = timeout
                    && start.elapsed() > limit
                {
                    kill_process_tree(&mut child);
                    // Readers are left detached: a grandchild outside the
                    // group may still hold the pipes open.
                    return Err(HelperError::CommandTimeout {
                        command: command.to_string(),
                        seconds: limit.as_secs(),
                    });
                }
                if ui::is_interrupted() {
                    kill_process_tree(&mut child);
                    return Err(HelperError::Interrupted);
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return Err(HelperError::SystemCommandFailed {
                    command: command.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// The child leads a new process group, so its own children can be killed with it.
#[cfg(unix)]
fn own_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_cmd: &mut Command) {}

fn kill_process_tree(child: &mut Child) {
    kill_process_group(child);
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(unix)]
fn kill_process_group(child: &Child) {
    if let Ok(pid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: plain kill(2) on the group `own_process_group` created.
        unsafe {
            libc::kill(-pid, libc::SIGKILL);
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

/// Prefers stderr, falls back to stdout if stderr is empty.
fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn run_returns_stdout() {
        let shell = SystemShell::default();
        let stdout = shell.run("echo hello").unwrap();
        assert_eq!(stdout.trim(), "hello");
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let shell = SystemShell::default();
        let stdout = shell.run(r#"printf "%s|" "a b" c"#).unwrap();
        assert_eq!(stdout, "a b|c|");
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let shell = SystemShell::default();
        let err = shell.run("false").unwrap_err();
        assert!(matches!(err, HelperError::CommandExited { status: Some(1), .. }));
    }

    #[test]
    fn missing_program_is_reported() {
        let shell = SystemShell::default();
        let err = shell.run("nonexistent_command_xyz --flag").unwrap_err();
        assert!(matches!(err, HelperError::DependencyMissing(_)));
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let shell = SystemShell::default();
        assert!(matches!(
            shell.run("echo \"open").unwrap_err(),
            HelperError::InvalidCommand(_)
        ));
        assert!(matches!(shell.run("   ").unwrap_err(), HelperError::InvalidCommand(_)));
    }

    #[test]
    fn timeout_kills_hung_command() {
        let shell = SystemShell::new(Some(Duration::from_secs(1)));
        let err = shell.run("sleep 5").unwrap_err();
        assert!(matches!(err, HelperError::CommandTimeout { seconds: 1, .. }));
    }

    #[test]
    fn timeout_also_kills_spawned_children() {
        let shell = SystemShell::new(Some(Duration::from_secs(1)));
        let start = Instant::now();
        let err = shell.run(r#"sh -c "sleep 6 & sleep 6""#).unwrap_err();

        assert!(matches!(err, HelperError::CommandTimeout { seconds: 1, .. }));
        assert!(start.elapsed() < Duration::from_secs(4), "took {:?}", start.elapsed());
    }
}
