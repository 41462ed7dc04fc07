use super::ShellExecutor;
use crate::error::Result;
use std::cell::RefCell;

type Responder = Box<dyn Fn(&str) -> Result<String>>;

/// Records every command and answers from a responder closure.
pub(crate) struct RecordingShell {
    responder: Responder,
    calls: RefCell<Vec<String>>,
}

impl RecordingShell {
    /// Answers every command with empty stdout.
    pub(crate) fn silent() -> Self {
        Self::with(|_| Ok(String::new()))
    }

    pub(crate) fn with<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String> + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn called_with(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl ShellExecutor for RecordingShell {
    fn run(&self, command: &str) -> Result<String> {
        self.calls.borrow_mut().push(command.to_string());
        (self.responder)(command)
    }
}
