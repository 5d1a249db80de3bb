//! Description of one shell invocation.

use std::fmt;
use std::time::Duration;

/// What to do when the user presses Ctrl-C while the command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptPolicy {
    /// Kill the command and propagate [`super::RunError::Interrupted`].
    #[default]
    Abort,
    /// Kill the command and report [`super::RunOutcome::Interrupted`]; the
    /// caller moves on to its next step.
    Skip,
}

/// A command line to run through `sh -c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub line: String,
    pub timeout: Option<Duration>,
    pub on_interrupt: InterruptPolicy,
    /// Capture stdout instead of inheriting the terminal.
    pub capture: bool,
    /// Treat a non-zero exit status as an error.
    pub check: bool,
}

impl ShellCommand {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            timeout: None,
            on_interrupt: InterruptPolicy::Abort,
            capture: false,
            check: false,
        }
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn skip_on_interrupt(mut self) -> Self {
        self.on_interrupt = InterruptPolicy::Skip;
        self
    }

    pub fn capture_stdout(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn checked(mut self) -> Self {
        self.check = true;
        self
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
