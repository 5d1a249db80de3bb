//! Execution seam between the workflow and real processes.

use std::future::{self, Future};
use std::time::Duration;

use super::command::ShellCommand;
use super::ctrl_c::CtrlC;
use super::error::RunError;
use super::run::{run_until, RunOutcome};

/// Something that can carry out a [`ShellCommand`].
pub trait Executor {
    fn execute(
        &mut self,
        cmd: &ShellCommand,
    ) -> impl Future<Output = Result<RunOutcome, RunError>> + Send;

    /// Waits `duration` between commands; Ctrl-C cuts it short. Returns
    /// `false` when the wait was interrupted.
    fn pause(&mut self, duration: Duration) -> impl Future<Output = bool> + Send {
        let _ = duration;
        future::ready(true)
    }

    /// True when commands are only recorded. Callers then also skip their
    /// own file side effects.
    fn records_only(&self) -> bool {
        false
    }
}

/// Runs commands for real.
///
/// One Ctrl-C listener is started with the first command and kept for the
/// executor's lifetime, so a press between two commands interrupts the next
/// one instead of being dropped.
#[derive(Debug, Default)]
pub struct ShellExecutor {
    ctrl_c: Option<CtrlC>,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn ctrl_c(&mut self) -> &mut CtrlC {
        self.ctrl_c.get_or_insert_with(CtrlC::listen)
    }
}

impl Executor for ShellExecutor {
    fn execute(
        &mut self,
        cmd: &ShellCommand,
    ) -> impl Future<Output = Result<RunOutcome, RunError>> + Send {
        let ctrl_c = self.ctrl_c();
        run_until(cmd, ctrl_c.pressed())
    }

    fn pause(&mut self, duration: Duration) -> impl Future<Output = bool> + Send {
        let ctrl_c = self.ctrl_c();
        async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => true,
                _ = ctrl_c.pressed() => false,
            }
        }
    }
}

/// Records command lines without running them; every command "succeeds"
/// with empty output.
#[derive(Debug, Default, Clone)]
pub struct DryRunExecutor {
    lines: Vec<String>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Executor for DryRunExecutor {
    fn execute(
        &mut self,
        cmd: &ShellCommand,
    ) -> impl Future<Output = Result<RunOutcome, RunError>> + Send {
        self.lines.push(cmd.line.clone());
        future::ready(Ok(RunOutcome::Completed {
            code: Some(0),
            stdout: String::new(),
        }))
    }

    fn records_only(&self) -> bool {
        true
    }
}
