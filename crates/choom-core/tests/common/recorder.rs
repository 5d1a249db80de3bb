//! Executor that records commands and reports success without spawning,
//! while still letting the workflow write its own artefacts.

use std::future::{self, Future};

use choom_core::runner::{Executor, RunError, RunOutcome, ShellCommand};

#[derive(Debug, Default)]
pub struct Recorder {
    pub lines: Vec<String>,
}

impl Executor for Recorder {
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
}
