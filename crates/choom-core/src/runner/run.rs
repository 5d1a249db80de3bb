//! Spawn, wait, time out, interrupt.

use std::future::Future;
use std::process::Stdio;
use std::time::Instant;

use super::command::{InterruptPolicy, ShellCommand};
use super::error::RunError;

/// How a command ended when it did not error out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process exited. `code` is `None` when it was killed by a signal;
    /// `stdout` is empty unless the command asked for capture.
    Completed { code: Option<i32>, stdout: String },
    /// The timeout elapsed and the process group was terminated.
    TimedOut,
    /// Ctrl-C was pressed and the command's policy is [`InterruptPolicy::Skip`].
    Interrupted,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        matches!(self, RunOutcome::Completed { code: Some(0), .. })
    }

    pub fn stdout(&self) -> &str {
        match self {
            RunOutcome::Completed { stdout, .. } => stdout,
            _ => "",
        }
    }
}

/// Runs `cmd.line` through `sh -c`.
///
/// The child gets its own process group so a timeout or Ctrl-C tears down the
/// whole pipeline, not only the shell. stdin is closed.
pub async fn run(cmd: &ShellCommand) -> Result<RunOutcome, RunError> {
    run_until(cmd, interrupted()).await
}

/// [`run`] with the caller's Ctrl-C future, e.g. [`super::CtrlC::pressed`].
pub(crate) async fn run_until<I>(cmd: &ShellCommand, interrupt: I) -> Result<RunOutcome, RunError>
where
    I: Future<Output = ()>,
{
    let mut std_cmd = std::process::Command::new("sh");
    std_cmd.arg("-c").arg(&cmd.line).stdin(Stdio::null());
    if cmd.capture {
        std_cmd.stdout(Stdio::piped());
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        std_cmd.process_group(0);
    }
    let mut command = tokio::process::Command::from(std_cmd);
    command.kill_on_drop(true);

    tracing::debug!(line = %cmd.line, "spawning");
    let started = Instant::now();
    let child = command.spawn().map_err(|source| RunError::Spawn {
        line: cmd.line.clone(),
        source,
    })?;
    let pid = child.id();

    let wait = async {
        match cmd.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output()).await.ok(),
            None => Some(child.wait_with_output().await),
        }
    };

    let finished = tokio::select! {
        res = wait => res,
        _ = interrupt => {
            terminate_group(pid);
            tracing::warn!(line = %cmd.line, "interrupted by user");
            return match cmd.on_interrupt {
                InterruptPolicy::Skip => Ok(RunOutcome::Interrupted),
                InterruptPolicy::Abort => Err(RunError::Interrupted { line: cmd.line.clone() }),
            };
        }
    };

    let output = match finished {
        Some(res) => res.map_err(|source| RunError::Wait {
            line: cmd.line.clone(),
            source,
        })?,
        None => {
            terminate_group(pid);
            tracing::warn!(
                line = %cmd.line,
                "timed out after {:.1}s",
                started.elapsed().as_secs_f64()
            );
            return Ok(RunOutcome::TimedOut);
        }
    };

    let code = output.status.code();
    tracing::debug!(
        line = %cmd.line,
        ?code,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "finished"
    );
    if cmd.check && !output.status.success() {
        return Err(RunError::Failed {
            line: cmd.line.clone(),
            code,
        });
    }
    Ok(RunOutcome::Completed {
        code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
fn terminate_group(pid: Option<u32>) {
    if let Some(pid) = pid {
        // SAFETY: killpg only sends a signal; a stale group id yields ESRCH.
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGTERM);
        }
    }
}

#[cfg(not(unix))]
fn terminate_group(_pid: Option<u32>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn captures_stdout() {
        let out = run(&ShellCommand::new("printf 'a\\nb\\n'").capture_stdout())
            .await
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout(), "a\nb\n");
    }

    #[tokio::test]
    async fn pipelines_run_through_the_shell() {
        let out = run(&ShellCommand::new("printf 'x\\ny\\nx\\n' | sort -u").capture_stdout())
            .await
            .unwrap();
        assert_eq!(out.stdout(), "x\ny\n");
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported_unless_checked() {
        let out = run(&ShellCommand::new("exit 3")).await.unwrap();
        assert_eq!(
            out,
            RunOutcome::Completed {
                code: Some(3),
                stdout: String::new()
            }
        );
        assert!(!out.success());

        let err = run(&ShellCommand::new("exit 3").checked()).await.unwrap_err();
        assert!(matches!(err, RunError::Failed { code: Some(3), .. }));
    }

    #[tokio::test]
    async fn timeout_terminates_the_command() {
        let started = Instant::now();
        let out = run(&ShellCommand::new("sleep 5").timeout(Duration::from_millis(100)))
            .await
            .unwrap();
        assert_eq!(out, RunOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn stdin_is_closed() {
        let out = run(&ShellCommand::new("cat").capture_stdout()).await.unwrap();
        assert!(out.success());
        assert_eq!(out.stdout(), "");
    }
}
