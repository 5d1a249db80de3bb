//! External process runner.
//!
//! Runs command lines through `sh -c`, streaming output to the terminal or
//! capturing stdout, with an optional timeout and a per-command policy for
//! Ctrl-C. Higher layers talk to processes through the [`Executor`] trait so
//! the workflow can be driven without spawning anything (dry runs, tests).

mod command;
mod ctrl_c;
mod error;
mod executor;
mod quote;
mod run;
mod tools;

pub use command::{InterruptPolicy, ShellCommand};
pub use ctrl_c::CtrlC;
pub use error::RunError;
pub use executor::{DryRunExecutor, Executor, ShellExecutor};
pub use quote::shell_quote;
pub use run::{run, RunOutcome};
pub use tools::{missing_tools, tool_available};
