//! Process runner errors.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn `{line}`")]
    Spawn {
        line: String,
        #[source]
        source: io::Error,
    },
    #[error("failed waiting for `{line}`")]
    Wait {
        line: String,
        #[source]
        source: io::Error,
    },
    /// Non-zero exit of a command marked `check`. `code` is `None` when the
    /// process was killed by a signal.
    #[error("`{line}` exited with status {code:?}")]
    Failed { line: String, code: Option<i32> },
    #[error("`{line}` interrupted by user")]
    Interrupted { line: String },
}
