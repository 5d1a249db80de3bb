//! Availability checks for the external binaries the workflow drives.

use super::command::ShellCommand;
use super::quote::shell_quote;
use super::run::run;

/// True when `name` resolves via `command -v` in the user's shell.
pub async fn tool_available(name: &str) -> bool {
    let cmd = ShellCommand::new(format!("command -v {} >/dev/null 2>&1", shell_quote(name)));
    matches!(run(&cmd).await, Ok(outcome) if outcome.success())
}

/// The subset of `names` that cannot be found, in the given order.
pub async fn missing_tools<'a>(names: &[&'a str]) -> Vec<&'a str> {
    let mut missing = Vec::new();
    for &name in names {
        if !tool_available(name).await {
            missing.push(name);
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_sh_and_misses_nonsense() {
        assert!(tool_available("sh").await);
        assert!(!tool_available("choom-no-such-tool-0xdead").await);
        assert_eq!(
            missing_tools(&["sh", "choom-no-such-tool-0xdead"]).await,
            ["choom-no-such-tool-0xdead"]
        );
    }
}
