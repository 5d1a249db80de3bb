//! A Ctrl-C listener that outlives individual commands.

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Counts Ctrl-C presses for as long as it is alive, so a press that lands
/// while no command is running is still seen by the next one.
#[derive(Debug)]
pub struct CtrlC {
    presses: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl CtrlC {
    /// Starts listening. Must be called from within a tokio runtime.
    pub fn listen() -> Self {
        let (tx, presses) = watch::channel(0u64);
        let task = tokio::spawn(async move {
            let mut count = 0u64;
            while tokio::signal::ctrl_c().await.is_ok() {
                count += 1;
                if tx.send(count).is_err() {
                    break;
                }
            }
        });
        Self { presses, task }
    }

    /// Resolves on the next unseen press, immediately if one is pending.
    /// Never resolves when the handler could not be installed.
    pub async fn pressed(&mut self) {
        if self.presses.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Drop for CtrlC {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nothing_pending_at_start() {
        let mut ctrl_c = CtrlC::listen();
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            ctrl_c.pressed(),
        )
        .await;
        assert!(waited.is_err());
    }
}
