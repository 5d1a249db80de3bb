//! Integration test: a Ctrl-C pressed while no command is running is not lost.
//!
//! Raises SIGINT on the test process itself, so it lives in its own test
//! binary where no other test has commands in flight.

#![cfg(unix)]

use std::time::{Duration, Instant};

use choom_core::runner::{Executor, RunError, ShellCommand, ShellExecutor};

#[tokio::test]
async fn ctrl_c_between_commands_interrupts_the_next_one() {
    let mut exec = ShellExecutor::new();
    let out = exec.execute(&ShellCommand::new("true")).await.unwrap();
    assert!(out.success());
    // give the listener task a chance to install the handler
    tokio::time::sleep(Duration::from_millis(100)).await;

    // SAFETY: raise only delivers a signal to this process; the tokio
    // handler installed above replaces the default disposition.
    unsafe {
        libc::raise(libc::SIGINT);
    }
    // synchronous work between two steps
    std::thread::sleep(Duration::from_millis(50));

    let started = Instant::now();
    let err = exec
        .execute(&ShellCommand::new("sleep 5"))
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Interrupted { .. }));
    assert!(started.elapsed() < Duration::from_secs(4));

    // the press was consumed; the next command runs normally
    let out = exec.execute(&ShellCommand::new("true")).await.unwrap();
    assert!(out.success());
}
