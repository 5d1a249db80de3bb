//! Step journal persisted as `run.json` in the run directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::dedup::ReduceStats;
use crate::runner::{RunError, RunOutcome};

/// Workflow phase a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Crawl,
    Analyze,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Ok,
    Failed { code: Option<i32> },
    TimedOut,
    Interrupted,
    Error { message: String },
}

impl StepStatus {
    pub fn from_result(res: &Result<RunOutcome, RunError>) -> Self {
        match res {
            Ok(RunOutcome::Completed { code: Some(0), .. }) => StepStatus::Ok,
            Ok(RunOutcome::Completed { code, .. }) => StepStatus::Failed { code: *code },
            Ok(RunOutcome::TimedOut) => StepStatus::TimedOut,
            Ok(RunOutcome::Interrupted) => StepStatus::Interrupted,
            Err(RunError::Failed { code, .. }) => StepStatus::Failed { code: *code },
            Err(RunError::Interrupted { .. }) => StepStatus::Interrupted,
            Err(e) => StepStatus::Error {
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub phase: Phase,
    /// Short step name, e.g. `katana` or `gf lfi`.
    pub step: String,
    pub command: String,
    #[serde(flatten)]
    pub status: StepStatus,
    pub elapsed_ms: u64,
}

/// Everything that ran during one workflow invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub steps: Vec<StepRecord>,
    /// Counters from the query-string reduction, when it ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedup: Option<ReduceStats>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        phase: Phase,
        step: impl Into<String>,
        command: impl Into<String>,
        status: StepStatus,
        elapsed: Duration,
    ) {
        self.steps.push(StepRecord {
            phase,
            step: step.into(),
            command: command.into(),
            status,
            elapsed_ms: elapsed.as_millis() as u64,
        });
    }

    /// Steps that did not finish with exit status 0.
    pub fn problems(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.status != StepStatus::Ok)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize journal")?;
        std::fs::write(path, json)
            .with_context(|| format!("write journal: {}", path.display()))?;
        Ok(())
    }

    /// Loads a journal; `None` when the file does not exist.
    pub fn load_from_path(path: &Path) -> Result<Option<Journal>> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read journal: {}", path.display()))
            }
        };
        let journal = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse journal: {}", path.display()))?;
        Ok(Some(journal))
    }
}
