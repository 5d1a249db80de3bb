//! Recon orchestration: run directory, command templates and the sequential
//! crawl/analyze workflow built on [`crate::runner`] and [`crate::dedup`].

pub mod categories;
pub mod commands;
pub mod journal;
pub mod options;
pub mod result_log;
pub mod run_dir;
pub mod targets;
pub mod workflow;

pub use journal::{Journal, Phase, StepRecord, StepStatus};
pub use options::ReconOptions;
pub use result_log::ResultLog;
pub use run_dir::RunDir;
pub use targets::{load_targets, parse_targets};
pub use workflow::Workflow;
