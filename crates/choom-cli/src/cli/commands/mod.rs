//! CLI command handlers, one file per subcommand.

mod completions;
mod dedup;
mod run;

pub use completions::run_completions;
pub use dedup::run_dedup;
pub use run::run_recon;
