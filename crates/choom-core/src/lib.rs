pub mod config;
pub mod logging;

pub mod dedup;
pub mod recon;
pub mod runner;
