pub mod recorder;
pub mod run_dir;
