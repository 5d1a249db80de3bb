//! `result.txt`: tool findings grouped under banner headings.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const BLUE_BOLD: &str = "\x1b[1;34m";
const YELLOW: &str = "\x1b[0;33m";
const RESET: &str = "\x1b[0m";

/// Appends section banners to the run's result file. Tool output itself is
/// appended by the tools' own `tee -a`.
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `################## TITLE ###################` in bold blue, padded
    /// with blank lines.
    pub fn section(&self, title: &str) -> Result<()> {
        self.append(&format!(
            " \n{BLUE_BOLD}################## {title} ###################{RESET}\n \n"
        ))
    }

    /// `#### title ####` in yellow.
    pub fn subsection(&self, title: &str) -> Result<()> {
        self.append(&format!("{YELLOW}#### {title} ####{RESET}\n"))
    }

    fn append(&self, text: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        f.write_all(text.as_bytes())
            .with_context(|| format!("write {}", self.path.display()))
    }
}
