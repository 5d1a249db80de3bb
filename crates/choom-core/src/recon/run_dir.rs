//! Per-run output directory and the artefact file names inside it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw crawler output, one URL per line (unsorted, duplicates).
pub const CRAWL_FILE: &str = "crawl.txt";
/// Live JavaScript URLs.
pub const ENDPOINTS_JS_FILE: &str = "endpointsJs.txt";
/// Live endpoints (404s removed).
pub const ENDPOINTS_FILE: &str = "endpoints.txt";
/// Endpoints with 403s removed; input of the query-string reduction.
pub const ENDPOINTS_FILTERED_FILE: &str = "endpoints_filtered.txt";
/// Reduced endpoint list fed to gf and dalfox.
pub const ENDPOINTS_PARAM_FILE: &str = "endpoints_param.txt";
pub const RESULT_FILE: &str = "result.txt";
pub const DALFOX_FILE: &str = "dalfox.txt";
pub const JOURNAL_FILE: &str = "run.json";
/// Directory cariddi writes into the current working directory.
pub const CARIDDI_OUTPUT_DIR: &str = "output-cariddi";

/// Directory holding one run's artefacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    path: PathBuf,
}

impl RunDir {
    /// Creates the next numbered directory (`01`, `02`, ...) under `output_root`.
    pub fn allocate(output_root: &Path) -> Result<Self> {
        fs::create_dir_all(output_root)
            .with_context(|| format!("create dir: {}", output_root.display()))?;
        let path = output_root.join(next_run_name(output_root)?);
        fs::create_dir(&path).with_context(|| format!("create run dir: {}", path.display()))?;
        tracing::info!(path = %path.display(), "allocated run directory");
        Ok(Self { path })
    }

    /// Path the next [`RunDir::allocate`] would create, without touching
    /// the filesystem.
    pub fn planned(output_root: &Path) -> Result<Self> {
        Ok(Self {
            path: output_root.join(next_run_name(output_root)?),
        })
    }

    /// Reuses a directory from an earlier run; it must already hold the live
    /// endpoint lists the analysis phase reads.
    pub fn existing(path: &Path) -> Result<Self> {
        for name in [ENDPOINTS_JS_FILE, ENDPOINTS_FILE] {
            let file = path.join(name);
            if !file.is_file() {
                anyhow::bail!("{} not found (required with --no-crawl)", file.display());
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// Name for the next run: number of existing sub-directories plus one,
/// zero-padded to two digits, skipping names that are already taken.
pub fn next_run_name(output_root: &Path) -> Result<String> {
    let existing = match fs::read_dir(output_root) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .count(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => {
            return Err(e).with_context(|| format!("read dir: {}", output_root.display()))
        }
    };
    let mut n = existing + 1;
    while output_root.join(format!("{:02}", n)).exists() {
        n += 1;
    }
    Ok(format!("{:02}", n))
}
