use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/choom/config.toml`.
///
/// Every field has a default, so a partial file is valid. Command-line flags
/// override these values for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoomConfig {
    /// Requests per second passed to katana and httpx.
    pub rate_limit: u32,
    /// Concurrent fetchers passed to katana and cariddi.
    pub concurrency: u32,
    /// Maximum crawl depth passed to katana.
    pub depth: u32,
    /// Directory under which numbered run directories are created.
    pub output_root: PathBuf,
    /// Directory holding `virustotalx.sh` and `SecretFinder.py`. Defaults to
    /// `script/` next to the executable.
    pub script_dir: Option<PathBuf>,
    /// Pause between targets during the VirusTotal pass (API quota).
    pub target_pause_secs: u64,
    /// Per-URL timeout for the secret finder.
    pub secret_timeout_secs: u64,
    /// Worker count passed to dalfox.
    pub dalfox_workers: u32,
    /// Status codes kept by httpx when probing JavaScript URLs.
    pub js_live_codes: String,
    /// Substrings that exclude a JavaScript URL from probing (vendored libs, analytics).
    pub js_exclude: Vec<String>,
    /// gf pattern names run against the reduced endpoint list.
    pub gf_patterns: Vec<String>,
}

impl Default for ChoomConfig {
    fn default() -> Self {
        Self {
            rate_limit: 150,
            concurrency: 10,
            depth: 3,
            output_root: PathBuf::from("content"),
            script_dir: None,
            target_pause_secs: 20,
            secret_timeout_secs: 60,
            dalfox_workers: 50,
            js_live_codes: "200,301,302".to_string(),
            js_exclude: ["jquery", "bootstrap", "api.google.com", "google-analytics"]
                .map(String::from)
                .to_vec(),
            gf_patterns: ["lfi", "ssrf", "rce", "interestingparams", "idor", "xss"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl ChoomConfig {
    /// Configured script directory, or `script/` beside the running binary.
    pub fn script_dir_or_default(&self) -> PathBuf {
        if let Some(dir) = &self.script_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("script")))
            .unwrap_or_else(|| PathBuf::from("script"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("choom")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ChoomConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ChoomConfig> {
    if !path.exists() {
        let default_cfg = ChoomConfig::default();
        let toml = toml::to_string_pretty(&default_cfg).context("serialize default config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ChoomConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
