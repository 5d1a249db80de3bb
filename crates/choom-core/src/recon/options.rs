//! Per-run settings for the recon workflow.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ChoomConfig;
use crate::runner::shell_quote;

/// Settings threaded through every command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconOptions {
    pub rate_limit: u32,
    pub concurrency: u32,
    pub depth: u32,
    pub user_agent: Option<String>,
    /// Cookie header value for authenticated crawling.
    pub cookie: Option<String>,
    /// HTTP proxy for the endpoint liveness check.
    pub proxy: Option<String>,
    /// Hybrid headless crawling in katana.
    pub headless: bool,
    /// Let waybackurls include subdomains of the target.
    pub include_subs: bool,
    /// Also grep for images and PDFs.
    pub discover_documents: bool,
    /// Send a notification when the workflow finishes.
    pub notify: bool,
    pub script_dir: PathBuf,
    pub target_pause: Duration,
    pub secret_timeout: Duration,
    pub dalfox_workers: u32,
    pub js_live_codes: String,
    pub js_exclude: Vec<String>,
    pub gf_patterns: Vec<String>,
}

impl ReconOptions {
    pub fn from_config(cfg: &ChoomConfig) -> Self {
        Self {
            rate_limit: cfg.rate_limit,
            concurrency: cfg.concurrency,
            depth: cfg.depth,
            user_agent: None,
            cookie: None,
            proxy: None,
            headless: false,
            include_subs: false,
            discover_documents: false,
            notify: false,
            script_dir: cfg.script_dir_or_default(),
            target_pause: Duration::from_secs(cfg.target_pause_secs),
            secret_timeout: Duration::from_secs(cfg.secret_timeout_secs),
            dalfox_workers: cfg.dalfox_workers,
            js_live_codes: cfg.js_live_codes.clone(),
            js_exclude: cfg.js_exclude.clone(),
            gf_patterns: cfg.gf_patterns.clone(),
        }
    }

    /// `-H 'User-Agent: ..'` / `-H 'Cookie: ..'` as understood by katana and httpx.
    pub fn header_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if let Some(ua) = &self.user_agent {
            flags.push(format!("-H {}", shell_quote(&format!("User-Agent: {ua}"))));
        }
        if let Some(cookie) = &self.cookie {
            flags.push(format!("-H {}", shell_quote(&format!("Cookie: {cookie}"))));
        }
        flags
    }

    /// `-proxy '<url>'` for httpx.
    pub fn proxy_flag(&self) -> Option<String> {
        self.proxy
            .as_deref()
            .map(|p| format!("-proxy {}", shell_quote(p)))
    }

    /// External binaries this run will invoke.
    pub fn required_tools(&self, crawl: bool) -> Vec<&'static str> {
        let mut tools = Vec::new();
        if crawl {
            tools.extend(["waybackurls", "katana", "cariddi", "bash"]);
        }
        tools.extend(["httpx", "python3", "gf", "dalfox"]);
        if self.notify {
            tools.push("notify");
        }
        tools
    }
}
