//! `choom run` – the full crawl and analysis workflow.

use anyhow::{bail, Result};
use choom_core::config::ChoomConfig;
use choom_core::recon::{load_targets, ReconOptions, RunDir, Workflow};
use choom_core::runner::{missing_tools, DryRunExecutor, ShellExecutor};
use std::time::Duration;

use crate::cli::RunArgs;

const BANNER: &str = "\
  ┌─┐ ┬ ┬ ┌─┐ ┌─┐ ┬  ┬
  │   ├─┤ │ │ │ │ │┬┬│
  └─┘ ┴ ┴ └─┘ └─┘ ┴  ┴";

pub async fn run_recon(cfg: &ChoomConfig, args: &RunArgs) -> Result<()> {
    if !args.silent {
        println!("\x1b[1;92m{}\x1b[0m", BANNER);
        println!("\x1b[1;35m        v{}\x1b[0m\n", env!("CARGO_PKG_VERSION"));
    }

    let opts = recon_options(cfg, args);
    let targets = collect_targets(args)?;
    let crawl = targets.is_some();

    if !args.dry_run {
        let missing = missing_tools(&opts.required_tools(crawl)).await;
        if !missing.is_empty() {
            tracing::warn!(?missing, "external tools not found in PATH");
            eprintln!("warning: not found in PATH: {}", missing.join(", "));
        }
    }

    let dir = match &args.path {
        Some(path) if args.no_crawl => RunDir::existing(path)?,
        _ if args.dry_run => RunDir::planned(&cfg.output_root)?,
        _ => RunDir::allocate(&cfg.output_root)?,
    };
    println!("Run directory: {}", dir.path().display());
    tracing::info!(dir = %dir.path().display(), crawl, dry_run = args.dry_run, "starting run");

    if args.dry_run {
        let mut opts = opts;
        opts.target_pause = Duration::ZERO;
        let mut workflow = Workflow::new(DryRunExecutor::new(), opts, dir);
        workflow.run(targets.as_deref()).await?;
        let (exec, _) = workflow.into_parts();
        println!("\n{} command(s) would run.", exec.lines().len());
    } else {
        let mut workflow = Workflow::new(ShellExecutor::new(), opts, dir);
        workflow.run(targets.as_deref()).await?;
        let problems = workflow.journal().problems().count();
        if problems > 0 {
            println!("{} step(s) did not finish cleanly; see run.json", problems);
        }
    }
    Ok(())
}

/// Config values with command-line overrides applied.
fn recon_options(cfg: &ChoomConfig, args: &RunArgs) -> ReconOptions {
    let mut opts = ReconOptions::from_config(cfg);
    if let Some(rl) = args.rate_limit {
        opts.rate_limit = rl;
    }
    if let Some(c) = args.concurrency {
        opts.concurrency = c;
    }
    if let Some(d) = args.depth {
        opts.depth = d;
    }
    opts.user_agent = args.user_agent.clone();
    opts.cookie = args.cookie.clone();
    opts.proxy = args.proxy.clone();
    opts.headless = args.headless;
    opts.include_subs = args.include_subs;
    opts.discover_documents = args.disco_doc;
    opts.notify = args.notify;
    opts
}

/// Targets to crawl, or `None` with `--no-crawl`.
fn collect_targets(args: &RunArgs) -> Result<Option<Vec<String>>> {
    if args.no_crawl {
        return Ok(None);
    }
    let targets = match (&args.url, &args.url_file) {
        (_, Some(file)) => load_targets(file)?,
        (Some(url), None) => vec![url.trim().to_string()],
        (None, None) => bail!("provide a target with -u/--url or a target list with -f/--url-file"),
    };
    if targets.iter().all(|t| t.is_empty()) {
        bail!("no targets to crawl");
    }
    Ok(Some(targets))
}
