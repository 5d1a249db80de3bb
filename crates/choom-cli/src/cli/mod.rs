//! CLI for the CHOOM recon pipeline.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use choom_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_dedup, run_recon};

/// Top-level CLI for CHOOM.
#[derive(Debug, Parser)]
#[command(name = "choom", version)]
#[command(about = "CHOOM: crawl targets, check endpoints and hunt vulnerable parameters", long_about = None)]
#[command(after_help = "Examples:\n  \
    choom run -u https://example.com -d 5 --rate-limit 200\n  \
    choom run -f urls.txt --user-agent CustomUserAgent -c sessionid=abc123\n  \
    choom run --no-crawl --path content/03\n  \
    choom dedup endpoints.txt -o endpoints_param.txt")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Crawl the targets and run the analysis tools over what was found.
    Run(RunArgs),

    /// Collapse URLs that differ only in query parameter values.
    Dedup {
        /// URL list, one per line (`-` for stdin).
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Where to write the reduced list (`-` for stdout).
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Single target URL or domain.
    #[arg(short = 'u', long, conflicts_with = "url_file")]
    pub url: Option<String>,

    /// File with one target per line.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub url_file: Option<PathBuf>,

    /// Maximum requests per second sent by the crawlers and httpx.
    #[arg(long, value_name = "N")]
    pub rate_limit: Option<u32>,

    /// Number of concurrent fetchers.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<u32>,

    /// Custom User-Agent header value.
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Cookie header value for authenticated crawling.
    #[arg(short = 'c', long)]
    pub cookie: Option<String>,

    /// Maximum crawl depth.
    #[arg(short = 'd', long, value_name = "N")]
    pub depth: Option<u32>,

    /// Enable headless hybrid crawling.
    #[arg(long)]
    pub headless: bool,

    /// Include subdomains of the target in the archive lookup.
    #[arg(long)]
    pub include_subs: bool,

    /// Also look for interesting documents (jpg, png, pdf).
    #[arg(long)]
    pub disco_doc: bool,

    /// Skip crawling and analyze an existing run directory.
    #[arg(long, requires = "path", conflicts_with_all = ["url", "url_file"])]
    pub no_crawl: bool,

    /// Run directory containing endpointsJs.txt and endpoints.txt (with --no-crawl).
    #[arg(long, value_name = "DIR", requires = "no_crawl")]
    pub path: Option<PathBuf>,

    /// HTTP proxy for the endpoint check (e.g. http://127.0.0.1:8080).
    #[arg(short = 'p', long)]
    pub proxy: Option<String>,

    /// Send a notification when the workflow is done.
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Do not print the banner.
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Print the commands that would run without running them or writing
    /// into any run directory.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run(args) => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_recon(&cfg, &args).await?;
            }
            CliCommand::Dedup { input, output } => run_dedup(&input, &output).await?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
