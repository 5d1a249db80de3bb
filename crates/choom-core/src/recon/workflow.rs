//! The sequential recon workflow: crawl, then analyze.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;

use super::categories::categories;
use super::commands;
use super::journal::{Journal, Phase, StepStatus};
use super::options::ReconOptions;
use super::result_log::ResultLog;
use super::run_dir::{
    RunDir, CARIDDI_OUTPUT_DIR, CRAWL_FILE, DALFOX_FILE, ENDPOINTS_FILE, ENDPOINTS_FILTERED_FILE,
    ENDPOINTS_JS_FILE, ENDPOINTS_PARAM_FILE, JOURNAL_FILE, RESULT_FILE,
};
use super::targets::parse_targets;
use crate::dedup::{reduce_file, write_lines};
use crate::runner::{Executor, RunOutcome, ShellCommand};

/// Drives the external tools one at a time against a run directory.
///
/// Every command goes through the [`Executor`]. With an executor that only
/// records (see [`Executor::records_only`]) the workflow also leaves the run
/// directory untouched: no truncation, no banners, no reduction, no journal.
pub struct Workflow<E> {
    exec: E,
    opts: ReconOptions,
    dir: RunDir,
    log: ResultLog,
    journal: Journal,
    echo: bool,
}

impl<E: Executor> Workflow<E> {
    pub fn new(exec: E, opts: ReconOptions, dir: RunDir) -> Self {
        let log = ResultLog::new(dir.file(RESULT_FILE));
        Self {
            exec,
            opts,
            dir,
            log,
            journal: Journal::new(),
            echo: true,
        }
    }

    /// Print each command line (`$ ...`) before running it. On by default.
    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn dir(&self) -> &RunDir {
        &self.dir
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn executor(&self) -> &E {
        &self.exec
    }

    pub fn into_parts(self) -> (E, Journal) {
        (self.exec, self.journal)
    }

    /// Runs the crawl phase for `targets` (skipped when `None`), then the
    /// analysis phase. The journal is written to `run.json` even when a step
    /// aborts the run, except in dry runs.
    pub async fn run(&mut self, targets: Option<&[String]>) -> Result<()> {
        let res = self.run_phases(targets).await;
        if self.exec.records_only() {
            return res;
        }
        let path = self.dir.file(JOURNAL_FILE);
        match self.journal.save_to_path(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "journal saved"),
            Err(e) if res.is_err() => tracing::warn!("could not save journal: {:#}", e),
            Err(e) => return Err(e),
        }
        res
    }

    async fn run_phases(&mut self, targets: Option<&[String]>) -> Result<()> {
        if let Some(targets) = targets {
            self.crawl(targets).await?;
        }
        self.analyze().await?;
        println!("\nAll is done.");
        Ok(())
    }

    /// Crawl phase: fills `crawl.txt`, then derives `endpointsJs.txt` and
    /// `endpoints.txt` from it. Each tool makes one pass over all targets
    /// before the next tool starts.
    pub async fn crawl(&mut self, targets: &[String]) -> Result<()> {
        let crawl = self.dir.file(CRAWL_FILE);
        if !self.exec.records_only() {
            fs::write(&crawl, "").with_context(|| format!("create {}", crawl.display()))?;
        }

        heading("Wayback crawling");
        for target in targets {
            println!("Processing target: {}", target);
            let cmd = commands::waybackurls(&self.opts, target, &crawl);
            self.crawl_step("waybackurls", cmd).await?;
        }

        heading("Katana crawling");
        for target in targets {
            println!("Processing target: {}", target);
            let cmd = commands::katana(&self.opts, target, &crawl);
            self.crawl_step("katana", cmd).await?;
        }

        heading("Cariddi crawling");
        for target in targets {
            println!("Processing target: {}", target);
            let cmd = commands::cariddi(&self.opts, target, &crawl);
            self.crawl_step("cariddi", cmd).await?;
        }
        self.collect_cariddi_output();

        heading("VirusTotal crawling");
        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                self.pause_between_targets().await;
            }
            println!("Processing target: {}", target);
            let cmd = commands::virustotal(&self.opts, target, &crawl);
            self.crawl_step("virustotal", cmd).await?;
        }
        println!("\nCrawling done.");

        let cmd = commands::filter_js(&self.opts, &crawl, &self.dir.file(ENDPOINTS_JS_FILE));
        self.crawl_step("filter js", cmd).await?;
        let cmd = commands::clean_endpoints(&self.opts, &crawl, &self.dir.file(ENDPOINTS_FILE));
        self.crawl_step("clean endpoints", cmd).await?;
        Ok(())
    }

    /// Analysis phase over `endpointsJs.txt` and `endpoints.txt`.
    pub async fn analyze(&mut self) -> Result<()> {
        let result = self.log.path().to_path_buf();
        let endpoints = self.dir.file(ENDPOINTS_FILE);
        let filtered = self.dir.file(ENDPOINTS_FILTERED_FILE);
        let params = self.dir.file(ENDPOINTS_PARAM_FILE);

        heading("Secrets in JS files");
        self.section("SECRETS IN JS FILES [SecretFinder]")?;
        for js_url in read_list(&self.dir.file(ENDPOINTS_JS_FILE))? {
            println!("Processing URL: {}", js_url);
            let cmd = ShellCommand::new(commands::secret_finder(&self.opts, &js_url, &result))
                .timeout(self.opts.secret_timeout);
            self.step(Phase::Analyze, "secretfinder", cmd).await?;
        }

        for category in categories(self.opts.discover_documents) {
            heading(category.title);
            self.section(category.title)?;
            let cmd = ShellCommand::new(commands::grep_category(&category, &endpoints, &result));
            self.step(Phase::Analyze, category.title.to_lowercase(), cmd).await?;
        }

        heading("Removing 403 endpoints");
        let cmd = ShellCommand::new(commands::filter_forbidden(&self.opts, &endpoints, &filtered));
        self.step(Phase::Analyze, "filter 403", cmd).await?;

        heading("Reducing duplicate query strings");
        self.reduce_endpoints(&filtered, &params)?;

        heading("Vulnerable parameters (gf)");
        self.section("VULNERABLE PARAMETERS")?;
        for pattern in self.opts.gf_patterns.clone() {
            let title = format!("Hunt {}", pattern.to_uppercase());
            println!("#### {} ####", title);
            if !self.exec.records_only() {
                self.log.subsection(&title)?;
            }
            let cmd = ShellCommand::new(commands::gf(&pattern, &params, &result));
            self.step(Phase::Analyze, format!("gf {pattern}"), cmd).await?;
        }

        heading("Exploit XSS (dalfox)");
        let cmd = ShellCommand::new(commands::dalfox(&self.opts, &params, &self.dir.file(DALFOX_FILE)))
            .skip_on_interrupt();
        self.step(Phase::Analyze, "dalfox", cmd).await?;

        if self.opts.notify {
            heading("Notification");
            let cmd = ShellCommand::new(commands::notify()).skip_on_interrupt();
            self.step(Phase::Analyze, "notify", cmd).await?;
        }
        Ok(())
    }

    /// `endpoints_filtered.txt` -> `endpoints_param.txt`, then drops the
    /// filtered list.
    fn reduce_endpoints(&mut self, filtered: &Path, params: &Path) -> Result<()> {
        if self.exec.records_only() {
            println!("would reduce {} into {}", filtered.display(), params.display());
            return Ok(());
        }
        if !filtered.is_file() {
            tracing::warn!(
                path = %filtered.display(),
                "no filtered endpoint list; writing an empty parameter list"
            );
            write_lines(params, std::iter::empty::<&str>())?;
            return Ok(());
        }
        let stats = reduce_file(filtered, params)?;
        println!(
            "{} endpoints reduced to {} ({} non-URL lines kept as-is)",
            stats.lines, stats.groups, stats.malformed
        );
        self.journal.dedup = Some(stats);
        fs::remove_file(filtered).with_context(|| format!("remove {}", filtered.display()))?;
        Ok(())
    }

    fn section(&self, title: &str) -> Result<()> {
        if self.exec.records_only() {
            return Ok(());
        }
        self.log.section(title)
    }

    async fn crawl_step(&mut self, name: &str, line: String) -> Result<RunOutcome> {
        let cmd = ShellCommand::new(line).skip_on_interrupt();
        self.step(Phase::Crawl, name, cmd).await
    }

    /// Runs one command and records it. Non-zero exits, timeouts and skipped
    /// interrupts are logged and the workflow carries on; runner errors abort.
    async fn step(
        &mut self,
        phase: Phase,
        name: impl Into<String>,
        cmd: ShellCommand,
    ) -> Result<RunOutcome> {
        let name = name.into();
        if self.echo {
            println!("$ {}", cmd.line);
        }
        let started = Instant::now();
        let res = self.exec.execute(&cmd).await;
        let status = StepStatus::from_result(&res);
        self.journal
            .record(phase, name.as_str(), cmd.line.as_str(), status, started.elapsed());

        let outcome = res.with_context(|| format!("step {name}"))?;
        match &outcome {
            RunOutcome::Completed { code, .. } if *code != Some(0) => {
                tracing::warn!(step = %name, ?code, "step exited with non-zero status")
            }
            RunOutcome::TimedOut => tracing::warn!(step = %name, "step timed out"),
            RunOutcome::Interrupted => {
                println!("{} interrupted by user, moving on", name);
                tracing::warn!(step = %name, "step skipped after interrupt")
            }
            RunOutcome::Completed { .. } => {}
        }
        Ok(outcome)
    }

    /// cariddi writes `output-cariddi/` into the working directory; move it
    /// next to the other artefacts.
    fn collect_cariddi_output(&self) {
        if self.exec.records_only() {
            return;
        }
        let src = Path::new(CARIDDI_OUTPUT_DIR);
        if !src.is_dir() {
            tracing::warn!(path = %src.display(), "cariddi output directory not found");
            return;
        }
        let dst = self.dir.file(CARIDDI_OUTPUT_DIR);
        match fs::rename(src, &dst) {
            Ok(()) => tracing::info!(dst = %dst.display(), "moved cariddi output"),
            Err(e) => tracing::warn!(dst = %dst.display(), "could not move cariddi output: {}", e),
        }
    }

    /// Waits `target_pause` between VirusTotal queries; Ctrl-C cuts it short.
    async fn pause_between_targets(&mut self) {
        let pause = self.opts.target_pause;
        if pause.is_zero() {
            return;
        }
        println!("Waiting {}s before the next target...", pause.as_secs());
        if !self.exec.pause(pause).await {
            println!("Pause interrupted, moving to the next target");
        }
    }
}

fn heading(title: &str) {
    println!("\n==== {} ====", title);
    tracing::info!(phase = title, "starting");
}

/// Non-blank lines of a list file; a missing file reads as empty.
fn read_list(path: &Path) -> Result<Vec<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(parse_targets(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "list not found, treating as empty");
            Ok(Vec::new())
        }
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChoomConfig;
    use crate::runner::{DryRunExecutor, RunError};
    use std::future::{self, Future};
    use std::time::Duration;

    fn opts() -> ReconOptions {
        let mut o = ReconOptions::from_config(&ChoomConfig::default());
        o.script_dir = "/opt/choom/script".into();
        o.target_pause = Duration::ZERO;
        o
    }

    /// Succeeds every command except the one whose line contains `needle`,
    /// which gets `outcome`. Unlike the dry run it is not `records_only`.
    struct Scripted {
        needle: &'static str,
        outcome: Result<RunOutcome, fn(String) -> RunError>,
        seen: Vec<String>,
    }

    impl Scripted {
        fn succeeding() -> Self {
            Self::failing_on("\0", Ok(RunOutcome::TimedOut))
        }

        fn failing_on(
            needle: &'static str,
            outcome: Result<RunOutcome, fn(String) -> RunError>,
        ) -> Self {
            Self {
                needle,
                outcome,
                seen: Vec::new(),
            }
        }
    }

    impl Executor for Scripted {
        fn execute(
            &mut self,
            cmd: &ShellCommand,
        ) -> impl Future<Output = Result<RunOutcome, RunError>> + Send {
            self.seen.push(cmd.line.clone());
            let res = if cmd.line.contains(self.needle) {
                match &self.outcome {
                    Ok(o) => Ok(o.clone()),
                    Err(make) => Err(make(cmd.line.clone())),
                }
            } else {
                Ok(RunOutcome::Completed {
                    code: Some(0),
                    stdout: String::new(),
                })
            };
            future::ready(res)
        }
    }

    fn interrupted(line: String) -> RunError {
        RunError::Interrupted { line }
    }

    fn no_crawl_dir(root: &Path) -> RunDir {
        fs::write(root.join(ENDPOINTS_JS_FILE), "https://a.com/app.js\n\nhttps://a.com/b.js\n")
            .unwrap();
        fs::write(root.join(ENDPOINTS_FILE), "https://a.com/x?id=1\n").unwrap();
        RunDir::existing(root).unwrap()
    }

    #[tokio::test]
    async fn analyze_runs_steps_in_order() {
        let root = tempfile::tempdir().unwrap();
        let dir = no_crawl_dir(root.path());
        let mut wf = Workflow::new(Scripted::succeeding(), opts(), dir).echo_commands(false);
        wf.run(None).await.unwrap();

        let lines = &wf.executor().seen;
        let kinds: Vec<&str> = lines
            .iter()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(
            kinds,
            [
                "python3", "python3", "grep", "grep", "grep", "grep", "cat", "cat", "cat", "cat",
                "cat", "cat", "cat", "cat"
            ]
        );
        assert!(lines.last().unwrap().contains("dalfox pipe"));
        assert!(root.path().join(JOURNAL_FILE).is_file());
        assert!(root.path().join(RESULT_FILE).is_file());
        // no filtered list was produced, so the parameter list is empty
        assert_eq!(fs::read_to_string(root.path().join(ENDPOINTS_PARAM_FILE)).unwrap(), "");
    }

    #[tokio::test]
    async fn dry_run_leaves_run_dir_untouched() {
        let root = tempfile::tempdir().unwrap();
        let dir = no_crawl_dir(root.path());
        fs::write(root.path().join(ENDPOINTS_PARAM_FILE), "https://a.com/x?id=1\n").unwrap();
        fs::write(root.path().join(ENDPOINTS_FILTERED_FILE), "https://a.com/x?id=2\n").unwrap();
        fs::write(root.path().join(RESULT_FILE), "earlier findings\n").unwrap();

        let mut wf = Workflow::new(DryRunExecutor::new(), opts(), dir).echo_commands(false);
        wf.run(None).await.unwrap();

        assert_eq!(wf.executor().lines().len(), 14);
        assert_eq!(
            fs::read_to_string(root.path().join(ENDPOINTS_PARAM_FILE)).unwrap(),
            "https://a.com/x?id=1\n"
        );
        assert!(root.path().join(ENDPOINTS_FILTERED_FILE).is_file());
        assert_eq!(
            fs::read_to_string(root.path().join(RESULT_FILE)).unwrap(),
            "earlier findings\n"
        );
        assert!(!root.path().join(JOURNAL_FILE).exists());
        assert_eq!(wf.journal().steps.len(), 14);
    }

    #[tokio::test]
    async fn nonzero_exit_does_not_stop_the_run() {
        let root = tempfile::tempdir().unwrap();
        let dir = no_crawl_dir(root.path());
        let exec = Scripted::failing_on(
            "gf lfi",
            Ok(RunOutcome::Completed {
                code: Some(1),
                stdout: String::new(),
            }),
        );
        let mut wf = Workflow::new(exec, opts(), dir).echo_commands(false);
        wf.run(None).await.unwrap();

        let problems: Vec<_> = wf.journal().problems().collect();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].step, "gf lfi");
        assert!(wf.executor().seen.last().unwrap().contains("dalfox"));
    }

    #[tokio::test]
    async fn abort_on_interrupt_stops_and_saves_journal() {
        let root = tempfile::tempdir().unwrap();
        let dir = no_crawl_dir(root.path());
        let exec = Scripted::failing_on("httpx -silent -fc 403", Err(interrupted));
        let mut wf = Workflow::new(exec, opts(), dir).echo_commands(false);
        let err = wf.run(None).await.unwrap_err();
        assert!(format!("{:#}", err).contains("filter 403"));
        assert!(!wf.executor().seen.iter().any(|l| l.contains("gf ")));

        let saved = Journal::load_from_path(&root.path().join(JOURNAL_FILE))
            .unwrap()
            .unwrap();
        assert_eq!(saved.steps.last().unwrap().status, StepStatus::Interrupted);
    }

    #[tokio::test]
    async fn crawl_runs_one_tool_pass_at_a_time() {
        let root = tempfile::tempdir().unwrap();
        let dir = RunDir::allocate(&root.path().join("content")).unwrap();
        fs::write(dir.file(CRAWL_FILE), "stale\n").unwrap();
        let targets = vec!["a.com".to_string(), "b.com".to_string()];

        let mut wf = Workflow::new(Scripted::succeeding(), opts(), dir).echo_commands(false);
        wf.crawl(&targets).await.unwrap();

        assert_eq!(fs::read_to_string(wf.dir().file(CRAWL_FILE)).unwrap(), "");
        let lines = &wf.executor().seen;
        assert_eq!(lines.len(), 2 * 3 + 2 + 2);
        assert!(lines[0].starts_with("waybackurls a.com"));
        assert!(lines[1].starts_with("waybackurls b.com"));
        assert!(lines[2].starts_with("katana -silent -u a.com"));
        assert!(lines[3].starts_with("katana -silent -u b.com"));
        assert!(lines[4].starts_with("echo a.com | cariddi"));
        assert!(lines[5].starts_with("echo b.com | cariddi"));
        assert!(lines[6].contains("virustotalx.sh a.com"));
        assert!(lines[7].contains("virustotalx.sh b.com"));
        assert!(lines[9].contains("-fc 404"));
        assert!(wf.journal().steps.iter().all(|s| s.phase == Phase::Crawl));
    }

    #[tokio::test]
    async fn dry_run_crawl_keeps_existing_crawl_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = RunDir::allocate(&root.path().join("content")).unwrap();
        fs::write(dir.file(CRAWL_FILE), "https://a.com/\n").unwrap();

        let mut wf = Workflow::new(DryRunExecutor::new(), opts(), dir).echo_commands(false);
        wf.crawl(&["a.com".to_string()]).await.unwrap();
        assert_eq!(
            fs::read_to_string(wf.dir().file(CRAWL_FILE)).unwrap(),
            "https://a.com/\n"
        );
    }

    #[test]
    fn read_list_missing_is_empty() {
        let root = tempfile::tempdir().unwrap();
        assert!(read_list(&root.path().join("none.txt")).unwrap().is_empty());
    }
}
