//! Command-line templates for the external tools.
//!
//! Every function is pure string building; values that come from the user or
//! from crawled data are passed through [`shell_quote`].

use std::borrow::Cow;
use std::path::Path;

use super::categories::GrepCategory;
use super::options::ReconOptions;
use crate::runner::shell_quote;

const NOTIFY_MESSAGE: &str = "Choom workflow is done !!!";

fn path_arg(path: &Path) -> String {
    shell_quote(&path.to_string_lossy()).into_owned()
}

fn join(parts: Vec<Cow<'_, str>>) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Archived URLs for one target, appended to the crawl file.
pub fn waybackurls(opts: &ReconOptions, target: &str, crawl: &Path) -> String {
    join(vec![
        "waybackurls".into(),
        shell_quote(target),
        if opts.include_subs { "" } else { "-no-subs" }.into(),
        format!("| tee -a {}", path_arg(crawl)).into(),
    ])
}

/// Active crawl of one target with katana (JS parsing, known files, fqdn scope).
pub fn katana(opts: &ReconOptions, target: &str, crawl: &Path) -> String {
    let mut parts: Vec<Cow<'_, str>> = vec![
        "katana -silent -u".into(),
        shell_quote(target),
        "-jc -jsl -kf all -fs fqdn -fx".into(),
        format!("-rl {} -d {} -c {}", opts.rate_limit, opts.depth, opts.concurrency).into(),
    ];
    if opts.headless {
        parts.push("-hl -noi".into());
    }
    parts.extend(opts.header_flags().into_iter().map(Cow::Owned));
    parts.push(format!("| tee -a {}", path_arg(crawl)).into());
    join(parts)
}

/// Secrets, errors and endpoints for one target with cariddi.
pub fn cariddi(opts: &ReconOptions, target: &str, crawl: &Path) -> String {
    let mut parts: Vec<Cow<'_, str>> = vec![
        "echo".into(),
        shell_quote(target),
        "| cariddi -info -s -err -e -ext 1 -ot cariddi.txt".into(),
        format!("-c {}", opts.concurrency).into(),
    ];
    if let Some(ua) = &opts.user_agent {
        parts.push(format!("-ua {}", shell_quote(ua)).into());
    }
    if let Some(cookie) = &opts.cookie {
        parts.push(format!("-headers {}", shell_quote(&format!("Cookie: {cookie}"))).into());
    }
    parts.push(format!("| tee -a {}", path_arg(crawl)).into());
    join(parts)
}

/// URLs known to VirusTotal for one target, via the bundled helper script.
pub fn virustotal(opts: &ReconOptions, target: &str, crawl: &Path) -> String {
    let script = opts.script_dir.join("virustotalx.sh");
    format!(
        "/bin/bash {} {} | tee -a {}",
        path_arg(&script),
        shell_quote(target),
        path_arg(crawl)
    )
}

/// JavaScript URLs from the crawl, minus vendored libraries, kept only when live.
pub fn filter_js(opts: &ReconOptions, crawl: &Path, out: &Path) -> String {
    let mut parts: Vec<Cow<'_, str>> = vec![format!("grep '\\.js$' {}", path_arg(crawl)).into()];
    for excluded in &opts.js_exclude {
        parts.push(format!("| grep -vF {}", shell_quote(excluded)).into());
    }
    parts.push("| sort -u | httpx -silent".into());
    parts.push(format!("-mc {} -rl {}", shell_quote(&opts.js_live_codes), opts.rate_limit).into());
    parts.extend(opts.header_flags().into_iter().map(Cow::Owned));
    parts.push(format!("> {}", path_arg(out)).into());
    join(parts)
}

/// Unique HTTP(S) URLs from the crawl with 404s removed.
pub fn clean_endpoints(opts: &ReconOptions, crawl: &Path, out: &Path) -> String {
    let mut parts: Vec<Cow<'_, str>> = vec![
        format!("grep '^http' {}", path_arg(crawl)).into(),
        "| sort -u | httpx -silent -fc 404 -fr".into(),
        format!("-rl {}", opts.rate_limit).into(),
    ];
    parts.extend(opts.header_flags().into_iter().map(Cow::Owned));
    if let Some(proxy) = opts.proxy_flag() {
        parts.push(proxy.into());
    }
    parts.push(format!("> {}", path_arg(out)).into());
    join(parts)
}

/// Secret patterns in one live JavaScript file.
pub fn secret_finder(opts: &ReconOptions, js_url: &str, result: &Path) -> String {
    let script = opts.script_dir.join("SecretFinder.py");
    let mut parts: Vec<Cow<'_, str>> = vec![
        format!("python3 {} -i {} -o cli", path_arg(&script), shell_quote(js_url)).into(),
    ];
    if let Some(cookie) = &opts.cookie {
        parts.push(format!("-c {}", shell_quote(cookie)).into());
    }
    parts.push(format!("| tee -a {}", path_arg(result)).into());
    join(parts)
}

/// Endpoints matching one grep category, appended to the result file.
pub fn grep_category(category: &GrepCategory, endpoints: &Path, result: &Path) -> String {
    format!(
        "grep -E {} {} | tee -a {}",
        shell_quote(&category.regex()),
        path_arg(endpoints),
        path_arg(result)
    )
}

/// Endpoints with 403 responses removed.
pub fn filter_forbidden(opts: &ReconOptions, endpoints: &Path, out: &Path) -> String {
    let mut parts: Vec<Cow<'_, str>> = vec![
        format!("cat {} | httpx -silent -fc 403 -fr", path_arg(endpoints)).into(),
        format!("-rl {}", opts.rate_limit).into(),
    ];
    parts.extend(opts.header_flags().into_iter().map(Cow::Owned));
    parts.push(format!("> {}", path_arg(out)).into());
    join(parts)
}

/// URLs matching one gf pattern, appended to the result file.
pub fn gf(pattern: &str, params: &Path, result: &Path) -> String {
    format!(
        "cat {} | gf {} | tee -a {}",
        path_arg(params),
        shell_quote(pattern),
        path_arg(result)
    )
}

/// XSS candidates piped into dalfox.
pub fn dalfox(opts: &ReconOptions, params: &Path, out: &Path) -> String {
    let mut parts: Vec<Cow<'_, str>> = vec![
        format!("cat {} | gf xss | dalfox pipe", path_arg(params)).into(),
        format!("--worker {}", opts.dalfox_workers).into(),
    ];
    if let Some(cookie) = &opts.cookie {
        parts.push(format!("-C {}", shell_quote(cookie)).into());
    }
    parts.push(format!("-o {} --output-all", path_arg(out)).into());
    join(parts)
}

pub fn notify() -> String {
    format!("echo {} | notify -silent", shell_quote(NOTIFY_MESSAGE))
}
