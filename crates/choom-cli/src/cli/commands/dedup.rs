//! `choom dedup` – reduce a URL list outside of a full run.

use anyhow::{Context, Result};
use choom_core::dedup::{self, ReduceStats};
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub async fn run_dedup(input: &Path, output: &Path) -> Result<()> {
    let stats = if !is_stdio(input) && !is_stdio(output) {
        dedup::reduce_file(input, output)?
    } else {
        let text = read_input(input).await?;
        let (urls, stats) = dedup::reduce_with_stats(text.lines());
        write_output(output, &urls).await?;
        stats
    };
    report(&stats);
    Ok(())
}

async fn read_input(input: &Path) -> Result<String> {
    let bytes = if is_stdio(input) {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("read stdin")?;
        buf
    } else {
        tokio::fs::read(input)
            .await
            .with_context(|| format!("read url list: {}", input.display()))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn write_output(output: &Path, urls: &[String]) -> Result<()> {
    if !is_stdio(output) {
        return dedup::write_lines(output, urls);
    }
    let mut body = String::with_capacity(urls.iter().map(|u| u.len() + 1).sum());
    for url in urls {
        body.push_str(url);
        body.push('\n');
    }
    let mut stdout = tokio::io::stdout();
    stdout.write_all(body.as_bytes()).await.context("write stdout")?;
    stdout.flush().await.context("flush stdout")?;
    Ok(())
}

/// Summary goes to stderr so stdout stays a clean URL list.
fn report(stats: &ReduceStats) {
    eprintln!(
        "{} URL(s) in, {} out ({} blank skipped, {} non-URL kept as-is)",
        stats.lines, stats.groups, stats.blank, stats.malformed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dedup_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(
            &input,
            "https://a.com/x?id=1\nhttps://a.com/x?id=2&id=3\nhttps://a.com/y?q=1\n",
        )
        .unwrap();
        run_dedup(&input, &output).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "https://a.com/x?id=2&id=3\nhttps://a.com/y?q=1\n"
        );
    }

    #[tokio::test]
    async fn dedup_missing_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_dedup(&dir.path().join("none.txt"), Path::new("-"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("read url list"));
    }

    #[test]
    fn dash_means_stdio() {
        assert!(is_stdio(Path::new("-")));
        assert!(!is_stdio(Path::new("./-")));
    }
}
