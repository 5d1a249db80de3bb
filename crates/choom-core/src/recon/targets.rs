//! Target list loading.

use anyhow::{Context, Result};
use std::path::Path;

/// Trimmed, non-blank lines of `text`.
pub fn parse_targets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Reads one target (domain or URL) per line from `path`.
pub fn load_targets(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read target list: {}", path.display()))?;
    Ok(parse_targets(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_trims() {
        assert_eq!(
            parse_targets("a.com\n\n  b.com  \r\n\t\nhttps://c.com\n"),
            ["a.com", "b.com", "https://c.com"]
        );
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_targets(&dir.path().join("subs.txt")).unwrap_err();
        assert!(format!("{:#}", err).contains("read target list"));
    }
}
