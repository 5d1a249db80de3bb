//! File-level wrapper: read a URL list, reduce it, write the result.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::reducer::{ReduceStats, Reducer};

/// Reduces the URL list in `src` and writes one representative per line to
/// `dst` (LF-terminated). Invalid UTF-8 in the input is replaced rather than
/// rejected, since crawler output is not always clean.
pub fn reduce_file(src: &Path, dst: &Path) -> Result<ReduceStats> {
    let bytes = fs::read(src).with_context(|| format!("read url list: {}", src.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let reducer: Reducer = text.lines().collect();
    let stats = reducer.stats();
    write_lines(dst, reducer.urls())?;
    tracing::info!(
        src = %src.display(),
        dst = %dst.display(),
        lines = stats.lines,
        groups = stats.groups,
        malformed = stats.malformed,
        "reduced url list"
    );
    Ok(stats)
}

/// Writes each item followed by `\n`, replacing the file.
pub fn write_lines<I, S>(dst: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = fs::File::create(dst).with_context(|| format!("create {}", dst.display()))?;
    let mut out = std::io::BufWriter::new(file);
    for line in lines {
        out.write_all(line.as_ref().as_bytes())
            .and_then(|_| out.write_all(b"\n"))
            .with_context(|| format!("write {}", dst.display()))?;
    }
    out.flush().with_context(|| format!("flush {}", dst.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_file_writes_lf_terminated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.txt");
        let dst = dir.path().join("out.txt");
        fs::write(
            &src,
            "https://a.com/x?id=1\r\nhttps://a.com/x?id=2&name=bob\n\nhttps://a.com/y\n",
        )
        .unwrap();

        let stats = reduce_file(&src, &dst).unwrap();
        // {id} and {id, name} are different groups
        assert_eq!(stats.groups, 3);
        assert_eq!(stats.blank, 1);
        assert_eq!(
            fs::read_to_string(&dst).unwrap(),
            "https://a.com/x?id=1\nhttps://a.com/x?id=2&name=bob\nhttps://a.com/y\n"
        );
    }

    #[test]
    fn reduce_file_keeps_richest_variant_per_name_set() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.txt");
        let dst = dir.path().join("out.txt");
        fs::write(
            &src,
            "https://a.com/x?id=1&name=al\nhttps://a.com/x?name=bob&id=2&id=3\nhttps://a.com/x?id=4\n",
        )
        .unwrap();

        let stats = reduce_file(&src, &dst).unwrap();
        assert_eq!(stats.groups, 2);
        assert_eq!(
            fs::read_to_string(&dst).unwrap(),
            "https://a.com/x?name=bob&id=2&id=3\nhttps://a.com/x?id=4\n"
        );
    }

    #[test]
    fn reduce_file_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.txt");
        let dst = dir.path().join("out.txt");
        fs::write(&src, b"https://a.com/x?id=1\n\xff\xfe\n").unwrap();

        let stats = reduce_file(&src, &dst).unwrap();
        assert_eq!(stats.groups, 2);
        assert_eq!(stats.malformed, 1);
    }

    #[test]
    fn reduce_file_missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = reduce_file(&dir.path().join("absent.txt"), &dir.path().join("out.txt"))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("read url list"));
    }

    #[test]
    fn empty_input_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.txt");
        let dst = dir.path().join("out.txt");
        fs::write(&src, "\n  \n").unwrap();
        let stats = reduce_file(&src, &dst).unwrap();
        assert_eq!(stats.groups, 0);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "");
    }
}
