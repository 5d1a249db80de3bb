//! Duplicate query-string reduction.
//!
//! Collapses crawled URLs that differ only in query parameter *values* into a
//! single representative per group, preferring the variant that carries the
//! most parameters. Grouping is by [`NormalizedKey`]: scheme, authority, path
//! and fragment taken literally plus the set of parameter names.
//!
//! Lines that do not parse as `scheme://authority...` are passed through
//! unchanged as their own group and counted in [`ReduceStats::malformed`].

mod file;
mod key;
mod parse;
mod reducer;

pub use file::{reduce_file, write_lines};
pub use key::NormalizedKey;
pub use parse::{ParseError, ParsedUrl};
pub use reducer::{ReduceStats, Reducer};

/// Reduces `lines` to one URL per normalized key.
///
/// Within a group the URL with the most query pairs wins; on a tie the
/// first-seen URL is kept. Output is in first-seen group order.
///
/// # Examples
///
/// - `["https://a.com/x?id=1", "https://a.com/x?id=2&id=3"]` → `["https://a.com/x?id=2&id=3"]`
/// - `["https://a.com/x?id=1&ref=a", "https://a.com/x?ref=b&id=2"]` → `["https://a.com/x?id=1&ref=a"]`
/// - `["https://a.com/x?id=1", "https://a.com/x?id=9"]` → `["https://a.com/x?id=1"]`
pub fn reduce<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().collect::<Reducer>().into_urls()
}

/// Same as [`reduce`], also returning the counters.
pub fn reduce_with_stats<I, S>(lines: I) -> (Vec<String>, ReduceStats)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let reducer: Reducer = lines.into_iter().collect();
    let stats = reducer.stats();
    (reducer.into_urls(), stats)
}
