//! Lexical URL decomposition.
//!
//! The split is purely textual: scheme, authority, path and fragment keep the
//! exact text of the input line. No case folding, no dot-segment removal and
//! no re-encoding happen here, so two lines only share a key when their
//! non-query parts are byte-identical.

use std::borrow::Cow;

use thiserror::Error;
use url::form_urlencoded;

/// Why a line could not be split into URL components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing or invalid scheme")]
    NoScheme,
    #[error("missing authority after scheme")]
    NoAuthority,
}

/// A URL line split into its components, borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedUrl<'a> {
    pub scheme: &'a str,
    /// `host[:port]`, possibly with userinfo.
    pub authority: &'a str,
    pub path: &'a str,
    /// Raw query text without the leading `?`.
    pub query: Option<&'a str>,
    /// Raw fragment text without the leading `#`.
    pub fragment: Option<&'a str>,
}

impl<'a> ParsedUrl<'a> {
    /// Splits `input` into `scheme://authority/path?query#fragment`.
    ///
    /// Requires a scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`) and a
    /// non-empty authority introduced by `//`.
    pub fn parse(input: &'a str) -> Result<Self, ParseError> {
        let (scheme, rest) = split_scheme(input).ok_or(ParseError::NoScheme)?;
        let rest = rest.strip_prefix("//").ok_or(ParseError::NoAuthority)?;

        let (rest, fragment) = match rest.split_once('#') {
            Some((before, fragment)) => (before, Some(fragment)),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((before, query)) => (before, Some(query)),
            None => (rest, None),
        };
        let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
        if authority.is_empty() {
            return Err(ParseError::NoAuthority);
        }

        Ok(Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }

    /// Decoded `(name, value)` pairs in source order. Duplicate names are kept.
    pub fn query_pairs(&self) -> impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)> {
        form_urlencoded::parse(self.query.unwrap_or_default().as_bytes())
    }

    /// Number of query pairs, duplicates counted individually.
    ///
    /// Empty `&&` segments are not pairs; a bare `name` without `=` is a pair
    /// with an empty value.
    pub fn param_count(&self) -> usize {
        self.query_pairs().count()
    }
}

fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = input.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_all_components() {
        let p = ParsedUrl::parse("https://a.com:8443/x/y?id=1&q=2#top").unwrap();
        assert_eq!(p.scheme, "https");
        assert_eq!(p.authority, "a.com:8443");
        assert_eq!(p.path, "/x/y");
        assert_eq!(p.query, Some("id=1&q=2"));
        assert_eq!(p.fragment, Some("top"));
    }

    #[test]
    fn authority_only() {
        let p = ParsedUrl::parse("http://a.com").unwrap();
        assert_eq!(p.authority, "a.com");
        assert_eq!(p.path, "");
        assert_eq!(p.query, None);

        let p = ParsedUrl::parse("http://a.com?x=1").unwrap();
        assert_eq!(p.authority, "a.com");
        assert_eq!(p.query, Some("x=1"));
    }

    #[test]
    fn question_mark_inside_fragment_is_not_a_query() {
        let p = ParsedUrl::parse("https://a.com/x#frag?id=1").unwrap();
        assert_eq!(p.query, None);
        assert_eq!(p.fragment, Some("frag?id=1"));
        assert_eq!(p.param_count(), 0);
    }

    #[test]
    fn keeps_literal_case() {
        let p = ParsedUrl::parse("HTTPS://A.com/X").unwrap();
        assert_eq!(p.scheme, "HTTPS");
        assert_eq!(p.authority, "A.com");
        assert_eq!(p.path, "/X");
    }

    #[test]
    fn rejects_lines_without_scheme_or_authority() {
        assert_eq!(ParsedUrl::parse("not a url"), Err(ParseError::NoScheme));
        assert_eq!(ParsedUrl::parse("/relative?id=1"), Err(ParseError::NoScheme));
        assert_eq!(ParsedUrl::parse("1http://a.com"), Err(ParseError::NoScheme));
        assert_eq!(ParsedUrl::parse("mailto:bob@a.com"), Err(ParseError::NoAuthority));
        assert_eq!(ParsedUrl::parse("https:///path"), Err(ParseError::NoAuthority));
    }

    #[test]
    fn counts_duplicates_and_bare_names() {
        let p = ParsedUrl::parse("https://a.com/x?id=1&id=2&&flag").unwrap();
        assert_eq!(p.param_count(), 3);
        let names: Vec<_> = p.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(names, ["id", "id", "flag"]);
    }

    #[test]
    fn decodes_names() {
        let p = ParsedUrl::parse("https://a.com/?user%5Bname%5D=x&a+b=1").unwrap();
        let names: Vec<_> = p.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(names, ["user[name]", "a b"]);
    }
}
