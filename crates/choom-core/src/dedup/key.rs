//! Normalized keys: the "shape" of a URL with parameter values erased.

use std::collections::BTreeSet;
use std::fmt;

use url::form_urlencoded;

use super::parse::ParsedUrl;

/// Identity of a group of URLs.
///
/// Two URLs share a key when scheme, authority, path and fragment are
/// textually equal and they carry the same *set* of query parameter names.
/// Lines that are not URLs get an [`NormalizedKey::Opaque`] key made of their
/// own text, which never collides with a URL key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedKey {
    Url {
        /// `scheme://authority/path`
        base: String,
        names: BTreeSet<String>,
        fragment: String,
    },
    Opaque(String),
}

impl NormalizedKey {
    /// Key of a raw line: the URL key when it parses, otherwise an opaque key
    /// of the trimmed text.
    pub fn of(line: &str) -> Self {
        let line = line.trim();
        match ParsedUrl::parse(line) {
            Ok(parsed) => parsed.normalized_key(),
            Err(_) => Self::opaque(line),
        }
    }

    pub(crate) fn opaque(text: &str) -> Self {
        NormalizedKey::Opaque(text.to_string())
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, NormalizedKey::Opaque(_))
    }
}

impl ParsedUrl<'_> {
    /// Builds the key for this URL: distinct parameter names, values dropped.
    pub fn normalized_key(&self) -> NormalizedKey {
        let names = self.query_pairs().map(|(name, _)| name.into_owned()).collect();
        NormalizedKey::Url {
            base: format!("{}://{}{}", self.scheme, self.authority, self.path),
            names,
            fragment: self.fragment.unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for NormalizedKey {
    /// Renders `scheme://authority/path?a=&b=#fragment`, names form-encoded
    /// in sorted order; `?` and `#` parts are omitted when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedKey::Opaque(text) => f.write_str(text),
            NormalizedKey::Url {
                base,
                names,
                fragment,
            } => {
                f.write_str(base)?;
                if !names.is_empty() {
                    let mut query = form_urlencoded::Serializer::new(String::new());
                    for name in names {
                        query.append_pair(name, "");
                    }
                    write!(f, "?{}", query.finish())?;
                }
                if !fragment.is_empty() {
                    write!(f, "#{}", fragment)?;
                }
                Ok(())
            }
        }
    }
}
