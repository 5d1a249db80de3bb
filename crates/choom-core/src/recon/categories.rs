//! Grep categories run over the live endpoint list.

/// A named set of substrings searched for in endpoint URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrepCategory {
    /// Banner title in `result.txt`.
    pub title: &'static str,
    pub patterns: &'static [&'static str],
    /// Match only at the end of the URL.
    pub anchored: bool,
}

pub const BACKUP_FILES: GrepCategory = GrepCategory {
    title: "BACKUP FILES",
    patterns: &[
        ".zip", ".rar", ".7z", ".exe", ".tar", ".gz", ".dll", ".iso", ".bk", ".bak", ".old",
    ],
    anchored: true,
};

pub const INTERESTING_FILES: GrepCategory = GrepCategory {
    title: "INTERESTING FILES",
    patterns: &[".aspx", ".ashx", ".cgi", ".jsp", ".xml", ".txt", ".xhtml"],
    anchored: true,
};

pub const INTERESTING_INFORMATION: GrepCategory = GrepCategory {
    title: "INTERESTING INFORMATION",
    patterns: &[
        "token=",
        "apikey=",
        "/resetpassword/",
        "registration",
        "login",
        "==",
        "password",
        "secret",
        "api",
        "pass",
        "username",
        "user",
        "admin",
        "code=",
        "cred",
    ],
    anchored: false,
};

pub const GRAPHQL: GrepCategory = GrepCategory {
    title: "GRAPHQL API",
    patterns: &[
        "query",
        "mutation",
        "graphql",
        "graphiql",
        "subscriptions",
        "graph",
        "playground",
        "altair",
        "explorer",
        "voyager",
    ],
    anchored: true,
};

/// Images and PDFs; only searched when document discovery is requested.
pub const DOCUMENTS: GrepCategory = GrepCategory {
    title: "INTERESTING DOCUMENTS",
    patterns: &[".jpg", ".png", ".pdf"],
    anchored: true,
};

/// Categories in run order.
pub fn categories(discover_documents: bool) -> Vec<GrepCategory> {
    let mut all = vec![BACKUP_FILES, INTERESTING_FILES, INTERESTING_INFORMATION, GRAPHQL];
    if discover_documents {
        all.push(DOCUMENTS);
    }
    all
}

impl GrepCategory {
    /// POSIX extended regex: `(p1|p2|...)`, `$`-anchored when requested.
    /// Patterns are matched literally.
    pub fn regex(&self) -> String {
        let alternation = self
            .patterns
            .iter()
            .map(|p| escape_ere(p))
            .collect::<Vec<_>>()
            .join("|");
        if self.anchored {
            format!("({})$", alternation)
        } else {
            format!("({})", alternation)
        }
    }
}

fn escape_ere(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(
            c,
            '.' | '[' | ']' | '(' | ')' | '*' | '+' | '?' | '{' | '}' | '|' | '^' | '$' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
