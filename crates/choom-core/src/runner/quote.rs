//! Quoting of user-supplied values embedded in `sh -c` command lines.

use std::borrow::Cow;

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | ',' | '+' | '%')
}

/// Returns `value` unchanged when it only contains characters the shell
/// treats literally, otherwise wraps it in single quotes (embedded `'`
/// becomes `'\''`).
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && value.chars().all(is_shell_safe) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
    }
}
