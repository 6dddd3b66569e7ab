//! Escaping of SDF identifiers.
//!
//! SDF identifiers may contain special characters only when each is
//! preceded by a backslash, e.g. `a\.b` for a cell literally named `a.b`.

/// How to escape an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeStyle {
    /// Escape every special character.
    #[default]
    AllChars,
    /// Escape every special character except a trailing `[digits]`
    /// bus index, which downstream tools match on unescaped.
    ExcludeLastIndex
}

/// Returns true if `c` is a special character in SDF identifiers.
///
/// `$` counts as special (the SDF standard lists it both ways, and
/// escaping a non-special character is harmless), and so does `'`.
#[inline]
pub fn is_special(c: char) -> bool {
    matches!(c as u32,
             33..=35 | 36 | 37..=47 | 58..=64 | 91..=94 | 96 | 123..=126)
}

/// Escape `identifier` so it can be written as an SDF identifier.
pub fn escape(identifier: &str, style: EscapeStyle) -> String {
    let (body, index) = match style {
        EscapeStyle::AllChars => (identifier, ""),
        EscapeStyle::ExcludeLastIndex => split_last_index(identifier)
    };
    let mut escaped = String::with_capacity(identifier.len() + 4);
    for c in body.chars() {
        if is_special(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push_str(index);
    escaped
}

/// Split off a trailing `[digits]` index, if there is one.
fn split_last_index(identifier: &str) -> (&str, &str) {
    if !identifier.ends_with(']') {
        return (identifier, "");
    }
    let Some(open) = identifier.rfind('[') else {
        return (identifier, "");
    };
    let close = identifier.len() - 1;
    if identifier[open + 1..close].bytes().all(|b| b.is_ascii_digit()) {
        identifier.split_at(open)
    } else {
        (identifier, "")
    }
}

/// Remove every backslash from `s`.
///
/// This does not check that the backslash was escaping a special
/// character, so a literal `\\` loses both of its backslashes.
#[inline]
pub fn unescape(s: &str) -> String {
    s.chars().filter(|&c| c != '\\').collect()
}
