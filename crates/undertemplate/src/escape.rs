/*
 * escape.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! HTML escaping for the escape directive.

use std::borrow::Cow;

/// Look up the character reference for a character that must be escaped.
fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        '`' => Some("&#x60;"),
        _ => None,
    }
}

/// Replace `&`, `<`, `>`, `"`, `'` and backtick with their character references.
///
/// Returns the input borrowed when nothing needs escaping.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(|c| entity(c).is_some()) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 8);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match entity(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}
