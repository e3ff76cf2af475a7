//! Documentation comment escaping
//!
//! Text interpolated into a `/** ... */` block must not be able to close it
//! (or open a nested comment). Every adjacent `/` `*` or `*` `/` pair is split
//! by a space, including pairs spelled with `\u002f` / `\u002a` escapes (with
//! any number of `u`s, as in `\uuu002a`), which the JVM compilers decode
//! before tokenizing.

use crate::format::Arg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Slash,
    Star,
    Other,
}

/// Classify the next logical character and return its byte length
fn next_token(rest: &str) -> (Token, usize) {
    if rest.starts_with('/') {
        return (Token::Slash, 1);
    }
    if rest.starts_with('*') {
        return (Token::Star, 1);
    }
    if let Some(escaped) = unicode_escape(rest) {
        return escaped;
    }

    (Token::Other, rest.chars().next().map_or(1, char::len_utf8))
}

/// `\u002a` or `\u002f` in any hex case, with one or more `u`s
fn unicode_escape(rest: &str) -> Option<(Token, usize)> {
    let after = rest.strip_prefix('\\')?;
    let digits = after.trim_start_matches('u');
    let us = after.len() - digits.len();
    if us == 0 {
        return None;
    }

    let token = match digits.get(..4)? {
        hex if hex.eq_ignore_ascii_case("002a") => Token::Star,
        hex if hex.eq_ignore_ascii_case("002f") => Token::Slash,
        _ => return None,
    };

    Some((token, 1 + us + 4))
}

/// Break up comment delimiters in documentation text
///
/// ```
/// use javagen_codegen::javadoc::escape_javadoc;
///
/// assert_eq!(escape_javadoc("a */ b"), "a * / b");
/// assert_eq!(escape_javadoc("/* c"), "/ * c");
/// assert_eq!(escape_javadoc("\\u002a/"), "\\u002a /");
/// ```
pub fn escape_javadoc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = Token::Other;
    let mut rest = text;

    while !rest.is_empty() {
        let (token, len) = next_token(rest);
        if matches!(
            (previous, token),
            (Token::Slash, Token::Star) | (Token::Star, Token::Slash)
        ) {
            out.push(' ');
        }

        out.push_str(&rest[..len]);
        previous = token;
        rest = &rest[len..];
    }

    out
}

/// Escape a template argument, recursing into lists
///
/// Non-text arguments are returned unchanged.
pub fn escape_arg(arg: &Arg) -> Arg {
    match arg {
        Arg::Str(s) => Arg::Str(escape_javadoc(s)),
        Arg::List(items) => Arg::List(items.iter().map(escape_arg).collect()),
        other => other.clone(),
    }
}
