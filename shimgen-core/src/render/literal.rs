//! Best-effort check for macro values that are plain C literal constants.
//!
//! No expression evaluation: `(1 << 4)` is not a literal, `(16)` and `-1`
//! are.

use std::sync::OnceLock;

use regex::Regex;

fn integer_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"^(?:0[xX][0-9a-fA-F]+|0[bB][01]+|0[0-7]*|[1-9][0-9]*)(?:[uU](?:ll|LL|[lL])?|(?:ll|LL|[lL])[uU]?)?$",
        )
        .expect("Hardcoded regex pattern is valid")
    })
}

fn float_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(?:(?:[0-9]+\.[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)[fFlL]?$")
            .expect("Hardcoded regex pattern is valid")
    })
}

fn char_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[LuU]?'(?:[^'\\\n]|\\[^\n])+'$").expect("Hardcoded regex pattern is valid")
    })
}

fn strings_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"^(?:(?:u8|[LuU])?"(?:[^"\\\n]|\\[^\n])*"\s*)+$"#)
            .expect("Hardcoded regex pattern is valid")
    })
}

/// The part of a macro value before any trailing comment.
pub fn strip_trailing_comment(value: &str) -> &str {
    let cut = [value.find("/*"), value.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(value.len());
    &value[..cut]
}

/// Whether `value` (comment already removed) is a single literal constant.
pub fn is_literal_constant(value: &str) -> bool {
    is_literal(value, false)
}

fn is_literal(value: &str, numeric_only: bool) -> bool {
    let s = value.trim();
    if s.is_empty() {
        return false;
    }
    if let Some(inner) = strip_outer_parens(s) {
        return is_literal(inner, numeric_only);
    }
    if let Some(rest) = s.strip_prefix('-').or_else(|| s.strip_prefix('+')) {
        return is_literal(rest, true);
    }
    if integer_regex().is_match(s) || float_regex().is_match(s) {
        return true;
    }
    !numeric_only && (char_regex().is_match(s) || strings_regex().is_match(s))
}

/// `inner` when `s` is `( inner )` with the two parentheses matching each other.
fn strip_outer_parens(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}
