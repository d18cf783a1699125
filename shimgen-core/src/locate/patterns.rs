//! Per-name regex patterns for struct and `#define` definitions.
//!
//! These are textual heuristics, not a C parser: comments, strings and
//! preprocessor conditionals are not understood.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;

use crate::error::{ShimgenError, ShimgenResult};

/// A struct definition matched in some file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMatch {
    /// The whole `struct NAME { ... };` text.
    pub text: String,
    /// Everything between the opening brace and the terminator.
    pub body: String,
}

/// Compiled patterns for one name.
#[derive(Debug)]
pub struct DefinitionPatterns {
    /// `struct NAME {` at the start of a line, ending at a `};` that starts a line.
    anchored_struct: Regex,
    /// `struct NAME {` anywhere, ending at the first `}` followed by `;`.
    inline_struct: Regex,
    /// `#define NAME` at the start of a line, with backslash continuations.
    /// A `\r` before a line end is never part of the value.
    define: Regex,
}

impl DefinitionPatterns {
    /// Compile the patterns for `name`.
    pub fn for_name(name: &str) -> ShimgenResult<Self> {
        let escaped = regex::escape(name);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| {
                ShimgenError::internal(format!("bad pattern for '{}': {}", name, e))
            })
        };
        Ok(Self {
            anchored_struct: compile(format!(r"(?ms)^struct\s+{}\s*\{{(.*?)^\}};", escaped))?,
            inline_struct: compile(format!(r"\bstruct\s+{}\s*\{{([^}}]*)\}}\s*;", escaped))?,
            define: compile(format!(
                r"(?m)^#[ \t]*define[ \t]+{}((?:[ \t(](?:[^\r\n]*\\\r?\n)*[^\r\n]*)?)\r?$",
                escaped
            ))?,
        })
    }

    /// Line-anchored struct match, used when scanning the tree.
    ///
    /// Nested braces are allowed in the body; only a `};` at the start of a
    /// line terminates it.
    pub fn find_struct(&self, content: &str) -> Option<StructMatch> {
        Self::struct_match(&self.anchored_struct, content)
    }

    /// Unanchored struct match, used for the same-file pass.
    ///
    /// Brace matching is naive: the first `}` followed by `;` ends the body,
    /// so a struct containing nested braces is cut short or missed.
    pub fn find_struct_inline(&self, content: &str) -> Option<StructMatch> {
        Self::struct_match(&self.inline_struct, content)
    }

    /// The text following the macro name, up to the unescaped line end.
    pub fn find_define(&self, content: &str) -> Option<String> {
        self.define
            .captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn struct_match(re: &Regex, content: &str) -> Option<StructMatch> {
        let caps = re.captures(content)?;
        Some(StructMatch {
            text: caps.get(0)?.as_str().to_string(),
            body: caps.get(1)?.as_str().to_string(),
        })
    }
}

/// Compile-once cache of [`DefinitionPatterns`], keyed by name.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: RefCell<HashMap<String, Rc<DefinitionPatterns>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns for `name`, compiled on first use.
    pub fn get(&self, name: &str) -> ShimgenResult<Rc<DefinitionPatterns>> {
        if let Some(p) = self.patterns.borrow().get(name) {
            return Ok(Rc::clone(p));
        }
        let compiled = Rc::new(DefinitionPatterns::for_name(name)?);
        self.patterns
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&compiled));
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_struct_allows_nested_braces() {
        let content = "\
struct outer {
\tunion {
\t\tint a;
\t\tlong b;
\t};
\tint c;
};
";
        let p = DefinitionPatterns::for_name("outer").unwrap();
        let m = p.find_struct(content).unwrap();
        assert_eq!(m.text, content.trim_end());
        assert!(m.body.contains("int c;"));
    }

    #[test]
    fn test_anchored_struct_requires_line_start() {
        let p = DefinitionPatterns::for_name("x").unwrap();
        assert!(p.find_struct("typedef struct x { int a;\n};\n").is_none());
        assert!(p.find_struct("struct x { int a; };\n").is_none());
    }

    #[test]
    fn test_anchored_struct_exact_name() {
        let p = DefinitionPatterns::for_name("foo").unwrap();
        assert!(p.find_struct("struct foobar {\n\tint a;\n};\n").is_none());
        assert!(p.find_struct("struct foo {\n\tint a;\n};\n").is_some());
    }

    #[test]
    fn test_inline_struct_is_naive() {
        let p = DefinitionPatterns::for_name("inner").unwrap();
        let m = p
            .find_struct_inline("typedef int t;\n  struct inner { int a; struct x *p; } ;\n")
            .unwrap();
        assert_eq!(m.text, "struct inner { int a; struct x *p; } ;");
        assert_eq!(m.body, " int a; struct x *p; ");

        // The first `}` before a `;` ends the match, so a nested block defeats it.
        let p = DefinitionPatterns::for_name("nest").unwrap();
        assert!(p
            .find_struct_inline("struct nest { union { int a; } u; };")
            .is_none());
    }

    #[test]
    fn test_define_simple() {
        let p = DefinitionPatterns::for_name("LIMIT").unwrap();
        assert_eq!(p.find_define("#define LIMIT 42\n").as_deref(), Some(" 42"));
        assert_eq!(
            p.find_define("# define LIMIT\t42 /* max */\n").as_deref(),
            Some("\t42 /* max */")
        );
    }

    #[test]
    fn test_define_continuation() {
        let p = DefinitionPatterns::for_name("MULTI").unwrap();
        let content = "#define MULTI(a) \\\n\t((a) + \\\n\t 1)\nint x;\n";
        assert_eq!(
            p.find_define(content).as_deref(),
            Some("(a) \\\n\t((a) + \\\n\t 1)")
        );
    }

    #[test]
    fn test_define_empty_does_not_swallow_next_line() {
        let p = DefinitionPatterns::for_name("FLAG").unwrap();
        assert_eq!(p.find_define("#define FLAG\n#define OTHER 1\n").as_deref(), Some(""));
    }

    #[test]
    fn test_define_crlf_continuation() {
        let p = DefinitionPatterns::for_name("MULTI").unwrap();
        let content = "#define MULTI(a) \\\r\n\t((a) + 1)\r\nint x;\r\n";
        assert_eq!(
            p.find_define(content).as_deref(),
            Some("(a) \\\r\n\t((a) + 1)")
        );
    }

    #[test]
    fn test_define_crlf_line_end_not_captured() {
        let p = DefinitionPatterns::for_name("LIMIT").unwrap();
        assert_eq!(p.find_define("#define LIMIT 42\r\n").as_deref(), Some(" 42"));

        let p = DefinitionPatterns::for_name("FLAG").unwrap();
        assert_eq!(
            p.find_define("#define FLAG\r\n#define OTHER 1\r\n").as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_define_exact_name() {
        let p = DefinitionPatterns::for_name("FOO").unwrap();
        assert!(p.find_define("#define FOOBAR 1\n").is_none());
        assert!(p.find_define("  #define FOO 1\n").is_none());
    }

    #[test]
    fn test_cache_reuses_patterns() {
        let cache = PatternCache::new();
        let a = cache.get("a").unwrap();
        let b = cache.get("a").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }
}
