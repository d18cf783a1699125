//! Definition lookup across a header tree.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │    patterns.rs      │     │      scan.rs        │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  struct / #define   │     │  ordered headers,   │
//! │  regex per name     │     │  tolerant reads     │
//! └──────────┬──────────┘     └──────────┬──────────┘
//!            └───────────┬───────────────┘
//!                        ▼
//!            ┌─────────────────────┐
//!            │      Locator        │
//!            │  first match in     │
//!            │  enumeration order  │
//!            └─────────────────────┘
//! ```
//!
//! A real tokenizer could replace the patterns behind [`Locator::locate`]
//! without changing its contract.

pub mod patterns;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ShimgenResult;
use crate::scan::HeaderTree;

pub use patterns::{DefinitionPatterns, PatternCache, StructMatch};

/// What kind of definition to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Struct,
    Macro,
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Struct => f.write_str("struct"),
            Self::Macro => f.write_str("#define"),
        }
    }
}

/// A definition found in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// For structs the full `struct NAME { ... };` text; for macros the
    /// text after the name.
    pub text: String,
    /// Struct body between the braces; empty for macros.
    pub body: String,
    /// File the definition came from.
    pub file: PathBuf,
}

/// Finds definitions by name, compiling each name's patterns once.
#[derive(Debug, Default)]
pub struct Locator {
    cache: PatternCache,
}

impl Locator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self, name: &str) -> ShimgenResult<std::rc::Rc<DefinitionPatterns>> {
        self.cache.get(name)
    }

    /// Line-anchored struct definition of `name` in `content`.
    pub fn struct_in(&self, content: &str, name: &str) -> ShimgenResult<Option<StructMatch>> {
        Ok(self.patterns(name)?.find_struct(content))
    }

    /// Naive unanchored struct definition of `name` in `content`.
    pub fn struct_inline_in(
        &self,
        content: &str,
        name: &str,
    ) -> ShimgenResult<Option<StructMatch>> {
        Ok(self.patterns(name)?.find_struct_inline(content))
    }

    /// Macro value of `name` in `content`.
    pub fn define_in(&self, content: &str, name: &str) -> ShimgenResult<Option<String>> {
        Ok(self.patterns(name)?.find_define(content))
    }

    /// First definition of `name` in the tree, in file enumeration order.
    pub fn locate(
        &self,
        tree: &HeaderTree,
        name: &str,
        kind: DefinitionKind,
    ) -> ShimgenResult<Option<Located>> {
        for file in tree.files() {
            let Some(content) = tree.read(file) else {
                continue;
            };
            debug!(%kind, name, path = %file.display(), "searching");
            if let Some(found) = self.locate_in(&content, file, name, kind)? {
                debug!(%kind, name, path = %file.display(), "found");
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Definition of `name` in one file's content.
    pub fn locate_in(
        &self,
        content: &str,
        file: &Path,
        name: &str,
        kind: DefinitionKind,
    ) -> ShimgenResult<Option<Located>> {
        let found = match kind {
            DefinitionKind::Struct => self.struct_in(content, name)?.map(|m| Located {
                text: m.text,
                body: m.body,
                file: file.to_path_buf(),
            }),
            DefinitionKind::Macro => self.define_in(content, name)?.map(|text| Located {
                text,
                body: String::new(),
                file: file.to_path_buf(),
            }),
        };
        Ok(found)
    }
}
