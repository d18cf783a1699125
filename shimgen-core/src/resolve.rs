//! Transitive resolution of requested structs and macros.
//!
//! Starting from the request, every struct found has its `struct NAME`
//! references resolved *before* it is recorded: first in the same file, then
//! anywhere in the tree. The resulting discovery order therefore lists
//! dependencies before their dependents.
//!
//! A name is claimed before its references are followed and is never looked
//! up again once claimed. That check is the only cycle guard, and it is what
//! makes self-referencing and mutually referencing structs terminate.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ShimgenError, ShimgenResult};
use crate::extract::extract_refs;
use crate::locate::{DefinitionKind, Locator, StructMatch};
use crate::request::FindRequest;
use crate::scan::HeaderTree;

/// A struct definition pulled from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundStruct {
    pub name: String,
    /// Full `struct NAME { ... };` text as it appears in the file.
    pub text: String,
    pub file: PathBuf,
}

/// A `#define` pulled from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundMacro {
    pub name: String,
    /// Everything after the name, continuation lines included.
    pub text: String,
    pub file: PathBuf,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Structs in discovery order.
    pub structs: Vec<FoundStruct>,
    /// Macros in first-found order.
    pub macros: Vec<FoundMacro>,
    /// Recursion-excluded references that were never found; they only get
    /// a forward declaration.
    pub opaque: Vec<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.macros.is_empty()
    }

    pub fn find_struct(&self, name: &str) -> Option<&FoundStruct> {
        self.structs.iter().find(|s| s.name == name)
    }
}

/// Mutable progress of one top-level run.
#[derive(Debug, Default)]
pub struct ResolveState {
    structs: Vec<FoundStruct>,
    macros: Vec<FoundMacro>,
    /// Found or currently being resolved.
    claimed: HashSet<String>,
    /// Searched across the whole tree without success.
    missing: HashSet<String>,
    opaque: Vec<String>,
}

impl ResolveState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    pub fn has_macro(&self, name: &str) -> bool {
        self.macros.iter().any(|m| m.name == name)
    }

    fn claim(&mut self, name: &str) {
        self.claimed.insert(name.to_string());
    }

    fn note_opaque(&mut self, name: &str) {
        if !self.opaque.iter().any(|o| o == name) {
            self.opaque.push(name.to_string());
        }
    }

    /// Finish the run, dropping opaque names that were resolved after all.
    pub fn into_resolution(self) -> Resolution {
        let claimed = self.claimed;
        Resolution {
            structs: self.structs,
            macros: self.macros,
            opaque: self
                .opaque
                .into_iter()
                .filter(|o| !claimed.contains(o))
                .collect(),
        }
    }
}

/// Drives the locator and extractor over one tree for one request.
#[derive(Debug)]
pub struct Resolver<'a> {
    tree: &'a HeaderTree,
    request: &'a FindRequest,
    locator: Locator,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a HeaderTree, request: &'a FindRequest) -> Self {
        Self {
            tree,
            request,
            locator: Locator::new(),
        }
    }

    /// Resolve the whole request.
    ///
    /// Fails with [`ShimgenError::Unresolved`] naming every requested struct
    /// and macro that no file defines.
    pub fn resolve(&self) -> ShimgenResult<Resolution> {
        let mut state = ResolveState::new();
        self.scan_top_level(&mut state)?;

        let structs: Vec<String> = self
            .request
            .structs()
            .iter()
            .filter(|s| !state.is_claimed(s))
            .cloned()
            .collect();
        let macros: Vec<String> = self
            .request
            .macros()
            .iter()
            .filter(|m| !state.has_macro(m))
            .cloned()
            .collect();
        if !structs.is_empty() || !macros.is_empty() {
            return Err(ShimgenError::Unresolved { structs, macros });
        }

        Ok(state.into_resolution())
    }

    fn all_found(&self, state: &ResolveState) -> bool {
        self.request.structs().iter().all(|s| state.is_claimed(s))
            && self.request.macros().iter().all(|m| state.has_macro(m))
    }

    /// One pass over every header, trying every outstanding requested name.
    fn scan_top_level(&self, state: &mut ResolveState) -> ShimgenResult<()> {
        for file in self.tree.files() {
            if self.all_found(state) {
                break;
            }
            let Some(content) = self.tree.read(file) else {
                continue;
            };
            debug!(path = %file.display(), "searching in file");

            for name in self.request.structs() {
                if state.is_claimed(name) {
                    continue;
                }
                if let Some(m) = self.locator.struct_in(&content, name)? {
                    debug!(name = %name, path = %file.display(), "found requested struct");
                    self.record_struct(state, name, m, file, &content)?;
                }
            }

            for name in self.request.macros() {
                if state.has_macro(name) {
                    continue;
                }
                if let Some(text) = self.locator.define_in(&content, name)? {
                    debug!(name = %name, path = %file.display(), "found requested #define");
                    state.macros.push(FoundMacro {
                        name: name.clone(),
                        text,
                        file: file.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Claim `name`, resolve everything its body references, then record it.
    fn record_struct(
        &self,
        state: &mut ResolveState,
        name: &str,
        found: StructMatch,
        file: &Path,
        content: &str,
    ) -> ShimgenResult<()> {
        state.claim(name);

        let refs = extract_refs(&found.body);
        if !refs.is_empty() {
            debug!(name, refs = ?refs, "referenced structs");
        }
        self.resolve_in_file(state, &refs, file, content)?;
        self.resolve_in_tree(state, &refs)?;

        state.structs.push(FoundStruct {
            name: name.to_string(),
            text: found.text,
            file: file.to_path_buf(),
        });
        Ok(())
    }

    /// Same-file pass: the naive unanchored pattern over the file that
    /// referenced the names.
    fn resolve_in_file(
        &self,
        state: &mut ResolveState,
        refs: &[String],
        file: &Path,
        content: &str,
    ) -> ShimgenResult<()> {
        for r in refs {
            if state.is_claimed(r) {
                continue;
            }
            match self.locator.struct_inline_in(content, r)? {
                Some(m) => {
                    debug!(name = %r, path = %file.display(), "found in same file");
                    self.record_struct(state, r, m, file, content)?;
                }
                None => debug!(name = %r, path = %file.display(), "not in same file"),
            }
        }
        Ok(())
    }

    /// Whole-tree pass for every reference the same-file pass left open.
    fn resolve_in_tree(&self, state: &mut ResolveState, refs: &[String]) -> ShimgenResult<()> {
        for r in refs {
            if state.is_claimed(r) {
                continue;
            }
            if self.request.is_norecurse(r) {
                debug!(name = %r, "not following excluded reference");
                state.note_opaque(r);
                continue;
            }
            if state.missing.contains(r) {
                continue;
            }
            debug!(name = %r, "recursively searching other files");
            self.find_in_tree(state, r)?;
        }
        Ok(())
    }

    /// Resolve a single referenced name with its own tree scan.
    fn find_in_tree(&self, state: &mut ResolveState, name: &str) -> ShimgenResult<()> {
        let Some(located) = self.locator.locate(self.tree, name, DefinitionKind::Struct)? else {
            warn!(name, "referenced struct not found anywhere in the tree");
            state.missing.insert(name.to_string());
            return Ok(());
        };

        // The same-file pass needs the defining file's full content.
        let content = self.tree.read(&located.file).unwrap_or_default();
        let found = StructMatch {
            text: located.text,
            body: located.body,
        };
        self.record_struct(state, name, found, &located.file, &content)
    }
}

/// Resolve `request` against `tree`.
pub fn resolve(tree: &HeaderTree, request: &FindRequest) -> ShimgenResult<Resolution> {
    Resolver::new(tree, request).resolve()
}
