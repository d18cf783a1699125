//! The resolved request handed to the resolution engine.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::ShimConfig;
use crate::error::{ShimgenError, ShimgenResult};

/// How a requested macro is shimmed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroRole {
    /// Host shim only when the value is a literal constant.
    Plain,
    /// Host shim regardless of the value.
    ForceHost,
    /// Redefined under the target prefix, never host-shimmed.
    Target,
}

/// Immutable description of what to extract.
#[derive(Debug, Clone, Default)]
pub struct FindRequest {
    structs: Vec<String>,
    macros: Vec<String>,
    norecurse: HashSet<String>,
    force_host: HashSet<String>,
    target: HashSet<String>,
}

impl FindRequest {
    /// Build a request from explicit name lists.
    ///
    /// Fails with [`ShimgenError::DuplicateMacros`] when any macro name occurs
    /// more than once across `defines`, `force_host` and `target`.
    pub fn new(
        structs: Vec<String>,
        defines: Vec<String>,
        force_host: Vec<String>,
        target: Vec<String>,
        norecurse: Vec<String>,
    ) -> ShimgenResult<Self> {
        let macros: Vec<String> = defines
            .iter()
            .chain(&force_host)
            .chain(&target)
            .cloned()
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &macros {
            *counts.entry(name.as_str()).or_default() += 1;
        }
        let mut dups: Vec<String> = Vec::new();
        for name in &macros {
            if counts[name.as_str()] > 1 && !dups.contains(name) {
                dups.push(name.clone());
            }
        }
        if !dups.is_empty() {
            return Err(ShimgenError::DuplicateMacros { names: dups });
        }

        if let Some(bad) = structs.iter().chain(&macros).find(|n| !is_identifier(n)) {
            return Err(ShimgenError::invalid_request(format!(
                "'{}' is not a C identifier",
                bad
            )));
        }

        let mut seen = HashSet::new();
        let structs: Vec<String> = structs
            .into_iter()
            .filter(|s| {
                let first = seen.insert(s.clone());
                if !first {
                    debug!(name = %s, "duplicate struct request collapsed");
                }
                first
            })
            .collect();

        Ok(Self {
            structs,
            macros,
            norecurse: norecurse.into_iter().collect(),
            force_host: force_host.into_iter().collect(),
            target: target.into_iter().collect(),
        })
    }

    /// Build a request from a loaded config file.
    pub fn from_config(config: &ShimConfig) -> ShimgenResult<Self> {
        Self::new(
            config.structs.clone(),
            config.defines.clone(),
            config.defines_forcehost.clone(),
            config.defines_target.clone(),
            config.structs_norecurse.clone(),
        )
    }

    /// Requested struct names, in request order.
    pub fn structs(&self) -> &[String] {
        &self.structs
    }

    /// Requested macro names: plain, then force-host, then target.
    pub fn macros(&self) -> &[String] {
        &self.macros
    }

    /// Whether the request names anything at all.
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.macros.is_empty()
    }

    pub fn is_requested_struct(&self, name: &str) -> bool {
        self.structs.iter().any(|s| s == name)
    }

    /// Whether references to `name` must not trigger a whole-tree search.
    pub fn is_norecurse(&self, name: &str) -> bool {
        self.norecurse.contains(name)
    }

    pub fn macro_role(&self, name: &str) -> MacroRole {
        if self.target.contains(name) {
            MacroRole::Target
        } else if self.force_host.contains(name) {
            MacroRole::ForceHost
        } else {
            MacroRole::Plain
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_across_sets() {
        let err = FindRequest::new(
            vec![],
            names(&["A", "B"]),
            names(&["B"]),
            names(&["A"]),
            vec![],
        )
        .unwrap_err();
        match err {
            ShimgenError::DuplicateMacros { names } => assert_eq!(names, vec!["A", "B"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_within_set() {
        let err = FindRequest::new(vec![], names(&["A", "A"]), vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, ShimgenError::DuplicateMacros { .. }));
    }

    #[test]
    fn test_macro_roles() {
        let req = FindRequest::new(
            vec![],
            names(&["PLAIN"]),
            names(&["HOSTY"]),
            names(&["TGT"]),
            vec![],
        )
        .unwrap();
        assert_eq!(req.macros(), &names(&["PLAIN", "HOSTY", "TGT"])[..]);
        assert_eq!(req.macro_role("PLAIN"), MacroRole::Plain);
        assert_eq!(req.macro_role("HOSTY"), MacroRole::ForceHost);
        assert_eq!(req.macro_role("TGT"), MacroRole::Target);
    }

    #[test]
    fn test_struct_duplicates_collapsed() {
        let req =
            FindRequest::new(names(&["a", "b", "a"]), vec![], vec![], vec![], vec![]).unwrap();
        assert_eq!(req.structs(), &names(&["a", "b"])[..]);
    }

    #[test]
    fn test_rejects_non_identifier() {
        let err =
            FindRequest::new(names(&["a b"]), vec![], vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, ShimgenError::InvalidRequest { .. }));
    }

    #[test]
    fn test_norecurse() {
        let req = FindRequest::new(vec![], vec![], vec![], vec![], names(&["sockaddr"])).unwrap();
        assert!(req.is_norecurse("sockaddr"));
        assert!(!req.is_norecurse("other"));
        assert!(req.is_empty());
    }
}
