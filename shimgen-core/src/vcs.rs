//! Version-control metadata for the provenance banner.
//!
//! Abstracting the lookup keeps resolution and rendering testable without a
//! real repository. Every failure degrades to "no metadata".

use std::path::Path;
#[cfg(feature = "git")]
use std::path::PathBuf;
#[cfg(feature = "git")]
use std::process::Command;

#[cfg(feature = "git")]
use anyhow::{bail, Context, Result};
#[cfg(feature = "git")]
use tracing::{debug, warn};

/// Revision and branch of the repository holding the header tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsInfo {
    pub revision: String,
    pub branch: String,
}

/// Provides revision metadata for a directory.
pub trait VcsProvider: std::fmt::Debug {
    /// Metadata for the repository containing `dir`, if there is one and it
    /// can be queried.
    fn revision_info(&self, dir: &Path) -> Option<VcsInfo>;
}

/// Provider that never reports metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVcs;

impl VcsProvider for NoVcs {
    fn revision_info(&self, _dir: &Path) -> Option<VcsInfo> {
        None
    }
}

/// Provider that shells out to the `git` CLI.
#[cfg(feature = "git")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

#[cfg(feature = "git")]
impl GitCli {
    /// Closest ancestor of `dir` (itself included) that contains `.git`.
    pub fn find_repo_root(dir: &Path) -> Option<PathBuf> {
        let abs = dir.canonicalize().ok()?;
        abs.ancestors()
            .find(|p| p.join(".git").exists())
            .map(Path::to_path_buf)
    }

    fn rev_parse(repo: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("rev-parse")
            .args(args)
            .current_dir(repo)
            .output()
            .context("failed to run git")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git rev-parse {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn query(repo: &Path) -> Result<VcsInfo> {
        Ok(VcsInfo {
            revision: Self::rev_parse(repo, &["HEAD"])?,
            branch: Self::rev_parse(repo, &["--abbrev-ref", "HEAD"])?,
        })
    }
}

#[cfg(feature = "git")]
impl VcsProvider for GitCli {
    fn revision_info(&self, dir: &Path) -> Option<VcsInfo> {
        let Some(repo) = Self::find_repo_root(dir) else {
            debug!(dir = %dir.display(), "no git repository above header tree");
            return None;
        };
        match Self::query(&repo) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(repo = %repo.display(), error = %format!("{:#}", e), "unable to get git info");
                None
            }
        }
    }
}

/// The provider used when none is configured explicitly.
pub fn default_provider() -> Box<dyn VcsProvider> {
    #[cfg(feature = "git")]
    {
        Box::new(GitCli)
    }
    #[cfg(not(feature = "git"))]
    {
        Box::new(NoVcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_vcs() {
        assert_eq!(NoVcs.revision_info(Path::new(".")), None);
    }

    #[cfg(feature = "git")]
    #[test]
    fn test_find_repo_root() {
        let dir = std::env::temp_dir()
            .join("shimgen_vcs_test")
            .join(format!("{}", std::process::id()));
        let nested = dir.join("include/uapi");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(dir.join(".git")).unwrap();

        let root = GitCli::find_repo_root(&nested).unwrap();
        assert_eq!(root, dir.canonicalize().unwrap());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[cfg(feature = "git")]
    #[test]
    fn test_missing_dir_has_no_repo() {
        assert!(GitCli::find_repo_root(Path::new("/nonexistent/shimgen/tree")).is_none());
    }
}
