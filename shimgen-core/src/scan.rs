//! Deterministic header discovery with directory pruning.
//!
//! Files are enumerated in lexical order at every level
//! (`WalkDir::sort_by_file_name`), so "first match wins" is stable for a
//! given filesystem state. Reading is tolerant: a header that is not valid
//! UTF-8, or cannot be read, is skipped with a warning.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ShimgenError, ShimgenResult};

/// Suffix of the files that are scanned by default.
pub const DEFAULT_HEADER_SUFFIX: &str = ".h";

/// Directories never descended into.
const EXCLUDED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers every regular file under `root` whose name ends in `suffix`.
///
/// Walk errors on individual entries (permissions, races) are logged and
/// skipped; only an unusable root is an error.
pub fn gather_header_files(root: &Path, suffix: &str) -> ShimgenResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ShimgenError::invalid_request(format!(
            "'{}' is not a directory",
            root.display()
        )));
    }

    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches_suffix = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if matches_suffix {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "gathered header files");
    Ok(files)
}

/// Why a header was left out of the scan.
#[derive(Debug)]
enum SkipReason {
    Unreadable(std::io::Error),
    NotUtf8,
}

impl SkipReason {
    fn warn(&self, path: &Path) {
        match self {
            Self::Unreadable(e) => {
                warn!(path = %path.display(), error = %e, "unable to read header, ignored")
            }
            Self::NotUtf8 => warn!(path = %path.display(), "header is not valid UTF-8 text, ignored"),
        }
    }
}

fn load_header(path: &Path) -> Result<String, SkipReason> {
    let bytes = fs::read(path).map_err(SkipReason::Unreadable)?;
    let text = String::from_utf8(bytes).map_err(|_| SkipReason::NotUtf8)?;
    // CRLF trees are matched as LF, so continuations and line anchors behave the same.
    if text.contains("\r\n") {
        Ok(text.replace("\r\n", "\n"))
    } else {
        Ok(text)
    }
}

/// Reads a header as text with `\r\n` line endings normalised to `\n`, or
/// `None` (after a warning) when it must be skipped.
pub fn read_header(path: &Path) -> Option<String> {
    load_header(path).map_err(|reason| reason.warn(path)).ok()
}

/// The scanned tree: its root and the ordered list of headers beneath it.
#[derive(Debug, Clone)]
pub struct HeaderTree {
    root: PathBuf,
    files: Vec<PathBuf>,
    /// Headers already reported as skipped during this run.
    skipped: RefCell<BTreeSet<PathBuf>>,
}

impl HeaderTree {
    /// Discover the headers under `root`.
    pub fn open(root: impl Into<PathBuf>, suffix: &str) -> ShimgenResult<Self> {
        let root = root.into();
        let files = gather_header_files(&root, suffix)?;
        Ok(Self::from_parts(root, files))
    }

    /// A tree over an already known file list.
    pub fn from_parts(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
            skipped: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Headers in enumeration order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Like [`read_header`], but a skipped file is warned about only the
    /// first time it is read through this tree.
    pub fn read(&self, file: &Path) -> Option<String> {
        match load_header(file) {
            Ok(text) => Some(text),
            Err(reason) => {
                if self.skipped.borrow_mut().insert(file.to_path_buf()) {
                    reason.warn(file);
                } else {
                    debug!(path = %file.display(), "skipping header again");
                }
                None
            }
        }
    }

    /// Headers skipped so far, in path order.
    pub fn skipped(&self) -> Vec<PathBuf> {
        self.skipped.borrow().iter().cloned().collect()
    }

    /// Path of `file` as shown in provenance comments: relative to the
    /// parent of the tree root, with forward slashes.
    pub fn display_path(&self, file: &Path) -> String {
        let rel = match file.strip_prefix(&self.root) {
            Ok(rel) => match self.root.file_name() {
                Some(base) => Path::new(base).join(rel),
                None => rel.to_path_buf(),
            },
            Err(_) => file.to_path_buf(),
        };
        rel.display().to_string().replace('\\', "/")
    }
}
