//! Maps request targets to files under the served root.
//!
//! Resolution walks a fixed list of candidates and takes the first one that
//! opens as a regular file:
//!
//! 1. the target itself, with one trailing `/` removed
//! 2. the same path with a `/` appended
//! 3. the default index file at the root
//!
//! Whatever candidate is chosen, a path containing `..`, `$` or `^` is never
//! served, even if it opened.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tracing::{debug, warn};

use crate::http::mime;

/// Substrings that make a path unservable.
pub const DISALLOWED: &[&str] = &["..", "$", "^"];

/// One step of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// The target path with a single trailing separator stripped.
    Requested,
    /// The stripped target path with a separator appended again.
    DirectoryStyle,
    /// The default index file at the served root.
    DefaultIndex,
}

/// Resolution order. The first candidate that opens wins.
pub const CANDIDATES: [Candidate; 3] = [
    Candidate::Requested,
    Candidate::DirectoryStyle,
    Candidate::DefaultIndex,
];

impl Candidate {
    /// Root-relative path this candidate tries for `target`.
    pub fn relative_path(self, target: &str, index: &str) -> String {
        match self {
            Candidate::Requested => stripped_target(target),
            Candidate::DirectoryStyle => format!("{}/", stripped_target(target)),
            Candidate::DefaultIndex => format!("/{index}"),
        }
    }
}

/// A file that will be served, already open.
#[derive(Debug)]
pub struct FoundFile {
    /// Full path of the file, root included.
    pub path: PathBuf,
    pub mime: &'static str,
    pub file: File,
}

/// Outcome of resolving a target path.
#[derive(Debug)]
pub enum ResolvedResource {
    Found(FoundFile),
    NotFound,
}

impl ResolvedResource {
    pub fn exists(&self) -> bool {
        matches!(self, ResolvedResource::Found(_))
    }

    pub fn mime(&self) -> Option<&'static str> {
        match self {
            ResolvedResource::Found(found) => Some(found.mime),
            ResolvedResource::NotFound => None,
        }
    }
}

/// Resolves target paths against one served root.
///
/// Holds only read-only settings, so a single instance can be shared by every
/// connection.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: String,
    index: String,
}

impl Resolver {
    pub fn new(root: impl AsRef<Path>, index: impl Into<String>) -> Self {
        let root = root.as_ref().to_string_lossy();
        let trimmed = root.trim_end_matches('/');
        // A root of "/" trims to nothing; keep it meaning the filesystem root.
        let root = if trimmed.is_empty() && root.starts_with('/') {
            String::new()
        } else if trimmed.is_empty() {
            ".".to_string()
        } else {
            trimmed.to_string()
        };

        Self {
            root,
            index: index.into(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Full filesystem path for a root-relative candidate path.
    pub fn full_path(&self, relative: &str) -> String {
        format!("{}{}", self.root, relative)
    }

    /// Resolves `target` to an open file or to not-found.
    ///
    /// Performs at most one open per candidate.
    pub async fn resolve(&self, target: &str) -> ResolvedResource {
        for candidate in CANDIDATES {
            let relative = candidate.relative_path(target, &self.index);
            let full = self.full_path(&relative);

            let Some(file) = open_regular_file(&full).await else {
                debug!(?candidate, path = %full, "Candidate not available");
                continue;
            };

            // Checked on the chosen path, after any fallback.
            if is_disallowed(&relative) {
                warn!(path = %full, "Rejected path");
                return ResolvedResource::NotFound;
            }

            debug!(?candidate, path = %full, "Candidate opened");
            return ResolvedResource::Found(FoundFile {
                mime: mime::content_type(&full),
                path: PathBuf::from(full),
                file,
            });
        }

        ResolvedResource::NotFound
    }
}

/// True if the path contains any of the [`DISALLOWED`] substrings.
pub fn is_disallowed(path: &str) -> bool {
    DISALLOWED.iter().any(|needle| path.contains(needle))
}

/// The target made root-relative, minus one trailing separator.
fn stripped_target(target: &str) -> String {
    let mut path = if target.starts_with('/') {
        target.to_string()
    } else {
        format!("/{target}")
    };

    if path.ends_with('/') {
        path.pop();
    }

    path
}

/// Opens `path` only if it names a regular file.
async fn open_regular_file(path: &str) -> Option<File> {
    let file = File::open(path).await.ok()?;
    let metadata = file.metadata().await.ok()?;

    metadata.is_file().then_some(file)
}
