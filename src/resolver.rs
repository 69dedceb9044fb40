//! Mapping of untrusted request paths onto the root directory.
//!
//! Resolution is pure path arithmetic and never touches the filesystem, so
//! every rule here can be checked without a disk fixture. Symlinks are
//! handled later by the inspector, which is the first place the disk is
//! consulted.
//!
//! Paths are resolved exactly as given: a final segment such as `bar.txt`,
//! `archive.tar.gz` or `v1.2` names that entry verbatim and no extension is
//! ever stripped.

use std::path::{Component, Path, PathBuf};

use tracing::{error, warn};

use crate::error::ExploreError;
use crate::root::Root;

/// Turns request paths into [`ResolvedPath`]s confined to a [`Root`].
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: Root,
}

/// A request path that has been normalized and joined onto the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    request: String,
    segments: Vec<String>,
    fs_path: PathBuf,
}

impl PathResolver {
    pub fn new(root: Root) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Resolve `request_path` against the root.
    ///
    /// `.` segments and redundant slashes are collapsed and `..` pops the
    /// previous segment. A `..` with nothing left to pop is rejected with
    /// [`ExploreError::PathTraversal`] rather than clamped to the root.
    pub fn resolve(&self, request_path: &str) -> Result<ResolvedPath, ExploreError> {
        if request_path.is_empty() {
            return Err(ExploreError::InvalidPath(String::new()));
        }

        if request_path.contains('\0') {
            warn!("Request path contains null byte");
            return Err(ExploreError::InvalidPath(request_path.to_string()));
        }

        let segments = normalize_segments(request_path)?;

        let mut fs_path = self.root.path().to_path_buf();
        for segment in &segments {
            fs_path.push(segment);
        }

        // Segments are single normal components, so this only fails if the
        // normalization above is wrong.
        if !fs_path.starts_with(self.root.path()) {
            error!("Resolved path escaped root for request {:?}", request_path);
            return Err(ExploreError::PathTraversal(request_path.to_string()));
        }

        Ok(ResolvedPath {
            request: request_path.to_string(),
            segments,
            fs_path,
        })
    }
}

fn normalize_segments(request_path: &str) -> Result<Vec<String>, ExploreError> {
    let mut segments: Vec<String> = Vec::new();

    for segment in request_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                if segments.pop().is_none() {
                    warn!("Path traversal attempt: {:?}", request_path);
                    return Err(ExploreError::PathTraversal(request_path.to_string()));
                }
            }
            name => {
                // Anything the platform would read as more than one plain
                // component (a drive prefix, a `\` separator on Windows) is
                // not a valid segment.
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(name.to_string()),
                    _ => {
                        warn!("Malformed path segment {:?} in {:?}", name, request_path);
                        return Err(ExploreError::InvalidPath(request_path.to_string()));
                    }
                }
            }
        }
    }

    Ok(segments)
}

impl ResolvedPath {
    /// The request path as the client sent it
    pub fn request_path(&self) -> &str {
        &self.request
    }

    /// Absolute location on disk, always under the root
    pub fn fs_path(&self) -> &Path {
        &self.fs_path
    }

    /// Whether this is the root directory itself
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Normalized request form, e.g. `/docs/readme.txt` or `/`
    pub fn normalized(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// The request path a client should use to reach the child `name`
    pub fn child_reference(&self, name: &str) -> String {
        if self.segments.is_empty() {
            format!("/{name}")
        } else {
            format!("/{}/{name}", self.segments.join("/"))
        }
    }
}
