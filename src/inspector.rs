use std::io;
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, error, warn};

use crate::error::ExploreError;
use crate::resolver::ResolvedPath;
use crate::root::Root;

/// One visible child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    pub is_directory: bool,
    /// Request path that reaches this child
    pub reference: String,
}

/// Raw contents of a served file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent(Bytes);

impl FileContent {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// What a resolved path turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    File(FileContent),
    Directory(Vec<Entry>),
}

/// Looks at a resolved path on disk and serves it.
#[derive(Debug, Clone)]
pub struct EntryInspector {
    root: Root,
}

impl EntryInspector {
    pub fn new(root: Root) -> Self {
        Self { root }
    }

    /// Serve `resolved` as a file or as a directory listing.
    ///
    /// Symlinks are followed, but only as long as their target stays under
    /// the root. Directory entries are sorted by name.
    pub async fn inspect(&self, resolved: &ResolvedPath) -> Result<Inspection, ExploreError> {
        let request = resolved.request_path();
        let path = resolved.fs_path();

        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) if is_missing(&err) => return Err(classify_missing(resolved).await),
            Err(err) => {
                error!("Failed to stat {}: {}", path.display(), err);
                return Err(ExploreError::io(request, err));
            }
        };

        self.ensure_within_root(resolved).await?;

        let file_type = metadata.file_type();
        if file_type.is_file() {
            debug!("Reading file: {}", path.display());
            let content = fs::read(path)
                .await
                .map_err(|err| io_failure(resolved, err))?;
            Ok(Inspection::File(FileContent(Bytes::from(content))))
        } else if file_type.is_dir() {
            debug!("Listing directory: {}", path.display());
            let entries = self.list_children(resolved).await?;
            Ok(Inspection::Directory(entries))
        } else {
            debug!("Unsupported entry type at {}", path.display());
            Err(ExploreError::UnsupportedEntry(request.to_string()))
        }
    }

    /// Reject paths that only exist under the root lexically and reach
    /// outside of it through a symlink.
    async fn ensure_within_root(&self, resolved: &ResolvedPath) -> Result<(), ExploreError> {
        let canonical = match fs::canonicalize(resolved.fs_path()).await {
            Ok(canonical) => canonical,
            Err(err) if is_missing(&err) => return Err(classify_missing(resolved).await),
            Err(err) => return Err(io_failure(resolved, err)),
        };

        if !canonical.starts_with(self.root.path()) {
            warn!(
                "Symlink escape attempt: {:?} resolved to {:?} which is outside {:?}",
                resolved.fs_path(),
                canonical,
                self.root.path()
            );
            return Err(ExploreError::PathTraversal(
                resolved.request_path().to_string(),
            ));
        }

        Ok(())
    }

    async fn list_children(&self, resolved: &ResolvedPath) -> Result<Vec<Entry>, ExploreError> {
        let mut dir = fs::read_dir(resolved.fs_path())
            .await
            .map_err(|err| io_failure(resolved, err))?;

        let mut entries = Vec::new();

        while let Some(child) = dir
            .next_entry()
            .await
            .map_err(|err| io_failure(resolved, err))?
        {
            let name = match child.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!("Skipping non UTF-8 entry name: {:?}", raw);
                    continue;
                }
            };

            if name.starts_with('.') {
                continue;
            }

            let child_path = child.path();
            let is_directory = match child_kind(self.root.path(), &child_path).await {
                Ok(Some(is_directory)) => is_directory,
                Ok(None) => continue,
                Err(err) => return Err(io_failure(resolved, err)),
            };

            entries.push(Entry {
                reference: resolved.child_reference(&name),
                name,
                is_directory,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(entries)
    }
}

/// `Some(true)` for a directory, `Some(false)` for a regular file and
/// `None` for anything that should stay out of a listing, including
/// symlinks whose target lies outside `root`.
async fn child_kind(root: &Path, path: &Path) -> io::Result<Option<bool>> {
    let canonical = match fs::canonicalize(path).await {
        Ok(canonical) => canonical,
        // Dangling symlink, or removed while listing
        Err(err) if is_missing(&err) => return Ok(None),
        Err(err) => return Err(err),
    };

    if !canonical.starts_with(root) {
        debug!("Leaving symlink out of listing: {}", path.display());
        return Ok(None);
    }

    match fs::metadata(&canonical).await {
        Ok(metadata) if metadata.is_dir() => Ok(Some(true)),
        Ok(metadata) if metadata.is_file() => Ok(Some(false)),
        Ok(_) => Ok(None),
        // Dangling symlink, or removed while listing
        Err(err) if is_missing(&err) => Ok(None),
        Err(err) => Err(err),
    }
}

fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// A missing target is either genuinely absent or a symlink pointing
/// nowhere. The latter exists but cannot be served.
async fn classify_missing(resolved: &ResolvedPath) -> ExploreError {
    let request = resolved.request_path().to_string();
    match fs::symlink_metadata(resolved.fs_path()).await {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            debug!("Dangling symlink: {}", resolved.fs_path().display());
            ExploreError::UnsupportedEntry(request)
        }
        _ => {
            debug!("Not found: {}", resolved.fs_path().display());
            ExploreError::NotFound(request)
        }
    }
}

fn io_failure(resolved: &ResolvedPath, err: io::Error) -> ExploreError {
    if is_missing(&err) {
        return ExploreError::NotFound(resolved.request_path().to_string());
    }
    error!("IO error on {}: {}", resolved.fs_path().display(), err);
    ExploreError::io(resolved.request_path(), err)
}
