use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ConfigError;

/// The directory every request is confined to.
///
/// Always canonical and absolute, so lexical prefix checks against it are
/// meaningful. Cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct Root(Arc<PathBuf>);

impl Root {
    /// Canonicalize `path` and check that it names an existing directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .map_err(|source| ConfigError::RootUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

        if !canonical.is_dir() {
            return Err(ConfigError::RootNotDirectory(canonical));
        }

        Ok(Self(Arc::new(canonical)))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for Root {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Root").field(&self.0.display()).finish()
    }
}

#[cfg(test)]
impl Root {
    /// Wrap a path without touching the filesystem. Only for resolver tests,
    /// which never access the disk.
    pub(crate) fn unchecked(path: impl Into<PathBuf>) -> Self {
        Self(Arc::new(path.into()))
    }
}
