//! Read-only HTTP explorer for a directory subtree.
//!
//! A request path is resolved against a fixed root directory by
//! [`PathResolver`] and then served by [`EntryInspector`], either as the raw
//! bytes of a file or as a JSON listing of a directory's visible children.
//! The crate can be used as a standalone binary or its router embedded in
//! another application.

pub mod config;
pub mod error;
pub mod handlers;
pub mod inspector;
pub mod resolver;
pub mod root;
pub mod routes;

use std::sync::Arc;

pub use config::{Config, ConfigError};
pub use error::ExploreError;
pub use inspector::{Entry, EntryInspector, FileContent, Inspection};
pub use resolver::{PathResolver, ResolvedPath};
pub use root::Root;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Maps request paths into the root
    pub resolver: PathResolver,
    /// Serves resolved paths
    pub inspector: EntryInspector,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState serving `root` with default config.
    pub fn new(root: Root) -> Self {
        Self::with_config(root, Config::default())
    }

    /// Create a new AppState serving `root` with the given config.
    pub fn with_config(root: Root, config: Config) -> Self {
        Self {
            resolver: PathResolver::new(root.clone()),
            inspector: EntryInspector::new(root),
            config: Arc::new(config),
        }
    }
}
