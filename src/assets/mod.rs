//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → resolve.rs (lexical join under the served root, then containment)
//!     → open file + metadata
//!     → content_type.rs (extension lookup)
//!     → Asset (open file handle, length, content type)
//! ```

pub mod content_type;
pub mod resolve;

use std::io;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use thiserror::Error;
use tokio::fs::File;

use crate::config::StaticFilesConfig;

pub use content_type::{ContentTypeTable, FALLBACK_CONTENT_TYPE};
pub use resolve::ServedRoot;

/// Failure to produce an asset for a request path.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Nothing at the resolved path.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The request path resolves outside the served root.
    #[error("path escapes the served root: {0}")]
    OutsideRoot(String),

    /// Anything else: permissions, directories, read errors.
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl AssetError {
    pub(crate) fn from_io(request_path: &str, path: &Path, error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::NotFound {
            AssetError::NotFound(request_path.to_string())
        } else {
            AssetError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

/// An opened file ready to be streamed.
#[derive(Debug)]
pub struct Asset {
    pub file: File,
    pub len: u64,
    pub content_type: HeaderValue,
}

/// Served root plus content-type table.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: ServedRoot,
    content_types: ContentTypeTable,
}

impl AssetStore {
    pub fn new(root: ServedRoot, content_types: ContentTypeTable) -> Self {
        Self {
            root,
            content_types,
        }
    }

    pub fn from_config(config: &StaticFilesConfig) -> io::Result<Self> {
        let root = ServedRoot::new(&config.root, config.index_file.clone())?;
        tracing::debug!(root = %root.path().display(), "Served root resolved");
        Ok(Self::new(root, ContentTypeTable::new(&config.content_types)))
    }

    /// Resolve and open the file for `request_path`.
    pub async fn open(&self, request_path: &str) -> Result<Asset, AssetError> {
        let lexical = self.root.lexical_path(request_path)?;
        let resolved = self.root.contain(request_path, &lexical).await?;

        let file = File::open(&resolved)
            .await
            .map_err(|e| AssetError::from_io(request_path, &resolved, e))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| AssetError::from_io(request_path, &resolved, e))?;

        if metadata.is_dir() {
            return Err(AssetError::Io {
                path: resolved,
                source: io::Error::other("is a directory"),
            });
        }
        // Lexical resolution drops a trailing slash; a file is not a directory.
        if request_path != "/" && request_path.ends_with('/') {
            return Err(AssetError::Io {
                path: resolved,
                source: io::Error::other("not a directory"),
            });
        }

        Ok(Asset {
            file,
            len: metadata.len(),
            // The requested name decides the type, not a symlink target.
            content_type: self.content_types.for_path(&lexical).clone(),
        })
    }
}
