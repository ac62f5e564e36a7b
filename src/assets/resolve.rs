//! Served root and request path resolution.
//!
//! # Design Decisions
//! - Lexical normalisation first: `.` is skipped, `..` pops a component and
//!   may never climb above the root
//! - The normalised path is then canonicalised so symlinks pointing outside
//!   the root are caught too
//! - Only an exact `/` maps to the index document

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::assets::AssetError;

/// Directory assets are served from, canonical and fixed at startup.
#[derive(Debug, Clone)]
pub struct ServedRoot {
    root: PathBuf,
    index_file: String,
}

impl ServedRoot {
    /// Canonicalise `root`. Fails if it does not exist.
    pub fn new(root: &Path, index_file: impl Into<String>) -> io::Result<Self> {
        Ok(Self {
            root: root.canonicalize()?,
            index_file: index_file.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Join the request path under the root without touching the filesystem.
    pub fn lexical_path(&self, request_path: &str) -> Result<PathBuf, AssetError> {
        let relative = if request_path == "/" {
            self.index_file.as_str()
        } else {
            request_path.trim_start_matches('/')
        };

        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(AssetError::OutsideRoot(request_path.to_string()));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(AssetError::OutsideRoot(request_path.to_string()));
                }
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(parts);
        Ok(resolved)
    }

    /// Canonicalise `candidate` and check it is still under the root.
    pub async fn contain(&self, request_path: &str, candidate: &Path) -> Result<PathBuf, AssetError> {
        let canonical = tokio::fs::canonicalize(candidate)
            .await
            .map_err(|e| AssetError::from_io(request_path, candidate, e))?;

        if !canonical.starts_with(&self.root) {
            return Err(AssetError::OutsideRoot(request_path.to_string()));
        }
        Ok(canonical)
    }
}
