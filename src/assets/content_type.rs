//! Content-Type table.
//!
//! Maps a literal file extension (leading dot included, case-sensitive) to a
//! MIME type, with `application/octet-stream` for everything else.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use axum::http::HeaderValue;

/// Served when the extension is not in the table.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

const BUILT_IN: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".js", "text/javascript"),
    (".css", "text/css"),
    (".json", "application/json"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".gif", "image/gif"),
    (".svg", "image/svg+xml"),
    (".ico", "image/x-icon"),
];

/// Immutable extension → Content-Type mapping.
#[derive(Debug, Clone)]
pub struct ContentTypeTable {
    entries: HashMap<String, HeaderValue>,
    fallback: HeaderValue,
}

impl Default for ContentTypeTable {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

impl ContentTypeTable {
    /// Built-in entries with `extra` layered on top.
    pub fn new(extra: &BTreeMap<String, String>) -> Self {
        let mut entries: HashMap<String, HeaderValue> = BUILT_IN
            .iter()
            .map(|(ext, mime)| (ext.to_string(), HeaderValue::from_static(mime)))
            .collect();

        for (ext, mime) in extra {
            match HeaderValue::from_str(mime) {
                Ok(value) => {
                    entries.insert(ext.clone(), value);
                }
                Err(_) => {
                    tracing::warn!(extension = %ext, mime = %mime, "Ignoring invalid content type");
                }
            }
        }

        Self {
            entries,
            fallback: HeaderValue::from_static(FALLBACK_CONTENT_TYPE),
        }
    }

    /// Look up an extension such as `.json`.
    pub fn lookup(&self, extension: &str) -> &HeaderValue {
        self.entries.get(extension).unwrap_or(&self.fallback)
    }

    /// Content type for the final component of `path`.
    pub fn for_path(&self, path: &Path) -> &HeaderValue {
        match path.file_name().and_then(|name| name.to_str()).and_then(extension_of) {
            Some(extension) => self.lookup(extension),
            None => &self.fallback,
        }
    }
}

/// Extension of a file name including the dot: `app.min.js` → `.js`.
///
/// Dotfiles without a second dot (`.env`) have no extension.
pub fn extension_of(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(index) => Some(&file_name[index..]),
    }
}
