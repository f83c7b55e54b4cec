//! Locators: where a manifest lives
//!
//! A locator is either a filesystem path or an http(s) URL. Relative
//! imports are resolved against the referencing document (its directory
//! for paths, the URL itself for remote documents), and every locator
//! has a canonical string form used as the identity key in the import
//! graph.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{PalError, PalResult};

/// Path or URL pointing at a `.pal` / `.pal.lib` document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Path(PathBuf),
    Url(Url),
}

fn looks_remote(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

impl Locator {
    /// Parse a raw locator string. Anything that does not start with an
    /// http(s) scheme is a filesystem path.
    pub fn parse(raw: &str) -> PalResult<Locator> {
        if looks_remote(raw) {
            let url = Url::parse(raw).map_err(|e| PalError::NotFound {
                locator: raw.to_string(),
                reason: format!("invalid URL: {e}"),
            })?;
            Ok(Locator::Url(url))
        } else {
            Ok(Locator::Path(PathBuf::from(raw)))
        }
    }

    /// Resolve an import string relative to this document.
    ///
    /// Absolute paths and full URLs are taken as-is. Relative paths join
    /// against this document's directory; relative references in remote
    /// documents join against this document's URL.
    pub fn join(&self, raw: &str) -> PalResult<Locator> {
        if looks_remote(raw) {
            return Locator::parse(raw);
        }
        match self {
            Locator::Path(base) => {
                let path = Path::new(raw);
                if path.is_absolute() {
                    Ok(Locator::Path(path.to_path_buf()))
                } else {
                    let dir = base.parent().unwrap_or_else(|| Path::new("."));
                    Ok(Locator::Path(dir.join(path)))
                }
            }
            Locator::Url(base) => {
                let url = base.join(raw).map_err(|e| PalError::NotFound {
                    locator: raw.to_string(),
                    reason: format!("invalid URL reference: {e}"),
                })?;
                Ok(Locator::Url(url))
            }
        }
    }

    /// Canonical identity string for graph keys: the canonicalized
    /// absolute path, or the normalized URL.
    ///
    /// Fails with `NotFound` when a path locator cannot be canonicalized
    /// (the file does not exist).
    pub fn canonical(&self) -> PalResult<String> {
        match self {
            Locator::Path(path) => {
                let abs = std::fs::canonicalize(path).map_err(|e| PalError::NotFound {
                    locator: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(abs.display().to_string())
            }
            // The url crate normalizes scheme, host case, ports and
            // dot-segments at parse/join time.
            Locator::Url(url) => Ok(url.to_string()),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Locator::Url(_))
    }

    /// Last path segment, used to infer the document kind from its name.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Locator::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            Locator::Url(url) => url
                .path_segments()
                .and_then(|mut s| s.next_back())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Path(path) => write!(f, "{}", path.display()),
            Locator::Url(url) => write!(f, "{url}"),
        }
    }
}
