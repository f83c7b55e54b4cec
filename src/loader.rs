//! Manifest loading
//!
//! Turns a locator into a validated document: read the bytes (filesystem
//! or HTTP with a bounded timeout), parse YAML, then run schema
//! validation. Failure modes stay distinct: an unreadable path or
//! unreachable URL is `NotFound`, malformed YAML is `Parse`, and schema
//! problems surface as `Validation`.
//!
//! The loader does not cache. Load-at-most-once semantics belong to the
//! resolver, which keys documents by canonical locator.

use std::time::Duration;

use tracing::debug;

use crate::error::{PalError, PalResult, Violation};
use crate::locator::Locator;
use crate::models::{ComponentLibrary, DocKind, Manifest, PromptAssembly};
use crate::schema;

/// Timeout applied to each remote fetch unless configured otherwise.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

pub struct Loader {
    fetch_timeout: Duration,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }
}

impl Loader {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self { fetch_timeout }
    }

    /// Load and validate an assembly document.
    pub fn load_assembly(&self, locator: &Locator) -> PalResult<(PromptAssembly, Vec<Violation>)> {
        debug!(locator = %locator, "loading assembly");
        let value = self.load_value(locator)?;
        schema::validate_assembly(&locator.to_string(), &value)
    }

    /// Load and validate a library document.
    pub fn load_library(&self, locator: &Locator) -> PalResult<(ComponentLibrary, Vec<Violation>)> {
        debug!(locator = %locator, "loading library");
        let value = self.load_value(locator)?;
        schema::validate_library(&locator.to_string(), &value)
    }

    /// Load a document of either kind, inferring which from the file name
    /// (`.pal.lib` wins over `.pal`) and falling back to the presence of a
    /// `library_id` key for unconventional names.
    pub fn load_manifest(&self, locator: &Locator) -> PalResult<(Manifest, Vec<Violation>)> {
        let value = self.load_value(locator)?;
        let kind = locator
            .file_name()
            .as_deref()
            .and_then(DocKind::from_name)
            .unwrap_or_else(|| {
                if value.get("library_id").is_some() {
                    DocKind::Library
                } else {
                    DocKind::Assembly
                }
            });
        let name = locator.to_string();
        match kind {
            DocKind::Assembly => {
                let (asm, warnings) = schema::validate_assembly(&name, &value)?;
                Ok((Manifest::Assembly(asm), warnings))
            }
            DocKind::Library => {
                let (lib, warnings) = schema::validate_library(&name, &value)?;
                Ok((Manifest::Library(lib), warnings))
            }
        }
    }

    /// Read and parse a document to a raw YAML value, without validating.
    pub fn load_value(&self, locator: &Locator) -> PalResult<serde_yaml_ng::Value> {
        let text = self.read(locator)?;
        serde_yaml_ng::from_str(&text).map_err(|e| PalError::Parse {
            locator: locator.to_string(),
            message: format_yaml_error(&e),
        })
    }

    fn read(&self, locator: &Locator) -> PalResult<String> {
        match locator {
            Locator::Path(path) => {
                std::fs::read_to_string(path).map_err(|e| PalError::NotFound {
                    locator: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
            Locator::Url(url) => self.fetch(url.as_str()),
        }
    }

    fn fetch(&self, url: &str) -> PalResult<String> {
        debug!(url, timeout_secs = self.fetch_timeout.as_secs(), "fetching");
        let not_found = |reason: String| PalError::NotFound {
            locator: url.to_string(),
            reason,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(self.fetch_timeout)
            .build()
            .map_err(|e| not_found(e.to_string()))?;
        let response = client
            .get(url)
            .send()
            .map_err(|e| not_found(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(not_found(format!("HTTP {status}")));
        }
        response.text().map_err(|e| not_found(e.to_string()))
    }
}

/// YAML errors from serde already carry line/column; add a hint for the
/// most common authoring mistake (an unquoted value containing `: `).
fn format_yaml_error(err: &serde_yaml_ng::Error) -> String {
    let message = err.to_string();
    if message.contains("mapping values are not allowed") {
        format!("{message} (a value containing ': ' must be quoted)")
    } else {
        message
    }
}
