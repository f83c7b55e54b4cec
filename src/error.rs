//! Error types for PAL
//!
//! Uses `thiserror` for library errors. Every failure mode of the
//! load/validate/resolve/compile pipeline has its own variant so the CLI
//! can report the offending locator, field path, alias, or cycle exactly.

use thiserror::Error;

/// Result type alias for PAL operations
pub type PalResult<T> = Result<T, PalError>;

/// A single schema violation: a stable dotted field path plus a message.
///
/// Paths follow the document structure, e.g. `imports.traits`,
/// `components[2].name`, `pal_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Main error type for PAL operations
#[derive(Error, Debug)]
pub enum PalError {
    /// Document is not well-formed YAML
    #[error("parse error in {locator}: {message}")]
    Parse { locator: String, message: String },

    /// Document is well-formed but violates the schema.
    ///
    /// Carries every violation found, not just the first.
    #[error("validation failed for {locator} ({} violation{})", .violations.len(), if .violations.len() == 1 { "" } else { "s" })]
    Validation {
        locator: String,
        violations: Vec<Violation>,
    },

    /// Locator does not point at a readable document
    #[error("not found: {locator} ({reason})")]
    NotFound { locator: String, reason: String },

    /// Import graph contains a cycle; `cycle` is the full locator path
    /// from the first repeated node back to itself
    #[error("circular import detected: {}", .cycle.join(" -> "))]
    CircularImport { cycle: Vec<String> },

    /// A directly imported alias could not be loaded
    #[error("import '{alias}' could not be loaded from {locator}: {reason}")]
    MissingImport {
        alias: String,
        locator: String,
        reason: String,
    },

    /// Composition references a variable the assembly never declares
    #[error("composition[{fragment}] references undefined variable '{name}'")]
    UndefinedVariable { fragment: usize, name: String },

    /// Composition references an alias or component that does not exist
    #[error("composition[{fragment}] references undefined component '{alias}.{component}'")]
    UndefinedComponent {
        fragment: usize,
        alias: String,
        component: String,
    },

    /// A required variable was declared but no binding was supplied
    #[error("missing binding for required variable '{name}'")]
    MissingVariableBinding { name: String },

    /// Template engine failure while rendering a fragment
    #[error("render error in composition[{fragment}]: {message}")]
    Render { fragment: usize, message: String },

    /// Supplied bindings were not a JSON object
    #[error("invalid variable bindings: {message}")]
    InvalidBindings { message: String },

    /// A nested failure, annotated with the import chain that reached it
    #[error("in import chain {}: {source}", .chain.join(" -> "))]
    ImportChain {
        chain: Vec<String>,
        #[source]
        source: Box<PalError>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PalError {
    /// Stable machine-readable kind, used by the `--json` event stream.
    pub fn kind(&self) -> &'static str {
        match self {
            PalError::Parse { .. } => "parse",
            PalError::Validation { .. } => "validation",
            PalError::NotFound { .. } => "not_found",
            PalError::CircularImport { .. } => "circular_import",
            PalError::MissingImport { .. } => "missing_import",
            PalError::UndefinedVariable { .. } => "undefined_variable",
            PalError::UndefinedComponent { .. } => "undefined_component",
            PalError::MissingVariableBinding { .. } => "missing_variable_binding",
            PalError::Render { .. } => "render",
            PalError::InvalidBindings { .. } => "invalid_bindings",
            PalError::ImportChain { source, .. } => source.kind(),
            PalError::Io(_) => "io",
        }
    }

    /// Unwraps import-chain annotations down to the underlying error.
    pub fn root_cause(&self) -> &PalError {
        match self {
            PalError::ImportChain { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
