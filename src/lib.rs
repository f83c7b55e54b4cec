//! PAL - Prompt Assembly Language compiler
//!
//! PAL turns declarative prompt manifests into finished prompt strings.
//! An assembly (`.pal`) declares metadata, typed variables, imports of
//! reusable component libraries (`.pal.lib`), and an ordered composition
//! of template fragments; compiling it loads and validates the whole
//! import graph, checks every reference statically, then renders the
//! fragments and concatenates them verbatim.

pub mod compiler;
pub mod config;
pub mod error;
pub mod lint;
pub mod loader;
pub mod locator;
pub mod models;
pub mod resolver;
pub mod schema;

// Re-exports for convenience
pub use compiler::{analyze_usage, compile, compile_with, JinjaEngine, TemplateEngine};
pub use config::{Config, ConfigWarning};
pub use error::{PalError, PalResult, Violation};
pub use lint::{Finding, LintEngine, LintOptions, LintResult, Severity};
pub use loader::Loader;
pub use locator::Locator;
pub use models::{
    ComponentLibrary, DocKind, LibraryKind, Manifest, PalComponent, PalVariable, PromptAssembly,
};
pub use resolver::{Resolution, Resolver};
