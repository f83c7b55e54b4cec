//! Core data models for PAL
//!
//! Defines the document types the compiler works with:
//! - `PromptAssembly`: a `.pal` manifest (metadata, variables, imports, composition)
//! - `ComponentLibrary`: a `.pal.lib` manifest of reusable components
//! - `Manifest`: either of the above, as loaded from disk or URL
//! - Supporting types: `PalComponent`, `PalVariable`, `LibraryKind`, `DocKind`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only manifest format revision this compiler accepts.
pub const PAL_VERSION: &str = "1.0";

/// Category of a component library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryKind {
    Persona,
    Task,
    Context,
    Rules,
    Examples,
    OutputSchema,
    Reasoning,
    Trait,
    Note,
}

impl LibraryKind {
    /// All accepted `type` values, in schema order. Used for error messages.
    pub const ALL: [&'static str; 9] = [
        "persona",
        "task",
        "context",
        "rules",
        "examples",
        "output_schema",
        "reasoning",
        "trait",
        "note",
    ];
}

impl std::fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LibraryKind::Persona => "persona",
            LibraryKind::Task => "task",
            LibraryKind::Context => "context",
            LibraryKind::Rules => "rules",
            LibraryKind::Examples => "examples",
            LibraryKind::OutputSchema => "output_schema",
            LibraryKind::Reasoning => "reasoning",
            LibraryKind::Trait => "trait",
            LibraryKind::Note => "note",
        };
        write!(f, "{s}")
    }
}

/// A named, reusable piece of prompt text inside a library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalComponent {
    /// Unique within the owning library
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// The text substituted wherever `alias.name` is referenced
    pub content: String,
}

/// A variable declared by an assembly
///
/// `type` is carried for documentation and tooling; binding values are not
/// checked against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalVariable {
    /// Unique within the owning assembly
    pub name: String,

    #[serde(default, rename = "type")]
    pub var_type: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Whether a binding (or default) must be present at compile time
    #[serde(default = "default_required")]
    pub required: bool,

    /// Value used when no binding is supplied
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

fn default_required() -> bool {
    true
}

/// A `.pal` manifest: the root document handed to the compiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptAssembly {
    /// Manifest format revision (must be "1.0")
    pub pal_version: String,

    /// Unique identifier for this assembly
    pub id: String,

    /// MAJOR.MINOR.PATCH
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub author: Option<String>,

    /// alias -> locator (path or URL)
    #[serde(default)]
    pub imports: BTreeMap<String, String>,

    /// Declaration order is preserved
    #[serde(default)]
    pub variables: Vec<PalVariable>,

    /// Ordered template fragments; rendered and concatenated verbatim
    pub composition: Vec<String>,
}

impl PromptAssembly {
    pub fn variable(&self, name: &str) -> Option<&PalVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn has_import(&self, alias: &str) -> bool {
        self.imports.contains_key(alias)
    }
}

/// A `.pal.lib` manifest: a versioned collection of components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLibrary {
    /// Manifest format revision (must be "1.0")
    pub pal_version: String,

    pub library_id: String,

    /// MAJOR.MINOR.PATCH
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type")]
    pub kind: LibraryKind,

    /// Libraries may import further libraries; these are resolved and
    /// cycle-checked but their components are not re-exported.
    #[serde(default)]
    pub imports: BTreeMap<String, String>,

    #[serde(default)]
    pub components: Vec<PalComponent>,
}

impl ComponentLibrary {
    pub fn component(&self, name: &str) -> Option<&PalComponent> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Which document type a locator is expected to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Assembly,
    Library,
}

impl DocKind {
    /// Infer the kind from a file name: `*.pal.lib` is a library,
    /// `*.pal` an assembly.
    pub fn from_name(name: &str) -> Option<DocKind> {
        if name.ends_with(".pal.lib") {
            Some(DocKind::Library)
        } else if name.ends_with(".pal") {
            Some(DocKind::Assembly)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocKind::Assembly => "assembly",
            DocKind::Library => "library",
        }
    }
}

/// A loaded document of either kind
#[derive(Debug, Clone, PartialEq)]
pub enum Manifest {
    Assembly(PromptAssembly),
    Library(ComponentLibrary),
}

impl Manifest {
    pub fn kind(&self) -> DocKind {
        match self {
            Manifest::Assembly(_) => DocKind::Assembly,
            Manifest::Library(_) => DocKind::Library,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Manifest::Assembly(a) => &a.id,
            Manifest::Library(l) => &l.library_id,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            Manifest::Assembly(a) => &a.version,
            Manifest::Library(l) => &l.version,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Manifest::Assembly(a) => &a.description,
            Manifest::Library(l) => &l.description,
        }
    }

    pub fn imports(&self) -> &BTreeMap<String, String> {
        match self {
            Manifest::Assembly(a) => &a.imports,
            Manifest::Library(l) => &l.imports,
        }
    }
}
