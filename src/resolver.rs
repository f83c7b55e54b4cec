//! Import resolution
//!
//! Walks an assembly's import graph depth-first, loading each library
//! through the [`Loader`] at most once. Documents are identified by their
//! canonical locator, so `./traits.pal.lib` and an absolute path to the
//! same file are one node. Each node moves through a three-state
//! protocol: unvisited, in-progress, resolved. Meeting an in-progress
//! node again is a cycle, reported with the exact locator path around
//! the loop. Meeting a resolved node is a diamond and costs nothing.
//!
//! Only the root's direct aliases are exposed in the result; a library's
//! own imports are resolved and cycle-checked but not re-exported.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{PalError, PalResult, Violation};
use crate::loader::Loader;
use crate::locator::Locator;
use crate::models::{ComponentLibrary, PromptAssembly};

/// Outcome of a successful resolution pass.
#[derive(Debug)]
pub struct Resolution {
    /// The root's direct aliases, ready for compilation.
    pub imports: BTreeMap<String, ComponentLibrary>,
    /// Unknown-key warnings from every document loaded along the way,
    /// with the locator they came from. Surfaced by `pal lint`.
    pub warnings: Vec<(String, Violation)>,
    /// Number of library documents loaded. A shared dependency counts
    /// once no matter how many paths reach it.
    pub documents_loaded: usize,
}

enum Visit {
    InProgress,
    Resolved,
}

struct Node {
    key: String,
    display: String,
}

pub struct Resolver<'a> {
    loader: &'a Loader,
    state: HashMap<String, Visit>,
    stack: Vec<Node>,
    cache: HashMap<String, ComponentLibrary>,
    warnings: Vec<(String, Violation)>,
    loaded: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(loader: &'a Loader) -> Self {
        Self {
            loader,
            state: HashMap::new(),
            stack: Vec::new(),
            cache: HashMap::new(),
            warnings: Vec::new(),
            loaded: 0,
        }
    }

    /// Resolve every import reachable from `assembly`, rooted at
    /// `root` (the locator the assembly itself was loaded from).
    pub fn resolve(mut self, assembly: &PromptAssembly, root: &Locator) -> PalResult<Resolution> {
        let root_key = root.canonical()?;
        self.state.insert(root_key.clone(), Visit::InProgress);
        self.stack.push(Node {
            key: root_key,
            display: root.to_string(),
        });

        let mut imports = BTreeMap::new();
        for (alias, raw) in &assembly.imports {
            debug!(alias = %alias, locator = %raw, "resolving import");
            let child = root.join(raw).map_err(|e| as_missing_import(alias, e))?;
            let key = self
                .visit(&child)
                .map_err(|e| as_missing_import(alias, e))?;
            if let Some(lib) = self.cache.get(&key) {
                imports.insert(alias.clone(), lib.clone());
            }
        }

        debug!(documents = self.loaded, "resolution complete");
        Ok(Resolution {
            imports,
            warnings: self.warnings,
            documents_loaded: self.loaded,
        })
    }

    fn visit(&mut self, locator: &Locator) -> PalResult<String> {
        let key = locator.canonical()?;
        match self.state.get(&key) {
            Some(Visit::Resolved) => return Ok(key),
            Some(Visit::InProgress) => {
                return Err(self.cycle_at(&key));
            }
            None => {}
        }

        self.state.insert(key.clone(), Visit::InProgress);
        self.stack.push(Node {
            key: key.clone(),
            display: locator.to_string(),
        });

        let result = self.load_and_descend(locator);

        self.stack.pop();
        match result {
            Ok(lib) => {
                self.state.insert(key.clone(), Visit::Resolved);
                self.cache.insert(key.clone(), lib);
                Ok(key)
            }
            Err(e) => Err(e),
        }
    }

    fn load_and_descend(&mut self, locator: &Locator) -> PalResult<ComponentLibrary> {
        let (lib, warnings) = self.loader.load_library(locator)?;
        self.loaded += 1;
        for w in warnings {
            self.warnings.push((locator.to_string(), w));
        }
        for (alias, raw) in &lib.imports {
            debug!(alias = %alias, from = %locator, "resolving nested import");
            let child = match locator.join(raw) {
                Ok(c) => c,
                Err(e) => return Err(self.annotate(e)),
            };
            if let Err(e) = self.visit(&child) {
                return Err(self.annotate(e));
            }
        }
        Ok(lib)
    }

    /// Build the cycle path from the first occurrence of `key` on the
    /// stack back around to it.
    fn cycle_at(&self, key: &str) -> PalError {
        let pos = self.stack.iter().position(|n| n.key == key).unwrap_or(0);
        let mut cycle: Vec<String> = self.stack[pos..].iter().map(|n| n.display.clone()).collect();
        cycle.push(self.stack[pos].display.clone());
        PalError::CircularImport { cycle }
    }

    /// Attach the current import chain to a nested failure, once.
    fn annotate(&self, err: PalError) -> PalError {
        match err {
            e @ (PalError::CircularImport { .. } | PalError::ImportChain { .. }) => e,
            other => PalError::ImportChain {
                chain: self.stack.iter().map(|n| n.display.clone()).collect(),
                source: Box::new(other),
            },
        }
    }
}

/// A direct alias whose target cannot be found is a missing import;
/// anything else (parse, validation, cycles) keeps its own kind.
fn as_missing_import(alias: &str, err: PalError) -> PalError {
    match err {
        PalError::NotFound { locator, reason } => PalError::MissingImport {
            alias: alias.to_string(),
            locator,
            reason,
        },
        other => other,
    }
}
