//! Lint engine
//!
//! Runs every static check over a file or a directory tree without
//! rendering anything: schema validation, import resolution (cycles,
//! missing imports), reference checks, and authoring warnings (unused
//! variables, unused imports, unknown keys, shadowed aliases).
//!
//! Findings stream through a callback as they are produced so the CLI
//! can print progressively, and are collected into a [`LintResult`]
//! with pass/warning/error tallies.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::compiler::{analyze_usage, JinjaEngine};
use crate::error::{PalError, PalResult, Violation};
use crate::loader::Loader;
use crate::locator::Locator;
use crate::models::Manifest;
use crate::resolver::Resolver;

/// Options for a lint run
#[derive(Debug, Clone, Copy, Default)]
pub struct LintOptions {
    /// Treat warnings as failures
    pub strict_warnings: bool,
}

/// Severity of a single finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Pass,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Pass => "pass",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One lint finding
#[derive(Debug, Clone)]
pub struct Finding {
    /// File (or locator) the finding is about
    pub file: String,
    /// Name of the check that produced it
    pub name: String,
    pub severity: Severity,
    pub message: String,
}

/// Aggregate result of a lint run
#[derive(Debug, Clone, Default)]
pub struct LintResult {
    pub findings: Vec<Finding>,
    /// Number of files checked
    pub files: usize,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl LintResult {
    /// No error-level findings
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// No error- or warning-level findings
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    pub fn passes(&self, options: LintOptions) -> bool {
        if options.strict_warnings {
            self.is_clean()
        } else {
            self.is_success()
        }
    }
}

pub struct LintEngine<'a> {
    loader: &'a Loader,
    engine: JinjaEngine,
}

impl<'a> LintEngine<'a> {
    pub fn new(loader: &'a Loader) -> Self {
        Self {
            loader,
            engine: JinjaEngine::default(),
        }
    }

    /// Lint a `.pal`/`.pal.lib` file, or every such file under a
    /// directory.
    pub fn execute(&self, path: &Path) -> PalResult<LintResult> {
        self.execute_with_callback(path, |_| {})
    }

    /// Execute with a callback invoked for each finding as it is found.
    pub fn execute_with_callback<F>(&self, path: &Path, mut on_finding: F) -> PalResult<LintResult>
    where
        F: FnMut(&Finding),
    {
        let files = collect_targets(path)?;
        debug!(count = files.len(), "linting");

        let mut result = LintResult {
            files: files.len(),
            ..LintResult::default()
        };
        // (file, check, message) triples already reported; the same
        // unknown-key warning can surface both through resolution and
        // when the library file itself is linted
        let mut seen = BTreeSet::new();
        // files with at least one warning or error
        let mut dirty = BTreeSet::new();

        for file in &files {
            let display = file.display().to_string();
            self.lint_file(file, &mut result, &mut seen, &mut dirty, &mut on_finding);
            if !dirty.contains(&file_identity(&display)) {
                push(
                    &mut result,
                    &mut seen,
                    &mut dirty,
                    &mut on_finding,
                    Finding {
                        file: display,
                        name: "ok".to_string(),
                        severity: Severity::Pass,
                        message: "no issues".to_string(),
                    },
                );
            }
        }

        Ok(result)
    }

    fn lint_file<F>(
        &self,
        file: &Path,
        result: &mut LintResult,
        seen: &mut BTreeSet<(String, String, String)>,
        dirty: &mut BTreeSet<String>,
        on_finding: &mut F,
    ) where
        F: FnMut(&Finding),
    {
        let display = file.display().to_string();
        let locator = Locator::Path(file.to_path_buf());

        let (manifest, warnings) = match self.loader.load_manifest(&locator) {
            Ok(loaded) => loaded,
            Err(PalError::Validation { violations, .. }) => {
                for v in violations {
                    push(
                        result,
                        seen,
                        dirty,
                        on_finding,
                        Finding {
                            file: display.clone(),
                            name: "schema".to_string(),
                            severity: Severity::Error,
                            message: v.to_string(),
                        },
                    );
                }
                return;
            }
            Err(err) => {
                push(
                    result,
                    seen,
                    dirty,
                    on_finding,
                    Finding {
                        file: display.clone(),
                        name: "parse".to_string(),
                        severity: Severity::Error,
                        message: err.to_string(),
                    },
                );
                return;
            }
        };

        for w in &warnings {
            push(
                result,
                seen,
                dirty,
                on_finding,
                Finding {
                    file: display.clone(),
                    name: "unknown-key".to_string(),
                    severity: Severity::Warning,
                    message: unknown_key_message(w),
                },
            );
        }

        let Manifest::Assembly(assembly) = manifest else {
            return;
        };

        let resolution = match Resolver::new(self.loader).resolve(&assembly, &locator) {
            Ok(resolution) => resolution,
            Err(err) => {
                push(
                    result,
                    seen,
                    dirty,
                    on_finding,
                    Finding {
                        file: display.clone(),
                        name: "imports".to_string(),
                        severity: Severity::Error,
                        message: err.to_string(),
                    },
                );
                return;
            }
        };

        for (locator, w) in &resolution.warnings {
            push(
                result,
                seen,
                dirty,
                on_finding,
                Finding {
                    file: locator.clone(),
                    name: "unknown-key".to_string(),
                    severity: Severity::Warning,
                    message: unknown_key_message(w),
                },
            );
        }

        let report = analyze_usage(&self.engine, &assembly, &resolution.imports);
        for err in &report.errors {
            push(
                result,
                seen,
                dirty,
                on_finding,
                Finding {
                    file: display.clone(),
                    name: "usage".to_string(),
                    severity: Severity::Error,
                    message: err.to_string(),
                },
            );
        }

        for variable in &assembly.variables {
            if !report.referenced.contains(&variable.name) {
                push(
                    result,
                    seen,
                    dirty,
                    on_finding,
                    Finding {
                        file: display.clone(),
                        name: "unused-variable".to_string(),
                        severity: Severity::Warning,
                        message: format!(
                            "variable '{}' is declared but never referenced",
                            variable.name
                        ),
                    },
                );
            }
            if assembly.has_import(&variable.name) {
                push(
                    result,
                    seen,
                    dirty,
                    on_finding,
                    Finding {
                        file: display.clone(),
                        name: "shadowed-import".to_string(),
                        severity: Severity::Warning,
                        message: format!(
                            "variable '{}' shadows the import alias of the same name",
                            variable.name
                        ),
                    },
                );
            }
        }

        for alias in assembly.imports.keys() {
            if !report.referenced.contains(alias) {
                push(
                    result,
                    seen,
                    dirty,
                    on_finding,
                    Finding {
                        file: display.clone(),
                        name: "unused-import".to_string(),
                        severity: Severity::Warning,
                        message: format!("import '{alias}' is never referenced"),
                    },
                );
            }
        }
    }
}

fn unknown_key_message(v: &Violation) -> String {
    format!("unknown key '{}'", v.path)
}

/// Dedup identity for a finding's file. Resolution reports a library
/// under the joined locator spelling (`dir/./lib.pal.lib`) while the
/// walker reports `dir/lib.pal.lib`; canonicalizing makes them one.
fn file_identity(file: &str) -> String {
    std::fs::canonicalize(file)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| file.to_string())
}

fn push<F>(
    result: &mut LintResult,
    seen: &mut BTreeSet<(String, String, String)>,
    dirty: &mut BTreeSet<String>,
    on_finding: &mut F,
    finding: Finding,
) where
    F: FnMut(&Finding),
{
    let identity = file_identity(&finding.file);
    let key = (
        identity.clone(),
        finding.name.clone(),
        finding.message.clone(),
    );
    if !seen.insert(key) {
        return;
    }
    match finding.severity {
        Severity::Pass => result.passed += 1,
        Severity::Warning => {
            result.warnings += 1;
            dirty.insert(identity);
        }
        Severity::Error => {
            result.errors += 1;
            dirty.insert(identity);
        }
    }
    on_finding(&finding);
    result.findings.push(finding);
}

/// A single file, or every `.pal`/`.pal.lib` under a directory
/// (hidden directories skipped), sorted for deterministic output.
fn collect_targets(path: &Path) -> PalResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(PalError::NotFound {
            locator: path.display().to_string(),
            reason: "no such file or directory".to_string(),
        });
    }
    let mut files = Vec::new();
    collect_recursive(path, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> PalResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false);
            if !hidden {
                collect_recursive(&path, files)?;
            }
        } else if is_pal_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_pal_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(".pal") || n.ends_with(".pal.lib"))
        .unwrap_or(false)
}
