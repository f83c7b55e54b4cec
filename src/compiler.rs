//! Compilation: usage checks, context building, rendering
//!
//! The compiler never discovers problems mid-render. Every fragment is
//! statically scanned first: referenced variables must be declared and
//! `alias.component` references must point at a real component. Only
//! then are bindings checked and the fragments rendered, in document
//! order, into one string with no separator between them.
//!
//! Rendering goes through the [`TemplateEngine`] seam. The default
//! engine is minijinja with strict undefined behavior, so anything the
//! static scan cannot see (deep attribute access on a string, a missing
//! key inside a bound object) still fails instead of rendering empty.

use std::collections::{BTreeMap, BTreeSet};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::debug;

use crate::error::{PalError, PalResult};
use crate::models::{ComponentLibrary, PromptAssembly};

/// Pluggable rendering backend.
///
/// `references` reports the distinct dotted paths a fragment reads;
/// `render` evaluates a fragment against the merged context.
pub trait TemplateEngine {
    fn references(&self, source: &str) -> Result<Vec<String>, String>;
    fn render(&self, source: &str, context: &serde_json::Value) -> Result<String, String>;
}

/// Default engine backed by minijinja.
pub struct JinjaEngine {
    env: Environment<'static>,
}

impl Default for JinjaEngine {
    fn default() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // prompt text is plain text, never HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        // fragments render verbatim; the jinja default eats one
        // trailing newline per template
        env.set_keep_trailing_newline(true);
        Self { env }
    }
}

impl TemplateEngine for JinjaEngine {
    fn references(&self, source: &str) -> Result<Vec<String>, String> {
        let template = self
            .env
            .template_from_str(source)
            .map_err(|e| e.to_string())?;
        let mut refs: Vec<String> = template
            .undeclared_variables(true)
            .into_iter()
            .filter(|r| {
                let head = r.split('.').next().unwrap_or("");
                // engine builtins, not document references
                head != "loop" && head != "super"
            })
            .collect();
        refs.sort();
        Ok(refs)
    }

    fn render(&self, source: &str, context: &serde_json::Value) -> Result<String, String> {
        let template = self
            .env
            .template_from_str(source)
            .map_err(|e| e.to_string())?;
        template
            .render(minijinja::Value::from_serialize(context))
            .map_err(|e| e.to_string())
    }
}

/// What the static scan found across all fragments.
pub struct UsageReport {
    /// Undefined references and unparsable fragments, in fragment order
    /// (alphabetical within a fragment).
    pub errors: Vec<PalError>,
    /// Every reference head seen, defined or not. Lint uses this for
    /// unused-variable and unused-import warnings.
    pub referenced: BTreeSet<String>,
}

/// Scan every fragment and check each reference against the declared
/// variables and resolved imports. Collects all problems; callers that
/// fail fast take the first.
pub fn analyze_usage(
    engine: &dyn TemplateEngine,
    assembly: &PromptAssembly,
    imports: &BTreeMap<String, ComponentLibrary>,
) -> UsageReport {
    let mut errors = Vec::new();
    let mut referenced = BTreeSet::new();

    for (i, fragment) in assembly.composition.iter().enumerate() {
        let refs = match engine.references(fragment) {
            Ok(refs) => refs,
            Err(message) => {
                errors.push(PalError::Render {
                    fragment: i,
                    message,
                });
                continue;
            }
        };
        for reference in refs {
            let mut parts = reference.splitn(3, '.');
            let head = parts.next().unwrap_or("").to_string();
            let component = parts.next();
            referenced.insert(head.clone());

            // a declared variable wins over an alias of the same name;
            // nested access into a bound value is checked at render time
            if assembly.variable(&head).is_some() {
                continue;
            }
            match component {
                None => {
                    if !imports.contains_key(&head) {
                        errors.push(PalError::UndefinedVariable {
                            fragment: i,
                            name: head,
                        });
                    }
                }
                Some(component) => match imports.get(&head) {
                    Some(lib) if lib.component(component).is_some() => {}
                    _ => errors.push(PalError::UndefinedComponent {
                        fragment: i,
                        alias: head,
                        component: component.to_string(),
                    }),
                },
            }
        }
    }

    UsageReport { errors, referenced }
}

/// Compile with the default minijinja engine.
pub fn compile(
    assembly: &PromptAssembly,
    imports: &BTreeMap<String, ComponentLibrary>,
    bindings: &serde_json::Map<String, serde_json::Value>,
) -> PalResult<String> {
    compile_with(&JinjaEngine::default(), assembly, imports, bindings)
}

/// Check usage, verify bindings, render each fragment in order and
/// concatenate the results verbatim.
pub fn compile_with(
    engine: &dyn TemplateEngine,
    assembly: &PromptAssembly,
    imports: &BTreeMap<String, ComponentLibrary>,
    bindings: &serde_json::Map<String, serde_json::Value>,
) -> PalResult<String> {
    let report = analyze_usage(engine, assembly, imports);
    if let Some(err) = report.errors.into_iter().next() {
        return Err(err);
    }

    let context = build_context(assembly, imports, bindings, &report.referenced)?;

    let mut output = String::new();
    for (i, fragment) in assembly.composition.iter().enumerate() {
        debug!(fragment = i, "rendering");
        let rendered = engine
            .render(fragment, &context)
            .map_err(|message| PalError::Render {
                fragment: i,
                message,
            })?;
        output.push_str(&rendered);
    }
    Ok(output)
}

/// Merge the two namespaces into one render context: each alias becomes
/// an object of component name to content, then declared variables are
/// bound on top (a variable shadows an alias of the same name).
fn build_context(
    assembly: &PromptAssembly,
    imports: &BTreeMap<String, ComponentLibrary>,
    bindings: &serde_json::Map<String, serde_json::Value>,
    referenced: &BTreeSet<String>,
) -> PalResult<serde_json::Value> {
    let mut context = serde_json::Map::new();

    for (alias, lib) in imports {
        let mut components = serde_json::Map::new();
        for component in &lib.components {
            components.insert(
                component.name.clone(),
                serde_json::Value::String(component.content.clone()),
            );
        }
        context.insert(alias.clone(), serde_json::Value::Object(components));
    }

    for variable in &assembly.variables {
        if let Some(value) = bindings.get(&variable.name) {
            context.insert(variable.name.clone(), value.clone());
        } else if let Some(default) = &variable.default {
            context.insert(variable.name.clone(), default.clone());
        } else if variable.required || referenced.contains(&variable.name) {
            return Err(PalError::MissingVariableBinding {
                name: variable.name.clone(),
            });
        }
    }

    for name in bindings.keys() {
        if assembly.variable(name).is_none() {
            debug!(variable = %name, "ignoring binding for undeclared variable");
        }
    }

    Ok(serde_json::Value::Object(context))
}
