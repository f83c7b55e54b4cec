//! Schema validation for PAL manifests
//!
//! Validates a raw YAML document against the assembly or library schema
//! BEFORE typed deserialization, so that every violation is collected and
//! reported in one pass instead of failing on the first bad field. Paths
//! in violations follow the document structure (`imports.traits`,
//! `variables[1].name`, `composition[2]`).
//!
//! Unknown keys anywhere in the document are not errors; they are
//! collected as warnings via `serde_ignored` and surfaced by `pal lint`.

use serde_yaml_ng::Value;

use crate::error::{PalError, PalResult, Violation};
use crate::models::{ComponentLibrary, LibraryKind, PromptAssembly, PAL_VERSION};

/// Validate and deserialize an assembly document.
///
/// Returns the typed assembly plus unknown-key warnings, or a single
/// `Validation` error carrying every violation found.
pub fn validate_assembly(
    locator: &str,
    value: &Value,
) -> PalResult<(PromptAssembly, Vec<Violation>)> {
    let mut violations = Vec::new();

    let Some(_) = value.as_mapping() else {
        return Err(single(locator, "", "document must be a YAML mapping"));
    };

    check_pal_version(value, &mut violations);
    check_required_string(value, "id", false, &mut violations);
    check_version(value, &mut violations);
    check_required_string(value, "description", true, &mut violations);
    check_optional_string(value, "author", &mut violations);
    check_imports(value, &mut violations);
    check_variables(value, &mut violations);
    check_composition(value, &mut violations);

    if !violations.is_empty() {
        return Err(PalError::Validation {
            locator: locator.to_string(),
            violations,
        });
    }

    deserialize_with_warnings(locator, value)
}

/// Validate and deserialize a library document. Same contract as
/// [`validate_assembly`].
pub fn validate_library(
    locator: &str,
    value: &Value,
) -> PalResult<(ComponentLibrary, Vec<Violation>)> {
    let mut violations = Vec::new();

    let Some(_) = value.as_mapping() else {
        return Err(single(locator, "", "document must be a YAML mapping"));
    };

    check_pal_version(value, &mut violations);
    check_required_string(value, "library_id", false, &mut violations);
    check_version(value, &mut violations);
    check_required_string(value, "description", true, &mut violations);
    check_library_kind(value, &mut violations);
    check_imports(value, &mut violations);
    check_components(value, &mut violations);

    if !violations.is_empty() {
        return Err(PalError::Validation {
            locator: locator.to_string(),
            violations,
        });
    }

    deserialize_with_warnings(locator, value)
}

/// True when `s` is `MAJOR.MINOR.PATCH` with all-numeric parts.
pub fn is_semver(s: &str) -> bool {
    let mut parts = 0;
    for part in s.split('.') {
        parts += 1;
        if parts > 3 || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    parts == 3
}

fn single(locator: &str, path: &str, message: &str) -> PalError {
    PalError::Validation {
        locator: locator.to_string(),
        violations: vec![Violation::new(path, message)],
    }
}

fn check_pal_version(value: &Value, out: &mut Vec<Violation>) {
    match value.get("pal_version") {
        None => out.push(Violation::new(
            "pal_version",
            format!("missing required field (expected \"{PAL_VERSION}\")"),
        )),
        Some(v) => match v.as_str() {
            Some(s) if s == PAL_VERSION => {}
            Some(s) => out.push(Violation::new(
                "pal_version",
                format!("unsupported pal_version '{s}', expected \"{PAL_VERSION}\""),
            )),
            // an unquoted `pal_version: 1.0` parses as a float
            None => out.push(Violation::new(
                "pal_version",
                format!("must be the string \"{PAL_VERSION}\" (quote the value)"),
            )),
        },
    }
}

fn check_version(value: &Value, out: &mut Vec<Violation>) {
    match value.get("version") {
        None => out.push(Violation::new("version", "missing required field")),
        Some(v) => match v.as_str() {
            Some(s) if is_semver(s) => {}
            Some(s) => out.push(Violation::new(
                "version",
                format!("'{s}' must match MAJOR.MINOR.PATCH (e.g. 1.0.0)"),
            )),
            None => out.push(Violation::new(
                "version",
                "must be a string matching MAJOR.MINOR.PATCH (quote the value)",
            )),
        },
    }
}

fn check_required_string(value: &Value, field: &str, allow_empty: bool, out: &mut Vec<Violation>) {
    match value.get(field) {
        None => out.push(Violation::new(field, "missing required field")),
        Some(v) => match v.as_str() {
            Some(s) if !allow_empty && s.is_empty() => {
                out.push(Violation::new(field, "must not be empty"))
            }
            Some(_) => {}
            None => out.push(Violation::new(field, "must be a string")),
        },
    }
}

fn check_optional_string(value: &Value, field: &str, out: &mut Vec<Violation>) {
    if let Some(v) = value.get(field) {
        if !v.is_string() {
            out.push(Violation::new(field, "must be a string"));
        }
    }
}

fn check_imports(value: &Value, out: &mut Vec<Violation>) {
    let Some(imports) = value.get("imports") else {
        return;
    };
    let Some(map) = imports.as_mapping() else {
        out.push(Violation::new(
            "imports",
            "must be a mapping of alias to locator",
        ));
        return;
    };
    for (alias, locator) in map {
        let Some(alias) = alias.as_str() else {
            out.push(Violation::new("imports", "alias keys must be strings"));
            continue;
        };
        if alias.is_empty() {
            out.push(Violation::new("imports", "alias must not be empty"));
            continue;
        }
        match locator.as_str() {
            Some("") => out.push(Violation::new(
                format!("imports.{alias}"),
                "locator must not be empty",
            )),
            Some(_) => {}
            None => out.push(Violation::new(
                format!("imports.{alias}"),
                "locator must be a string path or URL",
            )),
        }
    }
}

fn check_variables(value: &Value, out: &mut Vec<Violation>) {
    let Some(variables) = value.get("variables") else {
        return;
    };
    let Some(seq) = variables.as_sequence() else {
        out.push(Violation::new("variables", "must be a sequence"));
        return;
    };
    let mut seen = Vec::new();
    for (i, item) in seq.iter().enumerate() {
        let path = format!("variables[{i}]");
        if item.as_mapping().is_none() {
            out.push(Violation::new(path, "must be a mapping"));
            continue;
        }
        match item.get("name").and_then(Value::as_str) {
            None => out.push(Violation::new(
                format!("{path}.name"),
                "missing required field",
            )),
            Some("") => out.push(Violation::new(
                format!("{path}.name"),
                "must not be empty",
            )),
            Some(name) => {
                if seen.contains(&name) {
                    out.push(Violation::new(
                        format!("{path}.name"),
                        format!("duplicate variable name '{name}'"),
                    ));
                } else {
                    seen.push(name);
                }
            }
        }
        for field in ["type", "description"] {
            if let Some(v) = item.get(field) {
                if !v.is_string() {
                    out.push(Violation::new(
                        format!("{path}.{field}"),
                        "must be a string",
                    ));
                }
            }
        }
        if let Some(v) = item.get("required") {
            if v.as_bool().is_none() {
                out.push(Violation::new(
                    format!("{path}.required"),
                    "must be a boolean",
                ));
            }
        }
    }
}

fn check_composition(value: &Value, out: &mut Vec<Violation>) {
    match value.get("composition") {
        None => out.push(Violation::new("composition", "missing required field")),
        Some(v) => match v.as_sequence() {
            None => out.push(Violation::new("composition", "must be a sequence")),
            Some(seq) if seq.is_empty() => out.push(Violation::new(
                "composition",
                "must contain at least one fragment",
            )),
            Some(seq) => {
                for (i, item) in seq.iter().enumerate() {
                    if !item.is_string() {
                        out.push(Violation::new(
                            format!("composition[{i}]"),
                            "fragment must be a string",
                        ));
                    }
                }
            }
        },
    }
}

fn check_library_kind(value: &Value, out: &mut Vec<Violation>) {
    match value.get("type") {
        None => out.push(Violation::new("type", "missing required field")),
        Some(v) => match v.as_str() {
            Some(s) if LibraryKind::ALL.contains(&s) => {}
            Some(s) => out.push(Violation::new(
                "type",
                format!(
                    "unknown type '{s}', expected one of: {}",
                    LibraryKind::ALL.join(", ")
                ),
            )),
            None => out.push(Violation::new("type", "must be a string")),
        },
    }
}

fn check_components(value: &Value, out: &mut Vec<Violation>) {
    let Some(components) = value.get("components") else {
        return;
    };
    let Some(seq) = components.as_sequence() else {
        out.push(Violation::new("components", "must be a sequence"));
        return;
    };
    let mut seen = Vec::new();
    for (i, item) in seq.iter().enumerate() {
        let path = format!("components[{i}]");
        if item.as_mapping().is_none() {
            out.push(Violation::new(path, "must be a mapping"));
            continue;
        }
        match item.get("name").and_then(Value::as_str) {
            None => out.push(Violation::new(
                format!("{path}.name"),
                "missing required field",
            )),
            Some("") => out.push(Violation::new(
                format!("{path}.name"),
                "must not be empty",
            )),
            Some(name) => {
                if seen.contains(&name) {
                    out.push(Violation::new(
                        format!("{path}.name"),
                        format!("duplicate component name '{name}'"),
                    ));
                } else {
                    seen.push(name);
                }
            }
        }
        match item.get("content") {
            None => out.push(Violation::new(
                format!("{path}.content"),
                "missing required field",
            )),
            Some(v) if !v.is_string() => out.push(Violation::new(
                format!("{path}.content"),
                "must be a string",
            )),
            Some(_) => {}
        }
        if let Some(v) = item.get("description") {
            if !v.is_string() {
                out.push(Violation::new(
                    format!("{path}.description"),
                    "must be a string",
                ));
            }
        }
    }
}

/// Typed deserialization with unknown-key collection. Runs only after the
/// structural checks pass, so a failure here is a real shape mismatch.
fn deserialize_with_warnings<T: serde::de::DeserializeOwned>(
    locator: &str,
    value: &Value,
) -> PalResult<(T, Vec<Violation>)> {
    let mut warnings = Vec::new();
    let doc = serde_ignored::deserialize(value.clone(), |path| {
        warnings.push(Violation::new(path.to_string(), "unknown key"));
    })
    .map_err(|e: serde_yaml_ng::Error| PalError::Parse {
        locator: locator.to_string(),
        message: e.to_string(),
    })?;
    Ok((doc, warnings))
}
