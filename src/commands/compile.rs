//! `pal compile` - resolve an assembly and print the finished prompt.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use sha2::{Digest, Sha256};

use pal::{compile, Loader, Locator, PalError, Resolver};

pub fn cmd_compile(
    file: &str,
    vars: Option<&str>,
    vars_file: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let locator = Locator::parse(file)?;
    let root = match &locator {
        Locator::Path(path) => path.parent().map(Path::to_path_buf),
        Locator::Url(_) => None,
    };
    let config = super::load_config(root.as_deref(), json);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "start",
                "command": "compile",
                "file": file,
            })
        );
    }

    let bindings = parse_bindings(vars, vars_file)?;

    let loader = Loader::new(config.fetch_timeout());
    let (assembly, warnings) = loader.load_assembly(&locator)?;
    if !json {
        crate::ui::print_manifest_warnings(file, &warnings);
    }

    let resolution = Resolver::new(&loader).resolve(&assembly, &locator)?;
    let prompt = compile(&assembly, &resolution.imports, &bindings)?;

    match output {
        Some(path) => {
            write_atomic(path, &prompt)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "event": "complete",
                        "command": "compile",
                        "status": "success",
                        "id": assembly.id,
                        "output": path.display().to_string(),
                        "bytes": prompt.len(),
                        "sha256": sha256_hex(&prompt),
                    })
                );
            } else {
                println!("✓ wrote {} ({} bytes)", path.display(), prompt.len());
            }
        }
        None => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "event": "complete",
                        "command": "compile",
                        "status": "success",
                        "id": assembly.id,
                        "bytes": prompt.len(),
                        "sha256": sha256_hex(&prompt),
                        "prompt": prompt,
                    })
                );
            } else {
                let mut out = std::io::stdout().lock();
                out.write_all(prompt.as_bytes())?;
                if !prompt.ends_with('\n') {
                    out.write_all(b"\n")?;
                }
            }
        }
    }

    Ok(())
}

/// Merge bindings from --vars-file and --vars. Inline --vars wins on
/// key conflicts.
fn parse_bindings(
    vars: Option<&str>,
    vars_file: Option<&Path>,
) -> Result<serde_json::Map<String, serde_json::Value>, PalError> {
    let mut bindings = serde_json::Map::new();

    if let Some(path) = vars_file {
        let content = std::fs::read_to_string(path).map_err(|e| PalError::InvalidBindings {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        merge_bindings(&mut bindings, &content, &path.display().to_string())?;
    }

    if let Some(inline) = vars {
        merge_bindings(&mut bindings, inline, "--vars")?;
    }

    Ok(bindings)
}

fn merge_bindings(
    into: &mut serde_json::Map<String, serde_json::Value>,
    raw: &str,
    source: &str,
) -> Result<(), PalError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| PalError::InvalidBindings {
            message: format!("{}: not valid JSON: {}", source, e),
        })?;
    match value {
        serde_json::Value::Object(map) => {
            into.extend(map);
            Ok(())
        }
        other => Err(PalError::InvalidBindings {
            message: format!("{}: expected a JSON object, got {}", source, json_type(&other)),
        }),
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Tempfile + rename so a failed write never leaves a truncated prompt.
fn write_atomic(path: &Path, content: &str) -> Result<(), PalError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| PalError::Io(e.error))?;
    Ok(())
}
