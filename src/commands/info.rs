//! `pal info` - show manifest metadata without compiling.

use std::path::Path;

use anyhow::Result;

use pal::{Loader, Locator, Manifest};

pub fn cmd_info(file: &str, json: bool) -> Result<()> {
    let locator = Locator::parse(file)?;
    let root = match &locator {
        Locator::Path(path) => path.parent().map(Path::to_path_buf),
        Locator::Url(_) => None,
    };
    let config = super::load_config(root.as_deref(), json);

    let loader = Loader::new(config.fetch_timeout());
    let (manifest, warnings) = loader.load_manifest(&locator)?;

    if json {
        println!("{}", serde_json::to_string(&info_event(file, &manifest))?);
        return Ok(());
    }

    crate::ui::print_manifest_warnings(file, &warnings);

    println!("┌─ {} ({})", manifest.id(), manifest.kind().label());
    println!("│  Version: {}", manifest.version());
    if !manifest.description().is_empty() {
        println!("│  Description: {}", manifest.description());
    }

    match &manifest {
        Manifest::Assembly(assembly) => {
            if let Some(author) = &assembly.author {
                println!("│  Author: {}", author);
            }
            if !assembly.imports.is_empty() {
                println!("│  Imports:");
                for (alias, target) in &assembly.imports {
                    println!("│    {} -> {}", alias, target);
                }
            }
            if !assembly.variables.is_empty() {
                println!("│  Variables:");
                for variable in &assembly.variables {
                    println!("│    {}", describe_variable(variable));
                }
            }
            println!("│  Fragments: {}", assembly.composition.len());
        }
        Manifest::Library(library) => {
            println!("│  Type: {}", library.kind);
            if !library.imports.is_empty() {
                println!("│  Imports:");
                for (alias, target) in &library.imports {
                    println!("│    {} -> {}", alias, target);
                }
            }
            println!("│  Components:");
            for component in &library.components {
                if component.description.is_empty() {
                    println!("│    {}", component.name);
                } else {
                    println!("│    {}: {}", component.name, component.description);
                }
            }
        }
    }
    println!("└─");

    Ok(())
}

fn info_event(file: &str, manifest: &Manifest) -> serde_json::Value {
    let mut event = serde_json::json!({
        "event": "manifest",
        "command": "info",
        "file": file,
        "kind": manifest.kind().label(),
        "id": manifest.id(),
        "version": manifest.version(),
        "description": manifest.description(),
        "imports": manifest.imports(),
    });

    match manifest {
        Manifest::Assembly(assembly) => {
            event["author"] = serde_json::json!(assembly.author);
            event["variables"] = serde_json::json!(assembly
                .variables
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "name": v.name,
                        "required": v.required,
                        "default": v.default,
                    })
                })
                .collect::<Vec<_>>());
            event["fragments"] = serde_json::json!(assembly.composition.len());
        }
        Manifest::Library(library) => {
            event["type"] = serde_json::json!(library.kind.to_string());
            event["components"] = serde_json::json!(library
                .components
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>());
        }
    }

    event
}

fn describe_variable(variable: &pal::PalVariable) -> String {
    let mut line = variable.name.clone();
    if let Some(var_type) = &variable.var_type {
        line.push_str(&format!(" ({})", var_type));
    }
    if let Some(default) = &variable.default {
        line.push_str(&format!(" = {}", default));
    } else if variable.required {
        line.push_str(" [required]");
    } else {
        line.push_str(" [optional]");
    }
    line
}
