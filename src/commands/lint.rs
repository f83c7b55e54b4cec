//! `pal lint` - check every PAL document under a path.

use std::path::Path;

use anyhow::Result;

use pal::{LintEngine, LintOptions, Loader};

pub fn cmd_lint(path: &Path, strict_warnings: bool, json: bool, verbose: u8) -> Result<()> {
    let root = if path.is_dir() { path } else { path.parent().unwrap_or(path) };
    let config = super::load_config(Some(root), json);
    let options = LintOptions { strict_warnings };
    let color = crate::ui::use_color(config.output.color);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "start",
                "command": "lint",
                "path": path.display().to_string(),
            })
        );
    } else {
        println!("Linting {}...", path.display());
    }

    let loader = Loader::new(config.fetch_timeout());
    let engine = LintEngine::new(&loader);

    let result = engine.execute_with_callback(path, |finding| {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "finding",
                    "command": "lint",
                    "file": finding.file,
                    "check": finding.name,
                    "severity": finding.severity.label(),
                    "message": finding.message,
                })
            );
        } else {
            crate::ui::print_finding(finding, verbose, color);
        }
    })?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "complete",
                "command": "lint",
                "status": if result.passes(options) { "success" } else { "failure" },
                "files": result.files,
                "passed": result.passed,
                "warnings": result.warnings,
                "errors": result.errors,
            })
        );
    } else {
        crate::ui::print_lint_summary(&result, color);
    }

    if !result.passes(options) {
        std::process::exit(1);
    }

    Ok(())
}
