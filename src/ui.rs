//! Human-facing output for the CLI binary.
//!
//! Errors and warnings go to stderr, results to stdout. JSON mode
//! bypasses all of this; commands emit NDJSON events directly.

use std::path::Path;

use is_terminal::IsTerminal;

use pal::config::ColorMode;
use pal::{ConfigWarning, Finding, LintResult, PalError, Severity};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Whether stdout output should use ANSI colors.
pub fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
        }
    }
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("{}{}{}", code, text, RESET)
    } else {
        text.to_string()
    }
}

/// Print a fatal error to stderr, or an error event in JSON mode.
pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let (kind, message) = match err.downcast_ref::<PalError>() {
            Some(pal_err) => (pal_err.kind(), pal_err.to_string()),
            None => ("other", format!("{:#}", err)),
        };
        println!(
            "{}",
            serde_json::json!({
                "event": "error",
                "kind": kind,
                "message": message,
            })
        );
        return;
    }

    let color = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
    eprint!("{}", format_error(err, color));
}

fn format_error(err: &anyhow::Error, color: bool) -> String {
    let Some(pal_err) = err.downcast_ref::<PalError>() else {
        return format!("{} {:#}\n", paint("error:", RED, color), err);
    };

    let mut out = format!("{} {}\n", paint("error:", RED, color), pal_err);
    match pal_err {
        PalError::Validation { violations, .. } => {
            for violation in violations {
                out.push_str(&format!("  - {}\n", violation));
            }
        }
        PalError::MissingVariableBinding { name } => {
            out.push_str(&format!(
                "  hint: pass a value with --vars '{{\"{}\": ...}}'\n",
                name
            ));
        }
        PalError::InvalidBindings { .. } => {
            out.push_str("  hint: --vars expects a JSON object, e.g. --vars '{\"user\": \"Ana\"}'\n");
        }
        _ => {}
    }
    out
}

/// Print one lint finding. Pass findings are shown only at -v.
pub fn print_finding(finding: &Finding, verbose: u8, color: bool) {
    let icon = match finding.severity {
        Severity::Pass => {
            if verbose == 0 {
                return;
            }
            paint("✓", GREEN, color)
        }
        Severity::Warning => paint("⚠", YELLOW, color),
        Severity::Error => paint("✗", RED, color),
    };
    println!(
        "{} {} [{}] {}",
        icon, finding.file, finding.name, finding.message
    );
}

/// Print the lint summary line.
pub fn print_lint_summary(result: &LintResult, color: bool) {
    let files = if result.files == 1 { "file" } else { "files" };
    if result.is_clean() {
        println!(
            "{} {} {} checked, no issues",
            paint("✓", GREEN, color),
            result.files,
            files
        );
        return;
    }

    let icon = if result.is_success() {
        paint("⚠", YELLOW, color)
    } else {
        paint("✗", RED, color)
    };
    println!(
        "{} {} {} checked: {} passed, {} warnings, {} errors",
        icon,
        result.files,
        files,
        result.passed,
        result.warnings,
        result.errors
    );
}

/// Surface unknown keys found in a pal.toml.
pub fn print_config_warnings(path: &Path, warnings: &[ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, path.display(), line);
        } else {
            eprintln!("⚠ Unknown config key '{}' in {}", w.key, path.display());
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?", suggestion);
        }
    }
}

/// Surface unknown keys found in a manifest while compiling.
pub fn print_manifest_warnings(locator: &str, warnings: &[pal::Violation]) {
    for w in warnings {
        eprintln!("⚠ {}: unknown key '{}'", locator, w.path);
    }
}
