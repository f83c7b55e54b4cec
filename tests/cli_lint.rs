//! End-to-end tests for `pal lint`.

mod common;

use common::{TestEnv, HELLO_ASSEMBLY, INVALID_ASSEMBLY, PERSONA_ASSEMBLY, TRAITS_LIBRARY};

#[test]
fn test_lint_clean_tree_passes() {
    let env = TestEnv::new();
    env.write_file("hello.pal", HELLO_ASSEMBLY);
    env.write_file("traits.pal.lib", TRAITS_LIBRARY);
    env.write_file("persona.pal", PERSONA_ASSEMBLY);

    let result = env.run(&["lint", "."]);

    assert!(result.success, "output: {}", result.combined_output());
    assert!(
        result.stdout.contains("no issues"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_reports_schema_violations() {
    let env = TestEnv::new();
    env.write_file("invalid.pal", INVALID_ASSEMBLY);

    let result = env.run(&["lint", "."]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
    assert!(
        result.stdout.contains("[schema]"),
        "stdout: {}",
        result.stdout
    );
    assert!(
        result.stdout.contains("invalid.pal"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_reports_undefined_variable() {
    let env = TestEnv::new();
    env.write_file(
        "ghost.pal",
        r#"pal_version: "1.0"
id: ghost
version: 1.0.0
description: Uses an undeclared variable
composition:
  - "Hello {{ghost}}!"
"#,
    );

    let result = env.run(&["lint", "."]);

    assert!(!result.success);
    assert!(
        result.stdout.contains("[usage]"),
        "stdout: {}",
        result.stdout
    );
    assert!(
        result.stdout.contains("undefined variable 'ghost'"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_reports_cycles() {
    let env = TestEnv::new();
    env.write_file(
        "a.pal",
        r#"pal_version: "1.0"
id: a
version: 1.0.0
description: Cycle root
imports:
  b: ./b.pal.lib
composition:
  - "hi"
"#,
    );
    env.write_file(
        "b.pal.lib",
        r#"pal_version: "1.0"
library_id: b
version: 1.0.0
description: Cycles back
type: note
imports:
  a: ./a.pal
components:
  - name: x
    content: "X"
"#,
    );

    let result = env.run(&["lint", "."]);

    assert!(!result.success);
    assert!(
        result.stdout.contains("[imports]"),
        "stdout: {}",
        result.stdout
    );
    assert!(
        result.stdout.contains("circular import detected"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_warns_on_unused_variable() {
    let env = TestEnv::new();
    env.write_file(
        "wasteful.pal",
        r#"pal_version: "1.0"
id: wasteful
version: 1.0.0
description: Declares a variable it never uses
variables:
  - name: unused_thing
    required: false
composition:
  - "hi"
"#,
    );

    let result = env.run(&["lint", "."]);

    // warnings alone do not fail the run
    assert!(result.success, "output: {}", result.combined_output());
    assert!(
        result.stdout.contains("[unused-variable]"),
        "stdout: {}",
        result.stdout
    );
    assert!(
        result.stdout.contains("unused_thing"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_strict_warnings_fails_on_warning() {
    let env = TestEnv::new();
    env.write_file(
        "wasteful.pal",
        r#"pal_version: "1.0"
id: wasteful
version: 1.0.0
description: Declares a variable it never uses
variables:
  - name: unused_thing
    required: false
composition:
  - "hi"
"#,
    );

    let result = env.run(&["lint", ".", "--strict-warnings"]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
}

#[test]
fn test_lint_warns_on_unused_import() {
    let env = TestEnv::new();
    env.write_file("traits.pal.lib", TRAITS_LIBRARY);
    env.write_file(
        "hoarder.pal",
        r#"pal_version: "1.0"
id: hoarder
version: 1.0.0
description: Imports a library it never references
imports:
  traits: ./traits.pal.lib
composition:
  - "hi"
"#,
    );

    let result = env.run(&["lint", "hoarder.pal"]);

    assert!(result.success, "output: {}", result.combined_output());
    assert!(
        result.stdout.contains("[unused-import]"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_warns_on_unknown_key() {
    let env = TestEnv::new();
    let mut doc = HELLO_ASSEMBLY.to_string();
    doc.push_str("maintainer: someone\n");
    env.write_file("hello.pal", &doc);

    let result = env.run(&["lint", "."]);

    assert!(result.success, "output: {}", result.combined_output());
    assert!(
        result.stdout.contains("unknown key 'maintainer'"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_single_file_target() {
    let env = TestEnv::new();
    env.write_file("hello.pal", HELLO_ASSEMBLY);
    env.write_file("invalid.pal", INVALID_ASSEMBLY);

    // only the named file is checked
    let result = env.run(&["lint", "hello.pal"]);

    assert!(result.success, "output: {}", result.combined_output());
    assert!(
        result.stdout.contains("1 file checked"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_skips_hidden_directories() {
    let env = TestEnv::new();
    env.write_file("hello.pal", HELLO_ASSEMBLY);
    env.write_file(".stash/invalid.pal", INVALID_ASSEMBLY);

    let result = env.run(&["lint", "."]);

    assert!(result.success, "output: {}", result.combined_output());
    assert!(
        result.stdout.contains("1 file checked"),
        "stdout: {}",
        result.stdout
    );
}

#[test]
fn test_lint_missing_path_fails() {
    let env = TestEnv::new();

    let result = env.run(&["lint", "missing-dir"]);

    assert!(!result.success);
    assert!(
        result.stderr.contains("not found"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn test_lint_json_emits_ndjson_event_stream() {
    let env = TestEnv::new();
    env.write_file("hello.pal", HELLO_ASSEMBLY);
    env.write_file("invalid.pal", INVALID_ASSEMBLY);

    let result = env.run(&["lint", ".", "--json"]);

    assert!(!result.success);
    let events = result.json_events();
    assert!(events.len() > 2, "expected NDJSON stream, got: {:?}", events);

    assert_eq!(events[0]["event"], "start");
    assert_eq!(events[0]["command"], "lint");

    let last = events.last().unwrap();
    assert_eq!(last["event"], "complete");
    assert_eq!(last["status"], "failure");
    assert_eq!(last["files"], 2);

    assert!(
        events.iter().any(|e| {
            e["event"] == "finding" && e["severity"] == "error" && e["check"] == "schema"
        }),
        "expected a schema finding event, got: {:?}",
        events
    );
}

#[test]
fn test_lint_verbose_shows_passing_files() {
    let env = TestEnv::new();
    env.write_file("hello.pal", HELLO_ASSEMBLY);

    let quiet = env.run(&["lint", "."]);
    let verbose = env.run(&["lint", ".", "-v"]);

    assert!(quiet.success);
    assert!(!quiet.stdout.contains("[ok]"), "stdout: {}", quiet.stdout);
    assert!(
        verbose.stdout.contains("[ok]"),
        "stdout: {}",
        verbose.stdout
    );
}
