//! Property tests for the compile pipeline.

use proptest::prelude::*;
use std::collections::BTreeMap;

use pal::{compile, PalError, PalVariable, PromptAssembly};

fn assembly(composition: Vec<String>, variables: Vec<PalVariable>) -> PromptAssembly {
    PromptAssembly {
        pal_version: "1.0".to_string(),
        id: "prop".to_string(),
        version: "1.0.0".to_string(),
        description: String::new(),
        author: None,
        imports: BTreeMap::new(),
        variables,
        composition,
    }
}

fn required_variable(name: &str) -> PalVariable {
    PalVariable {
        name: name.to_string(),
        var_type: None,
        description: String::new(),
        required: true,
        default: None,
    }
}

// prefixed so generated names can never hit a template keyword
fn variable_name() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,10}".prop_map(|s| format!("var_{s}"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `compile` never panics, whatever the fragment text.
    #[test]
    fn property_compile_never_panics(fragment in "(?s).{0,128}") {
        let assembly = assembly(vec![fragment], vec![]);
        let _ = compile(&assembly, &BTreeMap::new(), &serde_json::Map::new());
    }

    /// PROPERTY: Fragments without template syntax pass through verbatim,
    /// concatenated in order with nothing between them.
    #[test]
    fn property_literal_fragments_concatenate(
        texts in proptest::collection::vec("[a-zA-Z0-9 .,!?\n]{0,40}", 1..5),
    ) {
        let assembly = assembly(texts.clone(), vec![]);
        let out = compile(&assembly, &BTreeMap::new(), &serde_json::Map::new()).unwrap();
        prop_assert_eq!(out, texts.concat());
    }

    /// PROPERTY: A bound variable's value appears verbatim in the output.
    #[test]
    fn property_binding_substituted(
        name in variable_name(),
        value in "[a-zA-Z0-9 ]{0,24}",
    ) {
        let fragment = format!("pre {{{{{name}}}}} post");
        let assembly = assembly(vec![fragment], vec![required_variable(&name)]);

        let mut bindings = serde_json::Map::new();
        bindings.insert(name, serde_json::Value::String(value.clone()));

        let out = compile(&assembly, &BTreeMap::new(), &bindings).unwrap();
        prop_assert_eq!(out, format!("pre {value} post"));
    }

    /// PROPERTY: Compilation is deterministic.
    #[test]
    fn property_compile_deterministic(
        name in variable_name(),
        value in "[a-zA-Z0-9 ]{0,24}",
        literal in "[a-zA-Z0-9 .,]{0,40}",
    ) {
        let assembly = assembly(
            vec![literal, format!("{{{{{name}}}}}")],
            vec![required_variable(&name)],
        );
        let mut bindings = serde_json::Map::new();
        bindings.insert(name, serde_json::Value::String(value));

        let first = compile(&assembly, &BTreeMap::new(), &bindings).unwrap();
        let second = compile(&assembly, &BTreeMap::new(), &bindings).unwrap();
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: A referenced required variable with no binding always
    /// fails with `MissingVariableBinding` naming that variable.
    #[test]
    fn property_unbound_required_variable_fails(name in variable_name()) {
        let fragment = format!("{{{{{name}}}}}");
        let assembly = assembly(vec![fragment], vec![required_variable(&name)]);

        let err = compile(&assembly, &BTreeMap::new(), &serde_json::Map::new()).unwrap_err();
        match err {
            PalError::MissingVariableBinding { name: reported } => {
                prop_assert_eq!(reported, name);
            }
            other => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }

    /// PROPERTY: Fragment order is preserved in the output.
    #[test]
    fn property_fragment_order_preserved(
        first in "[a-z]{1,20}",
        second in "[A-Z]{1,20}",
    ) {
        let assembly = assembly(vec![first.clone(), second.clone()], vec![]);
        let out = compile(&assembly, &BTreeMap::new(), &serde_json::Map::new()).unwrap();
        prop_assert_eq!(out, format!("{first}{second}"));
    }
}
