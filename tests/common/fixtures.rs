//! Test fixtures - reusable PAL documents for tests.

/// Minimal assembly with one required variable
pub const HELLO_ASSEMBLY: &str = r#"pal_version: "1.0"
id: hello
version: 1.0.0
description: Minimal greeting assembly
variables:
  - name: user
    description: Who to greet
composition:
  - "Hello {{user}}!"
"#;

/// A library of persona traits
pub const TRAITS_LIBRARY: &str = r#"pal_version: "1.0"
library_id: persona-traits
version: 2.0.0
description: Reusable persona traits
type: trait
components:
  - name: sarcastic_helper
    description: A helper with a dry wit
    content: "Be sarcastic, but never at the user's expense."
  - name: patient_teacher
    content: "Explain slowly. Assume no prior knowledge."
"#;

/// Assembly that imports `TRAITS_LIBRARY` under the alias `traits`
pub const PERSONA_ASSEMBLY: &str = r#"pal_version: "1.0"
id: persona
version: 0.1.0
description: Persona built from a trait library
imports:
  traits: ./traits.pal.lib
composition:
  - "{{traits.sarcastic_helper}}"
"#;

/// Assembly whose only variable has a default value
pub const DEFAULTED_ASSEMBLY: &str = r#"pal_version: "1.0"
id: toned
version: 1.0.0
description: Assembly with a defaulted variable
variables:
  - name: tone
    default: friendly
composition:
  - "Tone: {{tone}}"
"#;

/// Assembly declaring an unsupported pal_version
pub const FUTURE_VERSION_ASSEMBLY: &str = r#"pal_version: "2.0"
id: future
version: 1.0.0
description: From the future
composition:
  - "hi"
"#;

/// Assembly missing its required fields
pub const INVALID_ASSEMBLY: &str = r#"pal_version: "1.0"
description: No id, no version, no composition
"#;
