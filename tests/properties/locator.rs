//! Property tests for locator parsing and joining.

use proptest::prelude::*;
use std::path::{Path, PathBuf};

use pal::Locator;

fn document_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,12}\\.pal(\\.lib)?"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `Locator::parse` never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(raw in "(?s).{0,128}") {
        let _ = Locator::parse(&raw);
    }

    /// PROPERTY: Joining a bare file name onto a path document lands in
    /// that document's directory.
    #[test]
    fn property_path_join_stays_in_directory(name in document_name()) {
        let base = Locator::Path(PathBuf::from("packs/root.pal"));
        let joined = base.join(&name).unwrap();
        match joined {
            Locator::Path(p) => {
                prop_assert_eq!(p, Path::new("packs").join(&name));
            }
            Locator::Url(u) => prop_assert!(false, "unexpected URL {u}"),
        }
    }

    /// PROPERTY: Absolute paths are taken as-is, whatever the base.
    #[test]
    fn property_absolute_path_ignores_base(name in document_name()) {
        let absolute = format!("/opt/pal/{name}");
        let from_path = Locator::Path(PathBuf::from("packs/root.pal"))
            .join(&absolute)
            .unwrap();
        prop_assert_eq!(from_path.to_string(), absolute);
    }

    /// PROPERTY: A relative reference in a remote document resolves to a
    /// sibling URL.
    #[test]
    fn property_url_join_replaces_last_segment(name in document_name()) {
        let base = Locator::parse("https://example.com/packs/root.pal").unwrap();
        let joined = base.join(&name).unwrap();
        prop_assert!(joined.is_remote());
        prop_assert_eq!(
            joined.to_string(),
            format!("https://example.com/packs/{name}")
        );
    }

    /// PROPERTY: A full URL import ignores the base entirely.
    #[test]
    fn property_url_import_ignores_base(name in document_name()) {
        let url = format!("https://other.example/{name}");
        let base = Locator::Path(PathBuf::from("packs/root.pal"));
        let joined = base.join(&url).unwrap();
        prop_assert!(joined.is_remote());
        prop_assert_eq!(joined.to_string(), url);
    }

    /// PROPERTY: `file_name` of a joined document is the joined name.
    #[test]
    fn property_file_name_round_trips(name in document_name()) {
        let base = Locator::Path(PathBuf::from("packs/root.pal"));
        let joined = base.join(&name).unwrap();
        prop_assert_eq!(joined.file_name(), Some(name));
    }
}
