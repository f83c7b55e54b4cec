//! Property tests for version string validation.

use proptest::prelude::*;

use pal::schema::is_semver;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Any MAJOR.MINOR.PATCH triple of plain digits is accepted.
    #[test]
    fn property_numeric_triples_accepted(
        major in 0u32..10_000,
        minor in 0u32..10_000,
        patch in 0u32..10_000,
    ) {
        let version = format!("{major}.{minor}.{patch}");
        prop_assert!(is_semver(&version));
    }

    /// PROPERTY: `is_semver` never panics on arbitrary input.
    #[test]
    fn property_is_semver_never_panics(s in "(?s).{0,64}") {
        let _ = is_semver(&s);
    }

    /// PROPERTY: A textual suffix breaks the format.
    #[test]
    fn property_suffixed_versions_rejected(
        major in 0u32..100,
        minor in 0u32..100,
        patch in 0u32..100,
        suffix in "[a-zA-Z-]{1,8}",
    ) {
        let version = format!("{major}.{minor}.{patch}{suffix}");
        prop_assert!(!is_semver(&version));
    }

    /// PROPERTY: Fewer than three segments is rejected.
    #[test]
    fn property_two_segments_rejected(major in 0u32..100, minor in 0u32..100) {
        let version = format!("{major}.{minor}");
        prop_assert!(!is_semver(&version));
    }

    /// PROPERTY: A fourth segment is rejected.
    #[test]
    fn property_four_segments_rejected(
        major in 0u32..100,
        minor in 0u32..100,
        patch in 0u32..100,
        extra in 0u32..100,
    ) {
        let version = format!("{major}.{minor}.{patch}.{extra}");
        prop_assert!(!is_semver(&version));
    }
}
