//! Property-based tests for gql-codegen-cli.
//!
//! Properties tested:
//! - Schema-set keys do not depend on declaration order or repetition
//! - Distinct file sets never share a key
//! - Lexical path cleaning is idempotent
//! - Config file detection matches the `codegen.<ext>` suffix rule

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use gql_codegen_cli::{cache::SchemaKey, config::is_config_file, paths};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate a schema file path.
fn arb_schema_path() -> impl Strategy<Value = String> {
    "/[a-z]{1,6}(/[a-z]{1,6}){0,3}\\.graphql"
}

/// Generate a relative path with `.` and `..` components mixed in.
fn arb_messy_path() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just(".".to_string()), Just("..".to_string()), "[a-z]{1,5}"], 1..8)
        .prop_map(|parts| parts.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any permutation (with repeats) of the same files yields the same key.
    #[test]
    fn prop_schema_key_order_independent(
        paths in prop::collection::vec(arb_schema_path(), 1..6),
        seed in any::<u64>(),
    ) {
        let mut shuffled = paths.clone();
        shuffled.rotate_left((seed as usize) % paths.len());
        shuffled.reverse();
        shuffled.push(paths[0].clone());

        prop_assert_eq!(SchemaKey::new(&paths), SchemaKey::new(&shuffled));
    }

    /// Keys are equal exactly when the file sets are equal.
    #[test]
    fn prop_schema_key_distinguishes_sets(
        a in prop::collection::vec(arb_schema_path(), 1..4),
        b in prop::collection::vec(arb_schema_path(), 1..4),
    ) {
        let set_a: BTreeSet<_> = a.iter().collect();
        let set_b: BTreeSet<_> = b.iter().collect();

        prop_assert_eq!(set_a == set_b, SchemaKey::new(&a) == SchemaKey::new(&b));
    }

    /// Cleaning twice is the same as cleaning once.
    #[test]
    fn prop_clean_is_idempotent(path in arb_messy_path()) {
        let once = paths::clean(Path::new(&path));
        let twice = paths::clean(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.components().all(|c| c != std::path::Component::CurDir) || once == PathBuf::from("."));
    }

    /// Prefixed config names are recognized; other extensions are not.
    #[test]
    fn prop_config_detection(
        prefix in "[a-z]{0,6}",
        ext in prop::sample::select(vec!["yml", "yaml", "json", "ts", "mts", "cts", "js", "mjs", "cjs"]),
        other in prop::sample::select(vec!["toml", "txt", "graphql", "md"]),
    ) {
        let stem = if prefix.is_empty() { "codegen".to_string() } else { format!("{}.codegen", prefix) };

        let config = format!("{}.{}", stem, ext);
        let not_config = format!("{}.{}", stem, other);
        prop_assert!(is_config_file(Path::new(&config)));
        prop_assert!(!is_config_file(Path::new(&not_config)));
    }
}
