//! Property-based tests using proptest

use namespace_logger::prelude::*;
use proptest::prelude::*;

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Debug),
        Just(Severity::Info),
        Just(Severity::Warn),
        Just(Severity::Error),
        Just(Severity::Fatal),
    ]
}

proptest! {
    /// Severity string conversions round-trip
    #[test]
    fn test_severity_str_roundtrip(level in severity_strategy()) {
        let parsed: Severity = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Severity ordering matches the numeric discriminants
    #[test]
    fn test_severity_ordering(a in severity_strategy(), b in severity_strategy()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
    }
}

/// Reference model of the namespace rule: the deepest explicit
/// ancestor (inclusive) wins, default enabled.
fn model_is_enabled(explicit: &[(String, bool)], path: &str) -> bool {
    let mut enabled = true;
    let segments: Vec<&str> = path.split('/').collect();
    for depth in 1..=segments.len() {
        let prefix = segments[..depth].join("/");
        // Later writes to the same path overwrite earlier ones
        if let Some((_, value)) = explicit.iter().rev().find(|(p, _)| *p == prefix) {
            enabled = *value;
        }
    }
    enabled
}

fn path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just("a"), Just("b"), Just("c")], 1..4)
        .prop_map(|segments| segments.join("/"))
}

proptest! {
    /// Invariant 1: any explicit-state sequence yields the
    /// deepest-ancestor value for every queried path.
    #[test]
    fn test_namespace_store_matches_model(
        operations in proptest::collection::vec((path_strategy(), any::<bool>()), 0..12),
        queries in proptest::collection::vec(path_strategy(), 1..8),
    ) {
        let store = NamespaceStore::new();
        for (path, enabled) in &operations {
            store.set_explicit(path, *enabled);
        }
        for query in &queries {
            prop_assert_eq!(
                store.is_enabled(query),
                model_is_enabled(&operations, query),
                "path {:?} after ops {:?}", query, operations
            );
        }
    }

    /// Invariant 2: cached values are never observed after a prefix
    /// changes state.
    #[test]
    fn test_namespace_cache_invalidation(
        warmup in proptest::collection::vec(path_strategy(), 1..6),
        operations in proptest::collection::vec((path_strategy(), any::<bool>()), 1..8),
    ) {
        let store = NamespaceStore::new();
        // Populate the cache before any explicit state exists
        for path in &warmup {
            let _ = store.is_enabled(path);
        }
        let mut applied = Vec::new();
        for (path, enabled) in operations {
            store.set_explicit(&path, enabled);
            applied.push((path, enabled));
            // Every cached path must still agree with the model
            for query in &warmup {
                prop_assert_eq!(
                    store.is_enabled(query),
                    model_is_enabled(&applied, query)
                );
            }
        }
    }

    /// Field pair parsing: even pair counts of string keys never
    /// produce a synthetic error field.
    #[test]
    fn test_even_string_pairs_parse_cleanly(
        pairs in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{0,8}"), 0..8)
    ) {
        let flat: Vec<String> = pairs
            .iter()
            .flat_map(|(k, v)| [format!("x{}", k), v.clone()])
            .collect();
        let list = FieldList::from_pairs(flat);
        prop_assert_eq!(list.len(), pairs.len());
        prop_assert!(!list.contains_key("error"));
    }

    /// Field pair parsing: an odd count always produces exactly one
    /// trailing synthetic error field.
    #[test]
    fn test_odd_pairs_produce_one_error(
        pairs in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{0,8}"), 0..6),
        trailing in "[a-z]{1,8}",
    ) {
        let mut flat: Vec<String> = pairs
            .iter()
            .flat_map(|(k, v)| [format!("x{}", k), v.clone()])
            .collect();
        flat.push(trailing.clone());
        let list = FieldList::from_pairs(flat);
        prop_assert_eq!(list.len(), pairs.len() + 1);
        let last = list.iter().last().unwrap();
        prop_assert_eq!(last.key.as_str(), "error");
        prop_assert_eq!(
            last.value.to_string(),
            format!("uneven key-value pairs in Fields: [{}]", trailing)
        );
    }
}
