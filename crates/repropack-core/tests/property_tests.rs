//! Property-based tests for ordering and naming.
//!
//! These tests use proptest to check that the pure parts of the pipeline
//! behave the same for any input.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use repropack_core::ArchiveFormat;
use repropack_core::creation::naming::archive_name;
use repropack_core::creation::naming::normalize;
use repropack_core::creation::naming::validate_prefix;
use repropack_core::creation::order::compare_paths;
use repropack_core::creation::order::sort_entries;
use repropack_core::creation::walker::Entry;
use repropack_core::creation::walker::EntryKind;
use std::path::PathBuf;

fn entries_from(paths: &[String]) -> Vec<Entry> {
    paths
        .iter()
        .map(|p| Entry {
            path: PathBuf::from(p),
            relative_path: p.clone(),
            kind: EntryKind::File,
        })
        .collect()
}

fn relative_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9_ é-][a-zA-Z0-9._ é-]{0,7}", 1..4)
        .prop_map(|parts| format!("./{}", parts.join("/")))
}

proptest! {
    /// Sorted output is strictly ascending by bytes for distinct inputs.
    #[test]
    fn prop_sort_is_byte_ascending(
        paths in prop::collection::hash_set(relative_path_strategy(), 0..32)
    ) {
        let paths: Vec<String> = paths.into_iter().collect();
        let mut entries = entries_from(&paths);
        sort_entries(&mut entries);

        for pair in entries.windows(2) {
            prop_assert!(pair[0].relative_path.as_bytes() < pair[1].relative_path.as_bytes());
        }
    }

    /// Sorting does not depend on the input order.
    #[test]
    fn prop_sort_ignores_input_order(
        paths in prop::collection::vec(relative_path_strategy(), 0..32)
    ) {
        let mut forward = entries_from(&paths);
        let mut reversed: Vec<String> = paths.clone();
        reversed.reverse();
        let mut backward = entries_from(&reversed);

        sort_entries(&mut forward);
        sort_entries(&mut backward);

        let forward: Vec<_> = forward.into_iter().map(|e| e.relative_path).collect();
        let backward: Vec<_> = backward.into_iter().map(|e| e.relative_path).collect();
        prop_assert_eq!(forward, backward);
    }

    /// The comparator agrees with `str` ordering, which is codepoint order.
    #[test]
    fn prop_compare_matches_str_ord(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        prop_assert_eq!(compare_paths(&a, &b), a.cmp(&b));
    }

    /// Normalizing twice changes nothing.
    #[test]
    fn prop_normalize_idempotent(path in "[a-z./]{0,24}") {
        let once = normalize(&path);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Normalized names never contain empty or `.` components.
    #[test]
    fn prop_normalize_no_redundant_components(path in "[a-z./]{0,24}") {
        let normalized = normalize(&path);
        if normalized != "." && normalized != "/" {
            for component in normalized.trim_start_matches('/').split('/') {
                prop_assert!(!component.is_empty());
                prop_assert!(component != ".");
            }
        }
    }

    /// Archive names built from a valid prefix stay inside it.
    #[test]
    fn prop_prefixed_names_stay_under_prefix(
        prefix in "[a-z]{1,8}(/[a-z]{1,8}){0,2}/?",
        relative in relative_path_strategy()
    ) {
        let prefix = validate_prefix(Some(&prefix)).unwrap().unwrap();
        let root = normalize(prefix);
        for format in [ArchiveFormat::TarGz, ArchiveFormat::Zip] {
            let name = archive_name(&relative, Some(prefix), format);
            prop_assert!(name.starts_with(&format!("{root}/")), "{} not under {}", name, root);
        }
    }

    /// Zip names without a prefix never start with `./` or `/`.
    #[test]
    fn prop_unprefixed_zip_names_are_relative(relative in relative_path_strategy()) {
        let name = archive_name(&relative, None, ArchiveFormat::Zip);
        prop_assert!(!name.starts_with("./"));
        prop_assert!(!name.starts_with('/'));
    }

    /// Tar names without a prefix are the enumerated path unchanged.
    #[test]
    fn prop_unprefixed_tar_names_are_verbatim(relative in relative_path_strategy()) {
        prop_assert_eq!(archive_name(&relative, None, ArchiveFormat::TarGz), relative);
    }
}
