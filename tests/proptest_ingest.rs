mod common;

use std::fs;

use annofeed::ingest::{read_flat_csv, BACKGROUND_CLASS};
use proptest::prelude::*;

fn class_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["person", "car", "dog", "bicycle", BACKGROUND_CLASS])
        .prop_map(String::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn class_mapping_invariants_hold(classes in prop::collection::vec(class_name_strategy(), 1..40)) {
        let temp = tempfile::tempdir().expect("create temp dir");
        let image = temp.path().join("img1.jpg");
        common::write_probe_image(&image, 32, 16);

        let mut flat = String::new();
        for class in &classes {
            flat.push_str(&format!("{},1,2,3,4,{}\n", image.display(), class));
        }
        let flat_path = temp.path().join("annotations.txt");
        fs::write(&flat_path, flat).expect("write flat file");

        let set = read_flat_csv(&flat_path, Some(1)).expect("ingest");

        // Counts and mapping cover exactly the same classes.
        let count_keys: Vec<_> = set.class_counts.keys().collect();
        let mapping_keys: Vec<_> = set.class_mapping.keys().collect();
        prop_assert_eq!(count_keys, mapping_keys);

        // Indices are a dense permutation of 0..N.
        let mut indices: Vec<usize> = set.class_mapping.values().copied().collect();
        indices.sort_unstable();
        let expected: Vec<usize> = (0..set.class_mapping.len()).collect();
        prop_assert_eq!(indices, expected);

        // The background pseudo-class always holds the top index.
        if let Some(&bg_index) = set.class_mapping.get(BACKGROUND_CLASS) {
            prop_assert_eq!(bg_index, set.class_mapping.len() - 1);
        }

        // Counts sum to the number of retained boxes.
        let counted: usize = set.class_counts.values().sum();
        prop_assert_eq!(counted, set.total_boxes());
        prop_assert_eq!(counted, classes.len());
    }

    #[test]
    fn mapping_and_counts_are_idempotent_across_runs(classes in prop::collection::vec(class_name_strategy(), 1..20)) {
        let temp = tempfile::tempdir().expect("create temp dir");
        let image = temp.path().join("img1.jpg");
        common::write_probe_image(&image, 32, 16);

        let mut flat = String::new();
        for class in &classes {
            flat.push_str(&format!("{},1,2,3,4,{}\n", image.display(), class));
        }
        let flat_path = temp.path().join("annotations.txt");
        fs::write(&flat_path, flat).expect("write flat file");

        let first = read_flat_csv(&flat_path, None).expect("first run");
        let second = read_flat_csv(&flat_path, None).expect("second run");

        // Split tags may differ between unseeded runs; the class outputs may not.
        prop_assert_eq!(first.class_mapping, second.class_mapping);
        prop_assert_eq!(first.class_counts, second.class_counts);
    }
}
